use proj4rs::Proj;
use proj4rs::transform::transform;

use crate::Error;
use crate::Point;
use crate::Result;
use crate::crs::Epsg;

struct SpatialReference {
    srs: Proj,
}

impl SpatialReference {
    fn from_epsg(epsg: Epsg) -> Result<Self> {
        let proj_str = crs_definitions::from_code(epsg.code())
            .map(|def| def.proj4)
            .ok_or(Error::UnknownCrs(epsg))?;

        Ok(Self {
            srs: Proj::from_proj_string(proj_str)?,
        })
    }

    fn is_geographic(&self) -> bool {
        self.srs.is_latlong()
    }
}

/// Transforms points between two coordinate reference systems.
/// Geographic coordinates are expressed in degrees (x = longitude, y = latitude) on both input and output.
pub struct CoordinateTransformer {
    source: SpatialReference,
    target: SpatialReference,
    source_epsg: Epsg,
    target_epsg: Epsg,
}

impl CoordinateTransformer {
    pub fn from_epsg(source_epsg: Epsg, target_epsg: Epsg) -> Result<Self> {
        let source = SpatialReference::from_epsg(source_epsg)?;
        let target = SpatialReference::from_epsg(target_epsg)?;

        Ok(CoordinateTransformer {
            source,
            target,
            source_epsg,
            target_epsg,
        })
    }

    pub fn transform_point(&self, point: Point) -> Result<Point> {
        let mut p = point;
        self.transform_point_in_place(&mut p)?;
        Ok(p)
    }

    pub fn transform_point_in_place(&self, point: &mut Point) -> Result<()> {
        if self.source_epsg == self.target_epsg {
            return Ok(());
        }

        // proj4rs works in radians for geographic systems
        if self.source.is_geographic() {
            *point = point.to_radians();
        }

        transform(&self.source.srs, &self.target.srs, point)?;

        if self.target.is_geographic() {
            *point = point.to_degrees();
        }

        if !point.x().is_finite() || !point.y().is_finite() {
            return Err(Error::Runtime(format!(
                "Point could not be transformed from {} to {}",
                self.source_epsg, self.target_epsg
            )));
        }

        Ok(())
    }

    pub fn transform_points_in_place(&self, points: &mut [Point]) -> Result<()> {
        for point in points.iter_mut() {
            self.transform_point_in_place(point)?;
        }
        Ok(())
    }

    pub fn source_epsg(&self) -> Epsg {
        self.source_epsg
    }

    pub fn target_epsg(&self) -> Epsg {
        self.target_epsg
    }
}
