use crate::{CoordinateTransformer, Epsg, Error, Point, Rect, Result};

/// A simple polygon described by its exterior ring in a known coordinate reference system.
/// The ring is always closed: the last vertex equals the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<Point>,
    epsg: Epsg,
}

impl Polygon {
    /// Creates a polygon from its exterior ring, an open ring is closed by repeating the first vertex.
    pub fn new(mut ring: Vec<Point>, epsg: Epsg) -> Self {
        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if first != last {
                ring.push(first);
            }
        }

        Polygon { ring, epsg }
    }

    /// Parses the exterior ring of a GeoJSON `Polygon` geometry or of a `Feature` containing one.
    /// GeoJSON coordinates are always WGS84 longitude, latitude.
    #[cfg(feature = "vector-io")]
    pub fn from_geojson(json: &str) -> Result<Self> {
        use geozero::ToGeo;

        match geozero::geojson::GeoJson(json).to_geo()? {
            geo_types::Geometry::Polygon(polygon) => {
                let (exterior, _interiors) = polygon.into_inner();
                Ok(Polygon::new(exterior.into_points(), crate::crs::epsg::WGS84))
            }
            geometry => Err(Error::DegenerateGeometry(format!(
                "expected a GeoJSON polygon, got {}",
                geometry_name(&geometry)
            ))),
        }
    }

    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    pub fn epsg(&self) -> Epsg {
        self.epsg
    }

    /// Checks that the polygon can enclose an area: at least 3 distinct, finite vertices.
    pub fn validate(&self) -> Result<()> {
        if self.ring.iter().any(|p| !p.x().is_finite() || !p.y().is_finite()) {
            return Err(Error::DegenerateGeometry("polygon contains non finite coordinates".into()));
        }

        let mut distinct: Vec<(u64, u64)> = self.ring.iter().map(|p| (p.x().to_bits(), p.y().to_bits())).collect();
        distinct.sort_unstable();
        distinct.dedup();

        if distinct.len() < 3 {
            return Err(Error::DegenerateGeometry(format!(
                "polygon has {} distinct vertices, at least 3 are required",
                distinct.len()
            )));
        }

        Ok(())
    }

    /// The bounding envelope in the polygon's own crs
    pub fn envelope(&self) -> Result<Rect> {
        Rect::enclosing(self.ring.iter().copied()).ok_or_else(|| Error::DegenerateGeometry("polygon has no vertices".into()))
    }

    /// Transforms every vertex to the target crs, vertex order and ring closure are preserved.
    pub fn reproject(&self, target: Epsg) -> Result<Polygon> {
        let transformer = CoordinateTransformer::from_epsg(self.epsg, target)?;
        let mut ring = self.ring.clone();
        transformer.transform_points_in_place(&mut ring)?;

        log::debug!("Reprojected polygon with {} vertices from {} to {}", ring.len(), self.epsg, target);
        Ok(Polygon { ring, epsg: target })
    }

    /// Absolute enclosed area in squared crs units (shoelace formula)
    pub fn area(&self) -> f64 {
        let twice_area: f64 = self
            .ring
            .windows(2)
            .map(|edge| edge[0].x() * edge[1].y() - edge[1].x() * edge[0].y())
            .sum();
        twice_area.abs() / 2.0
    }

    /// Even-odd point in polygon test, points exactly on a left or bottom edge are inside.
    pub fn contains(&self, p: Point) -> bool {
        let crossings = self.crossings_at_y(p.y());
        crossings.iter().filter(|&&x| x <= p.x()).count() % 2 == 1
    }

    /// The x coordinates where the ring crosses the horizontal line at `y`, sorted ascending.
    /// An edge counts when `y` lies in its half-open vertical span, so shared vertices are counted once.
    pub(crate) fn crossings_at_y(&self, y: f64) -> Vec<f64> {
        let mut xs: Vec<f64> = self
            .ring
            .windows(2)
            .filter_map(|edge| {
                let (p0, p1) = (edge[0], edge[1]);
                if (p0.y() <= y) == (p1.y() <= y) {
                    return None;
                }

                let t = (y - p0.y()) / (p1.y() - p0.y());
                Some(p0.x() + t * (p1.x() - p0.x()))
            })
            .collect();

        xs.sort_by(f64::total_cmp);
        xs
    }
}

#[cfg(feature = "vector-io")]
fn geometry_name(geometry: &geo_types::Geometry<f64>) -> &'static str {
    match geometry {
        geo_types::Geometry::Point(_) => "a point",
        geo_types::Geometry::Line(_) | geo_types::Geometry::LineString(_) => "a line",
        geo_types::Geometry::MultiPoint(_) => "multiple points",
        geo_types::Geometry::MultiLineString(_) => "multiple lines",
        geo_types::Geometry::MultiPolygon(_) => "multiple polygons",
        geo_types::Geometry::GeometryCollection(_) => "a geometry collection",
        _ => "an unsupported geometry",
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{crs, testutils::polygon_from_coords};

    #[test]
    fn ring_is_closed() {
        let polygon = polygon_from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], crs::epsg::GDA94_AUSTRALIAN_ALBERS);
        assert_eq!(polygon.ring().len(), 4);
        assert_eq!(polygon.ring().first(), polygon.ring().last());

        let closed = polygon_from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)], crs::epsg::GDA94_AUSTRALIAN_ALBERS);
        assert_eq!(closed.ring().len(), 4);
    }

    #[test]
    fn degenerate_polygons() {
        let line = polygon_from_coords(&[(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)], crs::epsg::WGS84);
        assert!(matches!(line.validate(), Err(Error::DegenerateGeometry(_))));

        let empty = Polygon::new(Vec::new(), crs::epsg::WGS84);
        assert!(matches!(empty.validate(), Err(Error::DegenerateGeometry(_))));
        assert!(empty.envelope().is_err());

        let nan = polygon_from_coords(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)], crs::epsg::WGS84);
        assert!(matches!(nan.validate(), Err(Error::DegenerateGeometry(_))));

        let triangle = polygon_from_coords(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], crs::epsg::WGS84);
        assert!(triangle.validate().is_ok());
    }

    #[test]
    fn envelope_and_area() -> Result<()> {
        let polygon = polygon_from_coords(&[(1.0, 2.0), (11.0, 2.0), (11.0, 7.0), (1.0, 7.0)], crs::epsg::GDA94_AUSTRALIAN_ALBERS);
        assert_eq!(polygon.envelope()?.bounds(), (1.0, 11.0, 2.0, 7.0));
        assert_relative_eq!(polygon.area(), 50.0);
        Ok(())
    }

    #[test]
    fn point_in_polygon() {
        // concave "U" shape
        let polygon = polygon_from_coords(
            &[(0.0, 0.0), (30.0, 0.0), (30.0, 30.0), (20.0, 30.0), (20.0, 10.0), (10.0, 10.0), (10.0, 30.0), (0.0, 30.0)],
            crs::epsg::GDA94_AUSTRALIAN_ALBERS,
        );

        assert!(polygon.contains(Point::new(5.0, 5.0)));
        assert!(polygon.contains(Point::new(5.0, 25.0)));
        assert!(polygon.contains(Point::new(25.0, 25.0)));
        assert!(!polygon.contains(Point::new(15.0, 25.0)));
        assert!(!polygon.contains(Point::new(-1.0, 5.0)));
        assert!(!polygon.contains(Point::new(5.0, 31.0)));
    }

    #[test_log::test]
    fn reprojection_round_trip() -> Result<()> {
        let polygon = polygon_from_coords(
            &[
                (149.6776794, -29.764141),
                (149.6776794, -29.8407056),
                (149.7652267, -29.8407056),
                (149.7662567, -29.7644391),
                (149.678366, -29.7644391),
            ],
            crs::epsg::WGS84,
        );

        let projected = polygon.reproject(crs::epsg::GDA94_AUSTRALIAN_ALBERS)?;
        assert_eq!(projected.epsg(), crs::epsg::GDA94_AUSTRALIAN_ALBERS);
        assert_eq!(projected.ring().len(), polygon.ring().len());
        assert_eq!(projected.ring().first(), projected.ring().last());
        // roughly 8.5 km by 8.5 km
        assert!(projected.area() > 50e6 && projected.area() < 90e6);

        let back = projected.reproject(crs::epsg::WGS84)?;
        for (orig, round_trip) in polygon.ring().iter().zip(back.ring()) {
            assert_relative_eq!(*orig, *round_trip, epsilon = 1e-6);
        }

        Ok(())
    }

    #[test]
    fn reproject_unknown_crs() {
        let polygon = polygon_from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], crs::epsg::WGS84);
        assert!(matches!(polygon.reproject(Epsg::new(1)), Err(Error::UnknownCrs(_))));
    }

    #[cfg(feature = "vector-io")]
    #[test]
    fn parse_geojson() -> Result<()> {
        let json = r#"{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[149.67, -29.76], [149.67, -29.84], [149.76, -29.84], [149.67, -29.76]]]
            }
        }"#;

        let polygon = Polygon::from_geojson(json)?;
        assert_eq!(polygon.epsg(), crs::epsg::WGS84);
        assert_eq!(polygon.ring().len(), 4);
        assert_eq!(polygon.ring()[1], Point::new(149.67, -29.84));

        let geometry = r#"{"type": "Polygon", "coordinates": [[[1.0, 2.0], [3.0, 2.0], [3.0, 4.0]]]}"#;
        assert_eq!(Polygon::from_geojson(geometry)?.ring().len(), 4);

        let point = r#"{"type": "Point", "coordinates": [149.67, -29.76]}"#;
        assert!(matches!(Polygon::from_geojson(point), Err(Error::DegenerateGeometry(_))));
        assert!(Polygon::from_geojson("{ not json").is_err());
        Ok(())
    }
}
