use crate::{CellSize, Epsg, GeoReference, Point, Polygon, RasterSize, crs};

pub const NOD: f64 = 255.0;

/// North up georeference in the working crs with the top left corner at the origin
pub fn test_georeference(rows: usize, cols: usize, cell_size: f64) -> GeoReference {
    GeoReference::with_top_left(
        Some(crs::epsg::GDA94_AUSTRALIAN_ALBERS),
        RasterSize::with_rows_cols(rows, cols),
        Point::new(0.0, 0.0),
        CellSize::square(cell_size),
        Some(NOD),
    )
}

pub fn polygon_from_coords(coords: &[(f64, f64)], epsg: Epsg) -> Polygon {
    Polygon::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect(), epsg)
}
