//! Polygon to raster conversion.

use crate::{Cell, Error, GeoReference, Mask, Polygon, Result, cell::CellIterator};

/// Burns the polygon into a mask aligned with the provided georeference.
///
/// A cell is part of the mask if and only if its center lies inside the polygon.
/// Cells that are only partially covered by the polygon without covering their center are not included.
///
/// Returns [`Error::EmptyMask`] when no cell center is covered.
pub fn build_mask(polygon: &Polygon, meta: &GeoReference) -> Result<Mask> {
    if let Some(epsg) = meta.epsg() {
        if epsg != polygon.epsg() {
            return Err(Error::InvalidArgument(format!(
                "Polygon crs ({}) does not match the raster crs ({})",
                polygon.epsg(),
                epsg
            )));
        }
    }

    let mut mask = Mask::empty_for(meta);
    if meta.raster_size().is_empty() || !polygon.envelope()?.intersects(&meta.bounding_box()) {
        return Err(Error::EmptyMask);
    }

    let gt = meta.geo_transform();
    if gt.is_rotated() || gt.cell_size_x() <= 0.0 {
        burn_cell_by_cell(polygon, &mut mask);
    } else {
        burn_scanlines(polygon, &mut mask);
    }

    let count = mask.count();
    log::debug!("Polygon mask covers {count} of {} cells", meta.raster_size().cell_count());
    if count == 0 {
        return Err(Error::EmptyMask);
    }

    Ok(mask)
}

/// Scanline fill for north up rasters: every row center is intersected with the polygon edges
/// and the cells whose centers fall between pairs of crossings are set.
fn burn_scanlines(polygon: &Polygon, mask: &mut Mask) {
    let size = mask.size();
    let gt = mask.metadata().geo_transform();
    let origin_x = gt.top_left().x();
    let cell_width = gt.cell_size_x();

    // First and one past the last column whose center is in [x_start, x_end)
    let col_range = |x_start: f64, x_end: f64| {
        let first = ((x_start - origin_x) / cell_width - 0.5).ceil().clamp(0.0, size.cols as f64) as usize;
        let last = ((x_end - origin_x) / cell_width - 0.5).ceil().clamp(0.0, size.cols as f64) as usize;
        first..last.max(first)
    };

    for row in 0..size.rows {
        let center_y = gt.cell_center(Cell::from_row_col(row as i32, 0)).y();
        let crossings = polygon.crossings_at_y(center_y);

        for span in crossings.chunks_exact(2) {
            let cols = col_range(span[0], span[1]);
            if !cols.is_empty() {
                mask.set_row_range(row, cols);
            }
        }
    }
}

fn burn_cell_by_cell(polygon: &Polygon, mask: &mut Mask) {
    let meta = mask.metadata().clone();
    for cell in CellIterator::for_raster_with_size(meta.raster_size()) {
        if polygon.contains(meta.cell_center(cell)) {
            mask.set_row_range(cell.row as usize, cell.col as usize..cell.col as usize + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CellSize, GeoTransform, Point, RasterSize, crs,
        testutils::{polygon_from_coords, test_georeference},
    };

    const ALBERS: crate::Epsg = crs::epsg::GDA94_AUSTRALIAN_ALBERS;

    #[test_log::test]
    fn rectangle_covering_cell_centers() -> Result<()> {
        // 4x4 grid of 10m cells, origin top left at (0, 0), y decreases downwards
        let meta = test_georeference(4, 4, 10.0);
        // covers the centers of columns 1 and 2 in rows 1 and 2
        let polygon = polygon_from_coords(&[(12.0, -12.0), (28.0, -12.0), (28.0, -28.0), (12.0, -28.0)], ALBERS);

        let mask = build_mask(&polygon, &meta)?;
        #[rustfmt::skip]
        let expected = vec![
            false, false, false, false,
            false, true,  true,  false,
            false, true,  true,  false,
            false, false, false, false,
        ];
        assert_eq!(mask.as_slice(), expected.as_slice());
        assert_eq!(mask.count(), 4);
        assert_eq!(mask.size(), meta.raster_size());
        Ok(())
    }

    #[test]
    fn partially_covered_cells_are_excluded() {
        let meta = test_georeference(4, 4, 10.0);
        // overlaps cell (0, 0) up to 4m from its corner, the center at (5, -5) is not covered
        let polygon = polygon_from_coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, -4.0), (0.0, -4.0)], ALBERS);
        assert!(matches!(build_mask(&polygon, &meta), Err(Error::EmptyMask)));
    }

    #[test]
    fn polygon_outside_grid() {
        let meta = test_georeference(4, 4, 10.0);
        let polygon = polygon_from_coords(&[(100.0, 100.0), (200.0, 100.0), (200.0, 200.0)], ALBERS);
        assert!(matches!(build_mask(&polygon, &meta), Err(Error::EmptyMask)));
    }

    #[test]
    fn polygon_larger_than_grid() -> Result<()> {
        let meta = test_georeference(3, 5, 10.0);
        let polygon = polygon_from_coords(&[(-100.0, 100.0), (100.0, 100.0), (100.0, -100.0), (-100.0, -100.0)], ALBERS);
        let mask = build_mask(&polygon, &meta)?;
        assert_eq!(mask.count(), meta.raster_size().cell_count());
        Ok(())
    }

    #[test_log::test]
    fn triangle_mask_does_not_exceed_grid() -> Result<()> {
        let meta = test_georeference(20, 20, 1.0);
        let polygon = polygon_from_coords(&[(-5.0, 5.0), (25.0, 5.0), (10.0, -25.0)], ALBERS);
        let mask = build_mask(&polygon, &meta)?;

        assert!(mask.count() <= meta.raster_size().cell_count());
        for row in 0..20 {
            for col in 0..20 {
                let cell = Cell::from_row_col(row, col);
                assert_eq!(mask.is_set(cell), polygon.contains(meta.cell_center(cell)), "cell {cell:?}");
            }
        }

        Ok(())
    }

    #[test]
    fn concave_polygon() -> Result<()> {
        let meta = test_georeference(3, 3, 10.0);
        // "U" shape leaving out the center column of the top two rows
        let polygon = polygon_from_coords(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, -20.0), (20.0, -20.0), (20.0, 0.0), (30.0, 0.0), (30.0, -30.0), (0.0, -30.0)],
            ALBERS,
        );

        let mask = build_mask(&polygon, &meta)?;
        #[rustfmt::skip]
        let expected = vec![
            true, false, true,
            true, false, true,
            true, true,  true,
        ];
        assert_eq!(mask.as_slice(), expected.as_slice());
        Ok(())
    }

    #[test]
    fn rotated_grid_uses_point_in_polygon() -> Result<()> {
        let meta = GeoReference::new::<f64>(
            Some(ALBERS),
            RasterSize::with_rows_cols(10, 10),
            GeoTransform::new([0.0, 1.0, 0.1, 0.0, 0.1, -1.0]),
            None,
        );
        let polygon = polygon_from_coords(&[(2.0, -2.0), (8.0, -2.0), (8.0, -8.0), (2.0, -8.0)], ALBERS);
        let mask = build_mask(&polygon, &meta)?;

        for row in 0..10 {
            for col in 0..10 {
                let cell = Cell::from_row_col(row, col);
                assert_eq!(mask.is_set(cell), polygon.contains(meta.cell_center(cell)));
            }
        }
        Ok(())
    }

    #[test]
    fn crs_mismatch() {
        let meta = GeoReference::with_top_left::<f64>(
            Some(crs::epsg::WGS84),
            RasterSize::square(2),
            Point::new(0.0, 0.0),
            CellSize::square(1.0),
            None,
        );
        let polygon = polygon_from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, -1.0)], ALBERS);
        assert!(matches!(build_mask(&polygon, &meta), Err(Error::InvalidArgument(_))));
    }
}
