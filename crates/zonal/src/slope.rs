//! Terrain slope derivation and classification.

use geo::{Cell, CellIterator, DenseRaster, RasterNum};

use crate::{Error, Result};

/// Upper bounds (exclusive) in degrees of the slope categories 0 to 4, category 5 is unbounded.
pub const SLOPE_CATEGORY_BOUNDS: [f64; 5] = [5.0, 11.0, 18.0, 26.0, 35.0];

/// Ordinal terrain steepness class, 0 (flat) to 5 (very steep).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlopeCategory(u8);

impl SlopeCategory {
    pub const COUNT: usize = SLOPE_CATEGORY_BOUNDS.len() + 1;

    /// Classifies a slope angle in degrees using half-open intervals, `None` for undefined angles
    pub fn from_angle(degrees: f64) -> Option<Self> {
        if degrees.is_nan() || degrees < 0.0 {
            return None;
        }

        let category = SLOPE_CATEGORY_BOUNDS.iter().take_while(|&&bound| degrees >= bound).count();
        Some(SlopeCategory(category as u8))
    }

    pub fn from_id(id: u8) -> Option<Self> {
        ((id as usize) < Self::COUNT).then_some(SlopeCategory(id))
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    /// The lower (inclusive) and upper (exclusive) angle of the category in degrees
    pub fn degree_range(&self) -> (f64, Option<f64>) {
        let index = self.0 as usize;
        let lower = if index == 0 { 0.0 } else { SLOPE_CATEGORY_BOUNDS[index - 1] };
        (lower, SLOPE_CATEGORY_BOUNDS.get(index).copied())
    }

    pub fn all() -> impl Iterator<Item = SlopeCategory> {
        (0..Self::COUNT as u8).map(SlopeCategory)
    }
}

/// Slope angles and their categories, both aligned with the elevation raster they were derived from.
/// Undefined cells are nodata in both rasters.
#[derive(Debug, Clone)]
pub struct SlopeSurface {
    pub angles: DenseRaster<f32>,
    pub categories: DenseRaster<u8>,
}

impl SlopeSurface {
    pub fn angle(&self, cell: Cell) -> Option<f32> {
        self.angles.cell_value(cell)
    }

    pub fn category(&self, cell: Cell) -> Option<SlopeCategory> {
        self.categories.cell_value(cell).and_then(SlopeCategory::from_id)
    }
}

/// Computes the slope angle in degrees of every elevation cell and classifies it.
///
/// The gradient uses central differences, falling back to forward or backward differences on the raster edges
/// and next to nodata cells. A nodata elevation yields an undefined slope, as does a cell without any valid
/// neighbour along an axis of more than one cell.
pub fn derive_slope<T: RasterNum>(elevation: &DenseRaster<T>, cell_size_x: f64, cell_size_y: f64) -> Result<SlopeSurface> {
    let dx = cell_size_x.abs();
    let dy = cell_size_y.abs();
    if dx == 0.0 || dy == 0.0 || !dx.is_finite() || !dy.is_finite() {
        return Err(Error::Geo(geo::Error::InvalidArgument(format!(
            "Invalid cell size for slope calculation: ({cell_size_x}, {cell_size_y})"
        ))));
    }

    let meta = elevation.metadata().clone();
    let mut angles = DenseRaster::<f32>::filled_with_nodata(meta.clone());
    let mut categories = DenseRaster::<u8>::filled_with_nodata(meta);

    let height = |cell: Cell| elevation.cell_value(cell).and_then(|v| v.to_f64());

    for cell in CellIterator::for_raster_with_size(elevation.size()) {
        let Some(center) = height(cell) else {
            continue;
        };

        let gx = axis_gradient(center, height(cell.left()), height(cell.right()), dx, elevation.width());
        let gy = axis_gradient(center, height(cell.above()), height(cell.below()), dy, elevation.height());

        if let (Some(gx), Some(gy)) = (gx, gy) {
            let angle = (gx * gx + gy * gy).sqrt().atan().to_degrees();
            angles.set_cell_value(cell, Some(angle as f32));
            categories.set_cell_value(cell, SlopeCategory::from_angle(angle).map(|cat| cat.id()));
        }
    }

    log::debug!(
        "Derived slope for {} cells, {} undefined",
        elevation.len(),
        categories.nodata_count()
    );

    Ok(SlopeSurface { angles, categories })
}

fn axis_gradient(center: f64, prev: Option<f64>, next: Option<f64>, spacing: f64, axis_len: usize) -> Option<f64> {
    if axis_len < 2 {
        return Some(0.0);
    }

    match (prev, next) {
        (Some(prev), Some(next)) => Some((next - prev) / (2.0 * spacing)),
        (None, Some(next)) => Some((next - center) / spacing),
        (Some(prev), None) => Some((center - prev) / spacing),
        (None, None) => None,
    }
}
