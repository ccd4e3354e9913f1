use approx::{AbsDiffEq, RelativeEq};
use num::{NumCast, ToPrimitive};

use crate::{Cell, Epsg, Error, GeoTransform, Point, RasterSize, Rect, Result};

/// Signed cell size pair, y is negative for north up rasters.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSize {
    x: f64,
    y: f64,
}

impl CellSize {
    pub const fn new(x: f64, y: f64) -> Self {
        CellSize { x, y }
    }

    /// Square north up cells
    pub const fn square(size: f64) -> Self {
        CellSize::new(size, -size)
    }

    pub fn is_valid(&self) -> bool {
        self.x != 0.0 && self.y != 0.0 && self.x.is_finite() && self.y.is_finite()
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// The surface covered by a single cell in squared map units
    pub fn area(&self) -> f64 {
        (self.x * self.y).abs()
    }
}

impl AbsDiffEq for CellSize {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        f64::abs_diff_eq(&self.x, &other.x, epsilon) && f64::abs_diff_eq(&self.y, &other.y, epsilon)
    }
}

impl RelativeEq for CellSize {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        f64::relative_eq(&self.x, &other.x, epsilon, max_relative) && f64::relative_eq(&self.y, &other.y, epsilon, max_relative)
    }
}

/// Everything needed to position a raster on the map: its size, affine transform, crs and nodata value.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GeoReference {
    epsg: Option<Epsg>,
    size: RasterSize,
    geo_transform: GeoTransform,
    nodata: Option<f64>,
}

impl GeoReference {
    pub fn new<T: ToPrimitive>(epsg: Option<Epsg>, size: RasterSize, geo_transform: GeoTransform, nodata: Option<T>) -> Self {
        GeoReference {
            epsg,
            size,
            geo_transform,
            nodata: nodata.and_then(|v| v.to_f64()),
        }
    }

    /// Creates a north up georeference with the top left corner at `top_left`
    pub fn with_top_left<T: NumCast>(epsg: Option<Epsg>, size: RasterSize, top_left: Point, cell_size: CellSize, nodata: Option<T>) -> Self {
        GeoReference::new(epsg, size, GeoTransform::from_top_left_and_cell_size(top_left, cell_size), nodata)
    }

    /// Creates a north up georeference that covers the provided extent.
    /// The extent is expected to be aligned to the cell size, partial cells are added otherwise.
    pub fn covering_extent(epsg: Option<Epsg>, extent: &Rect, cell_size: CellSize) -> Result<Self> {
        if !cell_size.is_valid() {
            return Err(Error::InvalidArgument(format!("Invalid cell size: {cell_size:?}")));
        }

        let res_x = cell_size.x().abs();
        let res_y = cell_size.y().abs();
        let cols = (extent.width() / res_x - 1e-9).ceil().max(0.0) as usize;
        let rows = (extent.height() / res_y - 1e-9).ceil().max(0.0) as usize;

        Ok(GeoReference::with_top_left::<f64>(
            epsg,
            RasterSize::with_rows_cols(rows, cols),
            Point::new(extent.min_x(), extent.max_y()),
            CellSize::new(res_x, -res_y),
            None,
        ))
    }

    pub fn copy_with_nodata<T: ToPrimitive>(&self, nodata: Option<T>) -> Self {
        GeoReference {
            nodata: nodata.and_then(|v| v.to_f64()),
            ..self.clone()
        }
    }

    pub fn epsg(&self) -> Option<Epsg> {
        self.epsg
    }

    pub fn raster_size(&self) -> RasterSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn columns(&self) -> usize {
        self.size.cols
    }

    pub fn geo_transform(&self) -> GeoTransform {
        self.geo_transform
    }

    pub fn cell_size(&self) -> CellSize {
        self.geo_transform.cell_size()
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn cell_center(&self, cell: Cell) -> Point {
        self.geo_transform.cell_center(cell)
    }

    /// The cell that contains the point, which can be off the map
    pub fn point_to_cell(&self, p: Point) -> Result<Cell> {
        let inv = self.geo_transform.invert()?;
        let grid_pos = inv.apply(p.x(), p.y());
        Ok(Cell::from_row_col(grid_pos.y().floor() as i32, grid_pos.x().floor() as i32))
    }

    pub fn is_cell_on_map(&self, cell: Cell) -> bool {
        cell.is_on(self.size)
    }

    pub fn bounding_box(&self) -> Rect {
        let corners = [
            self.geo_transform.apply(0.0, 0.0),
            self.geo_transform.apply(self.size.cols as f64, 0.0),
            self.geo_transform.apply(0.0, self.size.rows as f64),
            self.geo_transform.apply(self.size.cols as f64, self.size.rows as f64),
        ];

        Rect::enclosing(corners).unwrap_or_else(|| Rect::from_bounds(0.0, 0.0, 0.0, 0.0))
    }

    /// Two georeferences are aligned when rasters using them can be combined cell by cell
    pub fn is_aligned_with(&self, other: &GeoReference) -> bool {
        self.size == other.size && self.geo_transform.relative_eq(&other.geo_transform, 1e-9, 1e-12)
    }
}
