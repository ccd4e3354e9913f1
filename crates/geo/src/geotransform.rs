use approx::{AbsDiffEq, RelativeEq};

use crate::{Cell, CellSize, Error, Point, Result};

const ORIGIN_X: usize = 0;
const PIXEL_WIDTH: usize = 1;
const ROW_ROTATION: usize = 2;
const ORIGIN_Y: usize = 3;
const COL_ROTATION: usize = 4;
const PIXEL_HEIGHT: usize = 5;

/// Affine mapping from fractional (col, row) grid positions to map coordinates.
///
/// The coefficients use the GDAL order: origin x, pixel width, row rotation, origin y, column rotation, pixel height.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    pub const fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }

    /// North up transform without rotation
    pub fn from_top_left_and_cell_size(top_left: Point, cell_size: CellSize) -> Self {
        GeoTransform([top_left.x(), cell_size.x(), 0.0, top_left.y(), 0.0, cell_size.y()])
    }

    /// Map coordinate of a fractional grid position, (0, 0) is the top left corner of the top left cell.
    pub fn apply(&self, col: f64, row: f64) -> Point {
        let c = &self.0;
        Point::new(
            c[ORIGIN_X] + col * c[PIXEL_WIDTH] + row * c[ROW_ROTATION],
            c[ORIGIN_Y] + col * c[COL_ROTATION] + row * c[PIXEL_HEIGHT],
        )
    }

    pub fn cell_center(&self, cell: Cell) -> Point {
        self.apply(f64::from(cell.col) + 0.5, f64::from(cell.row) + 0.5)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.0[ORIGIN_X], self.0[ORIGIN_Y])
    }

    pub fn cell_size_x(&self) -> f64 {
        self.0[PIXEL_WIDTH]
    }

    /// Negative for north up rasters
    pub fn cell_size_y(&self) -> f64 {
        self.0[PIXEL_HEIGHT]
    }

    pub fn cell_size(&self) -> CellSize {
        CellSize::new(self.cell_size_x(), self.cell_size_y())
    }

    pub fn is_rotated(&self) -> bool {
        self.0[ROW_ROTATION] != 0.0 || self.0[COL_ROTATION] != 0.0
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// The transform from map coordinates to fractional (col, row) grid positions
    pub fn invert(&self) -> Result<Self> {
        let [x0, a, b, y0, d, e] = self.0;

        if !self.is_rotated() && a != 0.0 && e != 0.0 {
            return Ok(GeoTransform([-x0 / a, 1.0 / a, 0.0, -y0 / e, 0.0, 1.0 / e]));
        }

        let det = a * e - b * d;
        let scale = a.abs().max(b.abs()).max(d.abs()).max(e.abs());
        if det.abs() <= 1e-10 * scale * scale {
            return Err(Error::Runtime(format!("Geo transform can not be inverted: {self:?}")));
        }

        Ok(GeoTransform([
            (b * y0 - e * x0) / det,
            e / det,
            -b / det,
            (d * x0 - a * y0) / det,
            -d / det,
            a / det,
        ]))
    }
}

impl std::fmt::Debug for GeoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x0, a, b, y0, d, e] = self.0;
        if self.is_rotated() {
            write!(f, "GeoTransform([{x0}, {a}, {b}, {y0}, {d}, {e}])")
        } else {
            write!(f, "GeoTransform(origin: ({x0}, {y0}), cell size: ({a}, {e}))")
        }
    }
}

impl AbsDiffEq for GeoTransform {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for GeoTransform {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}
