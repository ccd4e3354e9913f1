//! Axis aligned envelopes for spatial operations.

use approx::{AbsDiffEq, RelativeEq};

use crate::{CellSize, Point};

/// Axis aligned rectangle, stored as its north west and south east corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    top_left: Point,
    bottom_right: Point,
}

impl Rect {
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let top_left = Point::new(p1.x().min(p2.x()), p1.y().max(p2.y()));
        let bottom_right = Point::new(p1.x().max(p2.x()), p1.y().min(p2.y()));

        Rect { top_left, bottom_right }
    }

    pub fn from_bounds(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Rect::from_points(Point::new(min_x, max_y), Point::new(max_x, min_y))
    }

    /// The envelope of a set of points, `None` if the iterator is empty
    pub fn enclosing<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x(), first.x(), first.y(), first.y());
        for p in iter {
            min_x = min_x.min(p.x());
            max_x = max_x.max(p.x());
            min_y = min_y.min(p.y());
            max_y = max_y.max(p.y());
        }

        Some(Rect::from_bounds(min_x, max_x, min_y, max_y))
    }

    /// Returns the bounds as `(min_x, max_x, min_y, max_y)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.min_x(), self.max_x(), self.min_y(), self.max_y())
    }

    pub fn min_x(&self) -> f64 {
        self.top_left.x()
    }

    pub fn max_x(&self) -> f64 {
        self.bottom_right.x()
    }

    pub fn min_y(&self) -> f64 {
        self.bottom_right.y()
    }

    pub fn max_y(&self) -> f64 {
        self.top_left.y()
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.max_y() > other.min_y()
            && self.min_y() < other.max_y()
    }

    /// The overlapping area of both rectangles, `None` when they do not overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        Some(Rect::from_bounds(
            self.min_x().max(other.min_x()),
            self.max_x().min(other.max_x()),
            self.min_y().max(other.min_y()),
            self.max_y().min(other.max_y()),
        ))
    }

    /// Grows the rectangle by `distance` on every side
    pub fn buffered(&self, distance: f64) -> Rect {
        Rect::from_bounds(
            self.min_x() - distance,
            self.max_x() + distance,
            self.min_y() - distance,
            self.max_y() + distance,
        )
    }

    /// Snaps the rectangle outwards so every edge is a multiple of the cell size.
    /// The aligned extent always contains the original extent.
    pub fn aligned_to(&self, cell_size: CellSize) -> Rect {
        let res_x = cell_size.x().abs();
        let res_y = cell_size.y().abs();

        Rect::from_bounds(
            (self.min_x() / res_x).floor() * res_x,
            (self.max_x() / res_x).ceil() * res_x,
            (self.min_y() / res_y).floor() * res_y,
            (self.max_y() / res_y).ceil() * res_y,
        )
    }
}

impl AbsDiffEq for Rect {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.top_left.abs_diff_eq(&other.top_left, epsilon) && self.bottom_right.abs_diff_eq(&other.bottom_right, epsilon)
    }
}

impl RelativeEq for Rect {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.top_left.relative_eq(&other.top_left, epsilon, max_relative)
            && self.bottom_right.relative_eq(&other.bottom_right, epsilon, max_relative)
    }
}
