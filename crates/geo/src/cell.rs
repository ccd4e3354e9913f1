use crate::RasterSize;

/// Row and column of a raster cell, ordered row major.
/// Cells with negative or too large indices are off the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn from_row_col(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    pub fn left(&self) -> Cell {
        Cell::from_row_col(self.row, self.col - 1)
    }

    pub fn right(&self) -> Cell {
        Cell::from_row_col(self.row, self.col + 1)
    }

    pub fn above(&self) -> Cell {
        Cell::from_row_col(self.row - 1, self.col)
    }

    pub fn below(&self) -> Cell {
        Cell::from_row_col(self.row + 1, self.col)
    }

    /// Row major index of the cell in a raster with the given size, `None` when the cell is off the raster
    pub fn index_in(&self, size: RasterSize) -> Option<usize> {
        self.is_on(size).then(|| self.row as usize * size.cols + self.col as usize)
    }

    pub fn is_on(&self, size: RasterSize) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as usize) < size.rows && (self.col as usize) < size.cols
    }
}

/// Visits every cell of a raster in row major order
pub struct CellIterator {
    size: RasterSize,
    current: Cell,
}

impl CellIterator {
    pub fn for_raster_with_size(size: RasterSize) -> Self {
        CellIterator {
            size,
            current: Cell::from_row_col(0, 0),
        }
    }
}

impl Iterator for CellIterator {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.size.cols == 0 || self.current.row as usize >= self.size.rows {
            return None;
        }

        let current = self.current;
        self.current.col += 1;
        if self.current.col as usize >= self.size.cols {
            self.current.col = 0;
            self.current.row += 1;
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_index() {
        let size = RasterSize::with_rows_cols(3, 4);
        assert_eq!(Cell::from_row_col(0, 0).index_in(size), Some(0));
        assert_eq!(Cell::from_row_col(2, 3).index_in(size), Some(11));
        assert_eq!(Cell::from_row_col(3, 0).index_in(size), None);
        assert_eq!(Cell::from_row_col(0, -1).index_in(size), None);
    }

    #[test]
    fn iterate_cells() {
        let cells: Vec<Cell> = CellIterator::for_raster_with_size(RasterSize::with_rows_cols(2, 2)).collect();
        assert_eq!(
            cells,
            vec![
                Cell::from_row_col(0, 0),
                Cell::from_row_col(0, 1),
                Cell::from_row_col(1, 0),
                Cell::from_row_col(1, 1)
            ]
        );

        assert_eq!(CellIterator::for_raster_with_size(RasterSize::empty()).count(), 0);
    }
}
