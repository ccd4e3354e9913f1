use crate::{Cell, Error, GeoReference, RasterSize, Result};

/// Boolean raster marking the cells that belong to a region of interest.
/// A mask shares the georeference of the raster it was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    meta: GeoReference,
    data: Vec<bool>,
}

impl Mask {
    pub fn new(meta: GeoReference, data: Vec<bool>) -> Result<Self> {
        if meta.raster_size().cell_count() != data.len() {
            return Err(Error::SizeMismatch {
                size1: (meta.rows(), meta.columns()),
                size2: (data.len(), 1),
            });
        }

        Ok(Mask { meta, data })
    }

    pub fn empty_for(meta: &GeoReference) -> Self {
        Mask {
            data: vec![false; meta.raster_size().cell_count()],
            meta: meta.clone(),
        }
    }

    pub fn metadata(&self) -> &GeoReference {
        &self.meta
    }

    pub fn size(&self) -> RasterSize {
        self.meta.raster_size()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    pub fn is_set(&self, cell: Cell) -> bool {
        cell.index_in(self.size()).is_some_and(|index| self.data[index])
    }

    pub(crate) fn set_row_range(&mut self, row: usize, cols: std::ops::Range<usize>) {
        let offset = row * self.size().cols;
        self.data[offset + cols.start..offset + cols.end].fill(true);
    }

    /// Number of cells inside the mask
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }
}
