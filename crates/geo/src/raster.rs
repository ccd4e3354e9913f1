//! Dense georeferenced rasters.

use num::NumCast;

use crate::{Cell, Error, GeoReference, Nodata, RasterSize, Result};

/// Pixel types that can be stored in a [`DenseRaster`].
pub trait RasterNum: Nodata + NumCast + PartialOrd + std::fmt::Debug + Default + Send + Sync + 'static {}

impl RasterNum for u8 {}
impl RasterNum for u16 {}
impl RasterNum for u32 {}
impl RasterNum for i8 {}
impl RasterNum for i16 {}
impl RasterNum for i32 {}
impl RasterNum for i64 {}
impl RasterNum for f32 {}
impl RasterNum for f64 {}

/// Raster implementation using a dense data structure.
/// The nodata values are stored as the [`crate::Nodata::NODATA`] value for the type T in the same data buffer,
/// so no additional data is allocated for tracking nodata cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRaster<T: RasterNum> {
    meta: GeoReference,
    data: Vec<T>,
}

impl<T: RasterNum> DenseRaster<T> {
    /// Creates a raster from foreign data, the nodata value of the metadata is converted to `T::NODATA`.
    pub fn new(meta: GeoReference, mut data: Vec<T>) -> Result<Self> {
        if meta.raster_size().cell_count() != data.len() {
            return Err(Error::InvalidArgument(format!(
                "Data length ({}) does not match the raster size {}",
                data.len(),
                meta.raster_size()
            )));
        }

        process_nodata(&mut data, meta.nodata());
        let meta = meta.copy_with_nodata(T::NODATA.to_f64());
        Ok(DenseRaster { meta, data })
    }

    pub fn filled_with(val: T, meta: GeoReference) -> Self {
        let cell_count = meta.raster_size().cell_count();
        let meta = meta.copy_with_nodata(T::NODATA.to_f64());
        DenseRaster {
            meta,
            data: vec![val; cell_count],
        }
    }

    pub fn filled_with_nodata(meta: GeoReference) -> Self {
        DenseRaster::filled_with(T::NODATA, meta)
    }

    pub fn from_iter<Iter>(meta: GeoReference, iter: Iter) -> Result<Self>
    where
        Iter: Iterator<Item = Option<T>>,
    {
        let data: Vec<T> = iter.map(|v| v.unwrap_or(T::NODATA)).collect();
        DenseRaster::new(meta.copy_with_nodata(T::NODATA.to_f64()), data)
    }

    pub fn metadata(&self) -> &GeoReference {
        &self.meta
    }

    pub fn size(&self) -> RasterSize {
        self.meta.raster_size()
    }

    pub fn width(&self) -> usize {
        self.meta.columns()
    }

    pub fn height(&self) -> usize {
        self.meta.rows()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_raw_parts(self) -> (GeoReference, Vec<T>) {
        (self.meta, self.data)
    }

    /// The value at the given index, `None` for nodata
    pub fn value(&self, index: usize) -> Option<T> {
        self.data.get(index).copied().filter(|v| !v.is_nodata())
    }

    /// The value of the cell, `None` for nodata or cells off the map
    pub fn cell_value(&self, cell: Cell) -> Option<T> {
        cell.index_in(self.size()).and_then(|index| self.value(index))
    }

    pub fn set_cell_value(&mut self, cell: Cell, val: Option<T>) {
        if let Some(index) = cell.index_in(self.size()) {
            self.data[index] = val.unwrap_or(T::NODATA);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterates over the values with nodata mapped to `None`
    pub fn iter_opt(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.data.iter().map(|&v| if v.is_nodata() { None } else { Some(v) })
    }

    pub fn nodata_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nodata()).count()
    }

    pub fn contains_data(&self) -> bool {
        self.data.iter().any(|v| !v.is_nodata())
    }

    /// Converts every cell to another pixel type, values that do not fit in the target type become nodata
    pub fn cast<U: RasterNum>(&self) -> DenseRaster<U> {
        DenseRaster {
            meta: self.meta.copy_with_nodata(U::NODATA.to_f64()),
            data: self
                .data
                .iter()
                .map(|&v| {
                    if v.is_nodata() {
                        U::NODATA
                    } else {
                        NumCast::from(v).unwrap_or(U::NODATA)
                    }
                })
                .collect(),
        }
    }
}

fn process_nodata<T: RasterNum>(data: &mut [T], nodata: Option<f64>) {
    let Some(nodata) = nodata else {
        return;
    };

    if T::has_nan() && nodata.is_nan() {
        return;
    }

    if let Some(nodata) = NumCast::from(nodata) {
        data.iter_mut().for_each(|v: &mut T| v.init_nodata(nodata));
    }
}
