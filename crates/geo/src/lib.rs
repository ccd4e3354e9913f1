#![warn(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod cell;
mod coordinatetransformer;
pub mod crs;
mod error;
mod georeference;
mod geotransform;
mod mask;
mod nodata;
mod polygon;
pub mod raster;
pub mod rasterize;
mod rastersize;
pub mod rect;

#[cfg(test)]
mod testutils;

pub use cell::Cell;
pub use cell::CellIterator;
pub use coordinatetransformer::CoordinateTransformer;
#[doc(inline)]
pub use crs::Epsg;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use georeference::CellSize;
#[doc(inline)]
pub use georeference::GeoReference;
#[doc(inline)]
pub use geotransform::GeoTransform;
#[doc(inline)]
pub use mask::Mask;
pub use nodata::Nodata;
#[doc(inline)]
pub use polygon::Polygon;
#[doc(inline)]
pub use raster::DenseRaster;
#[doc(inline)]
pub use raster::RasterNum;
#[doc(inline)]
pub use rastersize::RasterSize;
#[doc(inline)]
pub use rect::Rect;

pub type Point<T = f64> = geo_types::Point<T>;
