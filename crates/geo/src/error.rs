use thiserror::Error;

use crate::Epsg;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown coordinate reference system: {0}")]
    UnknownCrs(Epsg),
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error("The polygon does not cover the center of any raster cell")]
    EmptyMask,
    #[error("Raster dimensions do not match ({}x{}) <-> ({}x{})", .size1.0, .size1.1, .size2.0, .size2.1)]
    SizeMismatch {
        size1: (usize, usize),
        size2: (usize, usize),
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("Projection error: {0}")]
    ProjectionError(#[from] proj4rs::errors::Error),
    #[cfg(feature = "vector-io")]
    #[error("Invalid GeoJSON: {0}")]
    GeoJsonError(#[from] geozero::error::GeozeroError),
}
