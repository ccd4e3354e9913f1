//! Zonal slope and land cover statistics of drawn polygons.

pub use geo;
pub use zonal;
