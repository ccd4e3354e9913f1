#![warn(clippy::unwrap_used)]

//! Slope and land cover statistics of the raster cells inside a polygon.

pub type Result<T = ()> = std::result::Result<T, Error>;

pub mod config;
pub mod crosstab;
mod error;
pub mod loader;
pub mod lookup;
pub mod pipeline;
pub mod report;
pub mod slope;

pub use config::PipelineConfig;
#[doc(inline)]
pub use crosstab::{CrossTab, CrossTabEntry, cross_tabulate, tabulate_single};
#[doc(inline)]
pub use error::Error;
pub use error::ErrorKind;
#[doc(inline)]
pub use loader::{GridDocument, InMemoryCatalog, ProductLoader};
pub use lookup::CategoryLookup;
#[doc(inline)]
pub use pipeline::{Analysis, DisplayContext, Pipeline, PipelineState};
#[doc(inline)]
pub use report::{CategoryKey, CoverageReport, CoverageRow, build_joint_report, build_report};
#[doc(inline)]
pub use slope::{SlopeCategory, SlopeSurface, derive_slope};
