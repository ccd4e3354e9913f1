use std::path::Path;

use geo::{CellSize, Epsg, crs};

use crate::{Error, Result};

/// Settings of the zonal statistics pipeline, missing fields use the defaults
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Projected crs in which the rasters are loaded and the statistics calculated
    pub working_crs: Epsg,
    /// Cell size in meters of the grid shared by both products
    pub resolution: f64,
    pub elevation_product: String,
    pub land_cover_product: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            working_crs: crs::epsg::GDA94_AUSTRALIAN_ALBERS,
            resolution: 5.0,
            elevation_product: "dem_5m".to_string(),
            land_cover_product: "ga_ls_landcover".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(Error::InvalidConfiguration(format!("resolution must be positive, got {}", self.resolution)));
        }

        if self.elevation_product.is_empty() || self.land_cover_product.is_empty() {
            return Err(Error::InvalidConfiguration("product names can not be empty".into()));
        }

        if !self.working_crs.is_known() {
            return Err(Error::InvalidConfiguration(format!("unsupported working crs {}", self.working_crs)));
        }

        Ok(())
    }

    /// Square north up cells of the configured resolution
    pub fn cell_size(&self) -> CellSize {
        CellSize::square(self.resolution)
    }

    /// Surface of a single cell in square meters
    pub fn pixel_area_m2(&self) -> f64 {
        self.cell_size().area()
    }
}
