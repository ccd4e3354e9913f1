use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::{Env, TimestampPrecision};
use geo::{Epsg, Polygon};
use strum::{Display, EnumString};
use zonal::{Analysis, CategoryLookup, DisplayContext, InMemoryCatalog, Pipeline, PipelineConfig};

pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "kebab_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[clap(name = "slopecover", about = "Slope and land cover statistics of a drawn polygon")]
pub struct Opt {
    /// GeoJSON polygon or feature in WGS84
    #[arg(long = "polygon", short = 'p')]
    pub polygon: PathBuf,

    /// JSON catalog containing the elevation and land cover grids
    #[arg(long = "catalog", short = 'c', env = "SLOPECOVER_CATALOG")]
    pub catalog: PathBuf,

    #[arg(long = "config", env = "SLOPECOVER_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long = "working-crs", env = "SLOPECOVER_WORKING_CRS", value_name = "EPSG:code")]
    pub working_crs: Option<Epsg>,

    #[arg(long = "resolution", short = 'r', env = "SLOPECOVER_RESOLUTION")]
    pub resolution: Option<f64>,

    #[arg(long = "elevation-product")]
    pub elevation_product: Option<String>,

    #[arg(long = "land-cover-product")]
    pub land_cover_product: Option<String>,

    /// JSON object mapping land cover class ids to names
    #[arg(long = "land-cover-lookup")]
    pub land_cover_lookup: Option<PathBuf>,

    /// JSON object mapping slope category ids to labels
    #[arg(long = "slope-lookup")]
    pub slope_lookup: Option<PathBuf>,

    #[arg(long = "format", short = 'f', default_value = "table", value_name = "table|json")]
    pub format: OutputFormat,
}

impl Opt {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path).with_context(|| format!("Failed to read config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(crs) = self.working_crs {
            config.working_crs = crs;
        }

        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }

        if let Some(product) = &self.elevation_product {
            config.elevation_product = product.clone();
        }

        if let Some(product) = &self.land_cover_product {
            config.land_cover_product = product.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn print_analysis(analysis: &Analysis, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(analysis)?),
        OutputFormat::Table => {
            println!(
                "{} cells inside the polygon, {} with land cover and slope data ({} m² per cell)\n",
                analysis.masked_cells, analysis.valid_cells, analysis.pixel_area_m2
            );

            for report in [&analysis.land_cover, &analysis.slope, &analysis.joint] {
                println!("{report}");
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = opt.pipeline_config()?;
    log::debug!("Configuration: {config:?}");

    let polygon = Polygon::from_geojson(
        &std::fs::read_to_string(&opt.polygon).with_context(|| format!("Failed to read polygon {}", opt.polygon.display()))?,
    )?;

    let catalog = InMemoryCatalog::from_file(&opt.catalog).with_context(|| format!("Failed to read catalog {}", opt.catalog.display()))?;

    let mut pipeline = Pipeline::new(catalog, config);
    if let Some(path) = &opt.land_cover_lookup {
        pipeline = pipeline.with_land_cover_lookup(CategoryLookup::from_file(path)?);
    }

    if let Some(path) = &opt.slope_lookup {
        pipeline = pipeline.with_slope_lookup(CategoryLookup::from_file(path)?);
    }

    let mut ctx = DisplayContext::new();
    let result = pipeline.run(&polygon, &mut ctx);
    let analysis = result.with_context(|| ctx.status_message().to_string())?;

    print_analysis(&analysis, opt.format)?;
    eprintln!("{}", ctx.status_message());

    Ok(())
}
