//! Orchestration of a single zonal statistics request.

use std::fmt;

use geo::{Polygon, rasterize};

use crate::{
    Error, Result,
    config::PipelineConfig,
    crosstab::{self, CrossTabEntry},
    loader::ProductLoader,
    lookup::CategoryLookup,
    report::{self, CoverageReport},
    slope,
};

/// Colour cycle used to distinguish consecutive polygons on the map and in the charts
pub const POLYGON_COLOURS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Reprojecting,
    Resolving,
    Loading,
    Masking,
    Deriving,
    Tabulating,
    Reporting,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Reprojecting => "reprojecting",
            PipelineState::Resolving => "resolving",
            PipelineState::Loading => "loading",
            PipelineState::Masking => "masking",
            PipelineState::Deriving => "deriving",
            PipelineState::Tabulating => "tabulating",
            PipelineState::Reporting => "reporting",
        };

        f.write_str(name)
    }
}

/// Result of a successful analysis of one polygon.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Analysis {
    /// Sequence number of the polygon in the display context, starting at 0
    pub polygon_number: usize,
    pub colour: &'static str,
    pub land_cover: CoverageReport,
    pub slope: CoverageReport,
    pub joint: CoverageReport,
    pub entries: Vec<CrossTabEntry>,
    /// Cells with their center inside the polygon
    pub masked_cells: usize,
    /// Masked cells with both a land cover class and a slope category
    pub valid_cells: u64,
    pub pixel_area_m2: f64,
}

/// State owned by the caller that outlives a single analysis
#[derive(Debug, Clone, Default)]
pub struct DisplayContext {
    polygon_count: usize,
    last_analysis: Option<Analysis>,
    status: String,
}

impl DisplayContext {
    pub fn new() -> Self {
        DisplayContext::default()
    }

    /// Number of successfully analysed polygons
    pub fn polygon_count(&self) -> usize {
        self.polygon_count
    }

    /// The colour that will be assigned to the next polygon
    pub fn next_colour(&self) -> &'static str {
        POLYGON_COLOURS[self.polygon_count % POLYGON_COLOURS.len()]
    }

    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last_analysis.as_ref()
    }

    pub fn status_message(&self) -> &str {
        &self.status
    }
}

/// Runs the zonal statistics of a polygon against the elevation and land cover products.
pub struct Pipeline<L: ProductLoader> {
    loader: L,
    config: PipelineConfig,
    land_cover_lookup: CategoryLookup,
    slope_lookup: CategoryLookup,
    state: PipelineState,
}

impl<L: ProductLoader> Pipeline<L> {
    pub fn new(loader: L, config: PipelineConfig) -> Self {
        Pipeline {
            loader,
            config,
            land_cover_lookup: CategoryLookup::dea_land_cover(),
            slope_lookup: CategoryLookup::slope_categories(),
            state: PipelineState::Idle,
        }
    }

    pub fn with_land_cover_lookup(mut self, lookup: CategoryLookup) -> Self {
        self.land_cover_lookup = lookup;
        self
    }

    pub fn with_slope_lookup(mut self, lookup: CategoryLookup) -> Self {
        self.slope_lookup = lookup;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Analyses the polygon and stores the result in the display context.
    ///
    /// On failure the pipeline returns to idle, the status message of the context describes the failure
    /// and the previous analysis of the context is kept.
    pub fn run(&mut self, polygon: &Polygon, ctx: &mut DisplayContext) -> Result<Analysis> {
        match self.analyse(polygon, ctx.polygon_count, ctx.next_colour()) {
            Ok(analysis) => {
                self.transition(PipelineState::Idle);
                log::info!(
                    "Polygon {} analysed: {} valid of {} masked cells",
                    analysis.polygon_number,
                    analysis.valid_cells,
                    analysis.masked_cells
                );

                ctx.polygon_count += 1;
                ctx.status = format!("Polygon {} successfully added to the plot.", analysis.polygon_number + 1);
                ctx.last_analysis = Some(analysis.clone());
                Ok(analysis)
            }
            Err(err) => {
                log::warn!("Analysis failed while {}: {err}", self.state);
                self.transition(PipelineState::Idle);
                ctx.status = err.status_message();
                Err(err)
            }
        }
    }

    fn transition(&mut self, state: PipelineState) {
        log::debug!("Pipeline state: {} -> {}", self.state, state);
        self.state = state;
    }

    fn analyse(&mut self, polygon: &Polygon, polygon_number: usize, colour: &'static str) -> Result<Analysis> {
        self.transition(PipelineState::Reprojecting);
        polygon.validate()?;
        let projected = polygon.reproject(self.config.working_crs)?;
        projected.validate()?;

        self.transition(PipelineState::Resolving);
        let cell_size = self.config.cell_size();
        let envelope = projected.envelope()?.buffered(self.config.resolution);

        self.transition(PipelineState::Loading);
        let crs = self.config.working_crs;
        let elevation = self
            .loader
            .load_product(&self.config.elevation_product, &envelope, crs, cell_size)?;
        let land_cover = self
            .loader
            .load_product(&self.config.land_cover_product, &envelope, crs, cell_size)?;

        if !land_cover.metadata().is_aligned_with(elevation.metadata()) {
            return Err(Error::MisalignedGrids(format!(
                "{} ({}) and {} ({}) were loaded on different grids",
                self.config.land_cover_product,
                land_cover.size(),
                self.config.elevation_product,
                elevation.size()
            )));
        }

        self.transition(PipelineState::Masking);
        let mask = rasterize::build_mask(&projected, elevation.metadata())?;

        self.transition(PipelineState::Deriving);
        let grid_cell_size = elevation.metadata().cell_size();
        let slope = slope::derive_slope(&elevation, grid_cell_size.x(), grid_cell_size.y())?;

        self.transition(PipelineState::Tabulating);
        let land_cover_counts = crosstab::tabulate_single(&land_cover, &mask)?;
        let slope_counts = crosstab::tabulate_single(&slope.categories, &mask)?;
        let tab = crosstab::cross_tabulate(&land_cover, &slope.categories, &mask)?;
        if land_cover_counts.is_empty() && slope_counts.is_empty() {
            return Err(Error::NoValidData);
        }

        self.transition(PipelineState::Reporting);
        let pixel_area_m2 = grid_cell_size.area();
        let entries = tab.entries();

        Ok(Analysis {
            polygon_number,
            colour,
            land_cover: report::build_report(&land_cover_counts, pixel_area_m2, &self.land_cover_lookup).with_title("Land cover"),
            slope: report::build_report(&slope_counts, pixel_area_m2, &self.slope_lookup).with_title("Slope"),
            joint: report::build_joint_report(&entries, pixel_area_m2, &self.land_cover_lookup, &self.slope_lookup)
                .with_title("Land cover by slope"),
            entries,
            masked_cells: tab.masked_cells(),
            valid_cells: tab.total(),
            pixel_area_m2,
        })
    }
}

#[cfg(test)]
mod tests {
    use geo::{CellSize, DenseRaster, Epsg, Rect};

    use super::*;

    /// Catalog without any products
    struct NoProducts;

    impl ProductLoader for NoProducts {
        fn load_product(&self, name: &str, _envelope: &Rect, _crs: Epsg, _resolution: CellSize) -> Result<DenseRaster<f64>> {
            Err(Error::ProductUnavailable {
                product: name.to_string(),
                reason: "empty catalog".into(),
            })
        }
    }

    fn canberra_square() -> Polygon {
        Polygon::new(
            vec![
                geo::Point::new(149.10, -35.30),
                geo::Point::new(149.11, -35.30),
                geo::Point::new(149.11, -35.29),
                geo::Point::new(149.10, -35.29),
            ],
            geo::crs::epsg::WGS84,
        )
    }

    #[test_log::test]
    fn failures_return_to_idle() {
        let mut pipeline = Pipeline::new(NoProducts, PipelineConfig::default());
        let mut ctx = DisplayContext::new();

        let err = pipeline.run(&canberra_square(), &mut ctx).unwrap_err();
        assert!(matches!(err, Error::ProductUnavailable { .. }));
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert_eq!(ctx.status_message(), "No dem_5m data available for the drawn area.");
        assert_eq!(ctx.polygon_count(), 0);
        assert!(ctx.last_analysis().is_none());
    }

    #[test_log::test]
    fn geometry_errors_abort_before_loading() {
        let mut pipeline = Pipeline::new(NoProducts, PipelineConfig::default());
        let mut ctx = DisplayContext::new();

        let line = Polygon::new(vec![geo::Point::new(149.1, -35.3), geo::Point::new(149.2, -35.3)], geo::crs::epsg::WGS84);
        let err = pipeline.run(&line, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DegenerateGeometry);

        let unknown_crs = Polygon::new(canberra_square().ring().to_vec(), Epsg::new(1));
        let err = pipeline.run(&unknown_crs, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::UnknownCrs);
        assert_eq!(ctx.status_message(), "Unsupported coordinate system.");
    }

    #[test]
    fn colour_cycle() {
        let mut ctx = DisplayContext::new();
        assert_eq!(ctx.next_colour(), POLYGON_COLOURS[0]);
        ctx.polygon_count = POLYGON_COLOURS.len() + 2;
        assert_eq!(ctx.next_colour(), POLYGON_COLOURS[2]);
    }

    #[test]
    fn state_names() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
        assert_eq!(PipelineState::Tabulating.to_string(), "tabulating");
    }
}
