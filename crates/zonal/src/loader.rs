//! Access to the gridded raster products.

use std::{collections::BTreeMap, path::Path};

use geo::{Cell, CellIterator, CellSize, DenseRaster, Epsg, GeoReference, Point, RasterSize, Rect};

use crate::{Error, Result};

/// Provides fully materialized rasters of named products.
///
/// The returned raster covers the requested envelope aligned outwards to the resolution,
/// is expressed in the requested crs and contains nodata where the product has no values.
pub trait ProductLoader {
    fn load_product(&self, name: &str, envelope: &Rect, crs: Epsg, resolution: CellSize) -> Result<DenseRaster<f64>>;
}

fn unavailable(product: &str, reason: impl Into<String>) -> Error {
    Error::ProductUnavailable {
        product: product.to_string(),
        reason: reason.into(),
    }
}

/// Product catalog backed by rasters that are already in memory.
/// Requests are served by nearest neighbour sampling of the stored rasters on the requested grid.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: BTreeMap<String, DenseRaster<f64>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }

    pub fn with_product(mut self, name: impl Into<String>, raster: DenseRaster<f64>) -> Self {
        self.insert(name, raster);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, raster: DenseRaster<f64>) {
        self.products.insert(name.into(), raster);
    }

    /// Reads a JSON object mapping product names to [`GridDocument`]s
    pub fn from_file(path: &Path) -> Result<Self> {
        let documents: BTreeMap<String, GridDocument> = serde_json::from_reader(std::io::BufReader::new(std::fs::File::open(path)?))?;

        let mut catalog = InMemoryCatalog::new();
        for (name, doc) in documents {
            log::debug!("Catalog product '{name}': {}x{} cells in {}", doc.rows, doc.cols, doc.epsg);
            catalog.insert(name, doc.into_raster()?);
        }

        Ok(catalog)
    }

    pub fn product_names(&self) -> impl Iterator<Item = &str> {
        self.products.keys().map(String::as_str)
    }
}

impl ProductLoader for InMemoryCatalog {
    fn load_product(&self, name: &str, envelope: &Rect, crs: Epsg, resolution: CellSize) -> Result<DenseRaster<f64>> {
        let source = self.products.get(name).ok_or_else(|| unavailable(name, "unknown product"))?;
        let source_meta = source.metadata();

        if let Some(source_crs) = source_meta.epsg() {
            if source_crs != crs {
                return Err(unavailable(name, format!("stored in {source_crs}, requested in {crs}")));
            }
        }

        if !resolution.is_valid() {
            return Err(Error::Geo(geo::Error::InvalidArgument(format!("Invalid resolution: {resolution:?}"))));
        }

        if !envelope.intersects(&source_meta.bounding_box()) {
            return Err(unavailable(
                name,
                format!("no cells intersect the envelope {:?}", envelope.bounds()),
            ));
        }

        let target_meta = GeoReference::covering_extent(Some(crs), &envelope.aligned_to(resolution), resolution)?;
        let data = resample_nearest(source, &target_meta)?;

        log::debug!(
            "Loaded '{name}' as {} cells of {}x{}",
            target_meta.raster_size(),
            resolution.x().abs(),
            resolution.y().abs()
        );

        Ok(DenseRaster::from_iter(target_meta, data.into_iter())?)
    }
}

/// Samples the source raster at every target cell center, cells off the source map are nodata
fn resample_nearest(source: &DenseRaster<f64>, target: &GeoReference) -> Result<Vec<Option<f64>>> {
    let inverse = source.metadata().geo_transform().invert()?;

    Ok(CellIterator::for_raster_with_size(target.raster_size())
        .map(|cell| {
            let center = target.cell_center(cell);
            let pos = inverse.apply(center.x(), center.y());
            source.cell_value(Cell::from_row_col(pos.y().floor() as i32, pos.x().floor() as i32))
        })
        .collect())
}

/// JSON representation of a north up grid.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridDocument {
    pub epsg: Epsg,
    /// x, y of the top left corner
    pub top_left: [f64; 2],
    pub cell_size: CellSize,
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub nodata: Option<f64>,
    /// Row major cell values
    pub data: Vec<f64>,
}

impl GridDocument {
    pub fn into_raster(self) -> Result<DenseRaster<f64>> {
        let meta = GeoReference::with_top_left(
            Some(self.epsg),
            RasterSize::with_rows_cols(self.rows, self.cols),
            Point::new(self.top_left[0], self.top_left[1]),
            self.cell_size,
            self.nodata,
        );

        Ok(DenseRaster::new(meta, self.data)?)
    }
}
