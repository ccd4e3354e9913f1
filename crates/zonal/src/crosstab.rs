//! Pixel tallies of categorical rasters under a mask.

use std::collections::BTreeMap;

use geo::{DenseRaster, GeoReference, Mask, RasterNum};

use crate::{Error, Result};

/// Number of cells with a specific land cover class and slope category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct CrossTabEntry {
    pub land_cover: i64,
    pub slope: i64,
    pub count: u64,
}

/// Joint pixel counts of two categorical rasters, keyed by (value a, value b).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossTab {
    counts: BTreeMap<(i64, i64), u64>,
    masked_cells: usize,
}

impl CrossTab {
    pub fn count(&self, a: i64, b: i64) -> u64 {
        self.counts.get(&(a, b)).copied().unwrap_or(0)
    }

    /// Entries ordered by land cover id and slope category
    pub fn entries(&self) -> Vec<CrossTabEntry> {
        self.counts
            .iter()
            .map(|(&(land_cover, slope), &count)| CrossTabEntry { land_cover, slope, count })
            .collect()
    }

    /// Number of cells selected by the mask, valid or not
    pub fn masked_cells(&self) -> usize {
        self.masked_cells
    }

    /// Number of masked cells where both rasters contain data
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Counts per value of the first raster
    pub fn marginal_a(&self) -> BTreeMap<i64, u64> {
        let mut result = BTreeMap::new();
        for (&(a, _), &count) in &self.counts {
            *result.entry(a).or_insert(0) += count;
        }
        result
    }

    /// Counts per value of the second raster
    pub fn marginal_b(&self) -> BTreeMap<i64, u64> {
        let mut result = BTreeMap::new();
        for (&(_, b), &count) in &self.counts {
            *result.entry(b).or_insert(0) += count;
        }
        result
    }
}

/// Counts the cells per (a, b) value combination where the mask is set and both rasters contain data.
/// Values are rounded to the nearest integer before grouping.
pub fn cross_tabulate<A: RasterNum, B: RasterNum>(grid_a: &DenseRaster<A>, grid_b: &DenseRaster<B>, mask: &Mask) -> Result<CrossTab> {
    check_alignment(grid_a.metadata(), grid_b.metadata())?;
    check_alignment(grid_a.metadata(), mask.metadata())?;

    let mut tab = CrossTab::default();
    for ((a, b), &selected) in grid_a.iter_opt().zip(grid_b.iter_opt()).zip(mask.as_slice()) {
        if !selected {
            continue;
        }

        tab.masked_cells += 1;
        if let (Some(a), Some(b)) = (a.and_then(category_id), b.and_then(category_id)) {
            *tab.counts.entry((a, b)).or_insert(0) += 1;
        }
    }

    log::debug!(
        "Cross tabulation: {} combinations, {} of {} masked cells valid",
        tab.counts.len(),
        tab.total(),
        tab.masked_cells
    );

    Ok(tab)
}

/// Counts the cells per value where the mask is set and the raster contains data
pub fn tabulate_single<T: RasterNum>(grid: &DenseRaster<T>, mask: &Mask) -> Result<BTreeMap<i64, u64>> {
    check_alignment(grid.metadata(), mask.metadata())?;

    let mut counts = BTreeMap::new();
    for (value, &selected) in grid.iter_opt().zip(mask.as_slice()) {
        if let Some(id) = value.filter(|_| selected).and_then(category_id) {
            *counts.entry(id).or_insert(0) += 1;
        }
    }

    Ok(counts)
}

fn category_id<T: RasterNum>(value: T) -> Option<i64> {
    value.to_f64().filter(|v| v.is_finite()).map(|v| v.round() as i64)
}

fn check_alignment(lhs: &GeoReference, rhs: &GeoReference) -> Result<()> {
    if lhs.raster_size() != rhs.raster_size() {
        return Err(Error::MisalignedGrids(format!(
            "Raster sizes differ: {} <-> {}",
            lhs.raster_size(),
            rhs.raster_size()
        )));
    }

    if !lhs.is_aligned_with(rhs) {
        return Err(Error::MisalignedGrids(format!(
            "Geo transforms differ: {:?} <-> {:?}",
            lhs.geo_transform(),
            rhs.geo_transform()
        )));
    }

    Ok(())
}
