//! Area and percentage reports of pixel tallies.

use std::{collections::BTreeMap, fmt};

use crate::{crosstab::CrossTabEntry, lookup::CategoryLookup};

const SQUARE_METERS_PER_SQUARE_KM: f64 = 1e6;

/// Identifies the category of a report row: a single class id or a (land cover, slope) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(untagged)]
pub enum CategoryKey {
    Single(i64),
    Pair(i64, i64),
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::Single(id) => write!(f, "{id}"),
            CategoryKey::Pair(a, b) => write!(f, "{a}/{b}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CoverageRow {
    pub key: CategoryKey,
    pub label: String,
    pub pixel_count: u64,
    pub area_km2: f64,
    pub percentage: f64,
}

/// Rows ordered by descending pixel count, ties by ascending category key.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct CoverageReport {
    pub title: String,
    pub rows: Vec<CoverageRow>,
}

impl CoverageReport {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn total_pixels(&self) -> u64 {
        self.rows.iter().map(|row| row.pixel_count).sum()
    }

    pub fn total_area_km2(&self) -> f64 {
        self.rows.iter().map(|row| row.area_km2).sum()
    }

    pub fn row(&self, key: CategoryKey) -> Option<&CoverageRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .rows
            .iter()
            .map(|row| row.label.chars().count())
            .chain(std::iter::once("Category".len()))
            .max()
            .unwrap_or_default();

        if !self.title.is_empty() {
            writeln!(f, "{}", self.title)?;
        }

        writeln!(f, "{:<label_width$}  {:>10}  {:>12}  {:>8}", "Category", "Pixels", "Area (km²)", "%")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<label_width$}  {:>10}  {:>12.4}  {:>8.2}",
                row.label, row.pixel_count, row.area_km2, row.percentage
            )?;
        }

        Ok(())
    }
}

/// Converts the pixel counts per category id to areas and percentages of the total count
pub fn build_report(counts: &BTreeMap<i64, u64>, pixel_area_m2: f64, lookup: &CategoryLookup) -> CoverageReport {
    let rows = counts
        .iter()
        .map(|(&id, &count)| (CategoryKey::Single(id), lookup.label(id).into_owned(), count));

    create_report(rows, pixel_area_m2)
}

/// Converts cross tabulation entries to a report of (land cover, slope) combinations
pub fn build_joint_report(
    entries: &[CrossTabEntry],
    pixel_area_m2: f64,
    land_cover_lookup: &CategoryLookup,
    slope_lookup: &CategoryLookup,
) -> CoverageReport {
    let rows = entries.iter().map(|entry| {
        (
            CategoryKey::Pair(entry.land_cover, entry.slope),
            format!("{} / {}", land_cover_lookup.label(entry.land_cover), slope_lookup.label(entry.slope)),
            entry.count,
        )
    });

    create_report(rows, pixel_area_m2)
}

fn create_report(rows: impl Iterator<Item = (CategoryKey, String, u64)>, pixel_area_m2: f64) -> CoverageReport {
    let rows: Vec<_> = rows.filter(|&(_, _, count)| count > 0).collect();
    let total: u64 = rows.iter().map(|&(_, _, count)| count).sum();

    let mut rows: Vec<CoverageRow> = rows
        .into_iter()
        .map(|(key, label, pixel_count)| CoverageRow {
            key,
            label,
            pixel_count,
            area_km2: pixel_count as f64 * pixel_area_m2 / SQUARE_METERS_PER_SQUARE_KM,
            percentage: 100.0 * pixel_count as f64 / total as f64,
        })
        .collect();

    rows.sort_by(|lhs, rhs| rhs.pixel_count.cmp(&lhs.pixel_count).then(lhs.key.cmp(&rhs.key)));

    CoverageReport {
        title: String::new(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn areas_and_percentages() {
        let counts = BTreeMap::from([(111, 300), (220, 100), (112, 600)]);
        let report = build_report(&counts, 25.0, &CategoryLookup::dea_land_cover());

        let keys: Vec<_> = report.rows.iter().map(|row| row.key).collect();
        assert_eq!(keys, vec![CategoryKey::Single(112), CategoryKey::Single(111), CategoryKey::Single(220)]);

        let water = report.row(CategoryKey::Single(220)).expect("water row");
        assert_eq!(water.label, "Water");
        assert_relative_eq!(water.area_km2, 0.0025);
        assert_relative_eq!(water.percentage, 10.0);

        assert_eq!(report.total_pixels(), 1000);
        assert_relative_eq!(report.total_area_km2(), 0.025);
        assert_relative_eq!(report.rows.iter().map(|row| row.percentage).sum::<f64>(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn ties_ordered_by_id() {
        let counts = BTreeMap::from([(5, 10), (2, 10), (3, 20), (0, 10)]);
        let report = build_report(&counts, 1.0, &CategoryLookup::slope_categories());
        let ids: Vec<_> = report.rows.iter().map(|row| row.key).collect();
        assert_eq!(
            ids,
            vec![
                CategoryKey::Single(3),
                CategoryKey::Single(0),
                CategoryKey::Single(2),
                CategoryKey::Single(5)
            ]
        );
    }

    #[test]
    fn unknown_ids_are_kept() {
        let counts = BTreeMap::from([(9999, 40), (111, 60)]);
        let report = build_report(&counts, 25.0, &CategoryLookup::dea_land_cover());

        let unknown = report.row(CategoryKey::Single(9999)).expect("unknown row");
        assert_eq!(unknown.label, "9999");
        assert_relative_eq!(unknown.percentage, 40.0);
        assert_relative_eq!(unknown.area_km2, 0.001);
    }

    #[test]
    fn joint_report() {
        let entries = [
            CrossTabEntry {
                land_cover: 112,
                slope: 0,
                count: 5,
            },
            CrossTabEntry {
                land_cover: 111,
                slope: 2,
                count: 5,
            },
            CrossTabEntry {
                land_cover: 220,
                slope: 1,
                count: 10,
            },
        ];

        let report = build_joint_report(&entries, 100.0, &CategoryLookup::dea_land_cover(), &CategoryLookup::slope_categories());
        assert_eq!(report.rows[0].key, CategoryKey::Pair(220, 1));
        assert_eq!(report.rows[0].label, "Water / Gentle (5-11°)");
        assert_eq!(report.rows[1].key, CategoryKey::Pair(111, 2));
        assert_relative_eq!(report.rows[2].percentage, 25.0);
    }

    #[test]
    fn empty_report() {
        let report = build_report(&BTreeMap::new(), 25.0, &CategoryLookup::new());
        assert!(report.is_empty());
        assert_eq!(report.total_pixels(), 0);
    }

    #[test]
    fn render_table() {
        let counts = BTreeMap::from([(0, 3), (1, 1)]);
        let report = build_report(&counts, 25.0, &CategoryLookup::slope_categories()).with_title("Slope");
        let text = report.to_string();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Slope");
        assert!(lines[1].starts_with("Category"));
        assert!(lines[2].starts_with("Flat (0-5°)"));
        assert!(lines[2].trim_end().ends_with("75.00"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn serialize_rows() -> crate::Result<()> {
        let report = build_report(&BTreeMap::from([(7, 1)]), 1e6, &CategoryLookup::new());
        let json: serde_json::Value = serde_json::to_value(&report)?;
        assert_eq!(json["rows"][0]["key"], 7);
        assert_eq!(json["rows"][0]["label"], "7");
        assert_eq!(json["rows"][0]["area_km2"], 1.0);
        Ok(())
    }
}
