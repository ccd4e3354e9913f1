//! Category id to label tables used when reporting.

use std::{borrow::Cow, collections::BTreeMap, path::Path};

use crate::{Result, slope::SlopeCategory};

/// Read-only mapping of integral category ids to human readable names.
///
/// Ids that are not present in the table are labelled with their numeric value,
/// so unknown categories remain visible in the reports.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CategoryLookup {
    names: BTreeMap<i64, String>,
}

impl CategoryLookup {
    pub fn new() -> Self {
        CategoryLookup::default()
    }

    /// Labels of the slope categories including their degree range
    pub fn slope_categories() -> Self {
        const NAMES: [&str; SlopeCategory::COUNT] = ["Flat", "Gentle", "Moderate", "Steep", "Very steep", "Extreme"];

        SlopeCategory::all()
            .zip(NAMES)
            .map(|(category, name)| {
                let label = match category.degree_range() {
                    (lower, Some(upper)) => format!("{name} ({lower}-{upper}°)"),
                    (lower, None) => format!("{name} (>{lower}°)"),
                };
                (i64::from(category.id()), label)
            })
            .collect()
    }

    /// Level 3 classes of the Digital Earth Australia land cover product
    pub fn dea_land_cover() -> Self {
        CategoryLookup::from_iter([
            (111, "Cultivated Terrestrial Vegetated"),
            (112, "Natural Terrestrial Vegetated"),
            (124, "Natural Aquatic Vegetated"),
            (215, "Artificial Surface"),
            (216, "Natural Bare Surface"),
            (220, "Water"),
        ])
    }

    /// Reads a JSON object mapping ids to names, e.g. `{"111": "Cultivated Terrestrial Vegetated"}`
    pub fn from_file(path: &Path) -> Result<Self> {
        let lookup: CategoryLookup = serde_json::from_reader(std::io::BufReader::new(std::fs::File::open(path)?))?;
        log::debug!("Loaded {} categories from {}", lookup.len(), path.display());
        Ok(lookup)
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// The name of the category, or the id itself when the category is unknown
    pub fn label(&self, id: i64) -> Cow<'_, str> {
        match self.names.get(&id) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(id.to_string()),
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.names.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for CategoryLookup {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        CategoryLookup {
            names: iter.into_iter().map(|(id, name)| (id, name.into())).collect(),
        }
    }
}
