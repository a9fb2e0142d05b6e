use std::collections::BTreeMap;

use serde::Serialize;

use crate::ids::CountryId;

/// One row of the region classification table.
///
/// `classifications` holds every column other than the id and display name,
/// e.g. `region` and `sub-region`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionRow {
    pub country_id: CountryId,
    pub name: String,
    pub classifications: BTreeMap<String, String>,
}

impl RegionRow {
    pub fn classification(&self, column: &str) -> Option<&str> {
        self.classifications.get(column).map(String::as_str)
    }
}
