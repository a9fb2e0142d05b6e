//! Immutable dataset store with the lookups the views need.

use std::collections::{BTreeMap, BTreeSet};

use wellbeing_ingest::{IngestError, LoadedSources};
use wellbeing_model::{CountryId, Record, RegionRow, Year};

#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    records: Vec<Record>,
    regions: BTreeMap<CountryId, RegionRow>,
    boundary_ids: BTreeSet<CountryId>,
    by_key: BTreeMap<(CountryId, Year), usize>,
    by_year: BTreeMap<Year, Vec<usize>>,
    valid_countries: BTreeSet<CountryId>,
    classification_columns: BTreeSet<String>,
}

impl DatasetStore {
    /// Index the loaded rows.
    ///
    /// Fails when two records share a country and year. Region rows for the
    /// same country are merged, later rows overriding earlier ones.
    pub fn load(
        records: Vec<Record>,
        regions: Vec<RegionRow>,
        boundary_ids: BTreeSet<CountryId>,
    ) -> Result<Self, IngestError> {
        let mut by_key = BTreeMap::new();
        let mut by_year: BTreeMap<Year, Vec<usize>> = BTreeMap::new();
        let mut valid_countries = BTreeSet::new();
        for (idx, record) in records.iter().enumerate() {
            let key = (record.country_id, record.year);
            if by_key.insert(key, idx).is_some() {
                return Err(IngestError::DuplicateRecord {
                    country: record.country_id,
                    year: record.year,
                });
            }
            by_year.entry(record.year).or_default().push(idx);
            valid_countries.insert(record.country_id);
        }

        let mut classification_columns = BTreeSet::new();
        let mut region_map = BTreeMap::new();
        for row in regions {
            classification_columns.extend(row.classifications.keys().cloned());
            region_map.insert(row.country_id, row);
        }

        tracing::info!(
            records = records.len(),
            countries = valid_countries.len(),
            years = by_year.len(),
            "dataset store ready"
        );
        Ok(Self {
            records,
            regions: region_map,
            boundary_ids,
            by_key,
            by_year,
            valid_countries,
            classification_columns,
        })
    }

    pub fn from_sources(sources: LoadedSources) -> Result<Self, IngestError> {
        Self::load(sources.records, sources.regions, sources.boundary_ids)
    }

    /// Every record, in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records of one year, in load order.
    pub fn rows_for_year(&self, year: Year) -> impl Iterator<Item = &Record> + '_ {
        self.by_year
            .get(&year)
            .into_iter()
            .flatten()
            .map(|&idx| &self.records[idx])
    }

    pub fn all_years(&self) -> Vec<Year> {
        self.by_year.keys().copied().collect()
    }

    pub fn year_range(&self) -> Option<(Year, Year)> {
        let first = self.by_year.keys().next()?;
        let last = self.by_year.keys().next_back()?;
        Some((*first, *last))
    }

    /// Countries with at least one record.
    pub fn valid_countries(&self) -> &BTreeSet<CountryId> {
        &self.valid_countries
    }

    pub fn is_valid(&self, id: CountryId) -> bool {
        self.valid_countries.contains(&id)
    }

    pub fn boundary_ids(&self) -> &BTreeSet<CountryId> {
        &self.boundary_ids
    }

    /// Countries a map draws: every boundary plus every country with data.
    pub fn map_countries(&self) -> BTreeSet<CountryId> {
        self.boundary_ids
            .union(&self.valid_countries)
            .copied()
            .collect()
    }

    /// Display name from the data table, falling back to the region table.
    pub fn country_name(&self, id: CountryId) -> Option<&str> {
        self.records_for(id)
            .last()
            .map(|record| record.country_name.as_str())
            .or_else(|| self.regions.get(&id).map(|row| row.name.as_str()))
    }

    pub fn record(&self, id: CountryId, year: Year) -> Option<&Record> {
        self.by_key.get(&(id, year)).map(|&idx| &self.records[idx])
    }

    pub fn has_record(&self, id: CountryId, year: Year) -> bool {
        self.by_key.contains_key(&(id, year))
    }

    /// All records of one country, ascending by year.
    pub fn records_for(&self, id: CountryId) -> Vec<&Record> {
        self.by_key
            .range((id, Year::MIN)..=(id, Year::MAX))
            .map(|(_, &idx)| &self.records[idx])
            .collect()
    }

    pub fn region(&self, id: CountryId) -> Option<&RegionRow> {
        self.regions.get(&id)
    }

    pub fn classification_columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.classification_columns.iter().map(String::as_str)
    }

    pub fn has_classification(&self, column: &str) -> bool {
        self.classification_columns.contains(column)
    }

    /// Distinct values of one classification column, sorted.
    pub fn classification_values(&self, column: &str) -> BTreeSet<&str> {
        self.regions
            .values()
            .filter_map(|row| row.classification(column))
            .collect()
    }

    /// Countries classified as `value` under `column` that have data.
    pub fn region_ids_for(&self, column: &str, value: &str) -> BTreeSet<CountryId> {
        self.regions
            .values()
            .filter(|row| row.classification(column) == Some(value))
            .map(|row| row.country_id)
            .filter(|id| self.valid_countries.contains(id))
            .collect()
    }
}
