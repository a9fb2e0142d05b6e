//! Shared selection state.
//!
//! One [`SelectionState`] exists per dashboard. Views read it; only the
//! mutators below change it. Mutators that reject their input log a warning
//! and leave every field untouched.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use wellbeing_model::{CountryId, Metric, Year};

use crate::config::DashboardConfig;
use crate::error::SelectionError;
use crate::store::DatasetStore;

/// Map projection requested by the user. Only carried through to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    NaturalEarth,
    Equirectangular,
    ConicEqualArea,
}

/// How a country is emphasised across views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "slot", rename_all = "snake_case")]
pub enum Highlight {
    /// Occupies the comparison slot with this index.
    Slot(usize),
    Primary,
    RegionMember,
    None,
}

impl Highlight {
    /// Point opacity used by the scatterplot.
    pub fn opacity(self) -> f64 {
        match self {
            Highlight::Slot(_) | Highlight::Primary => 1.0,
            Highlight::RegionMember => 0.6,
            Highlight::None => 0.15,
        }
    }
}

/// Where the active region filter came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RegionSelection {
    Classification { column: String, value: String },
    Brush,
}

impl RegionSelection {
    pub fn label(&self) -> &str {
        match self {
            RegionSelection::Classification { value, .. } => value,
            RegionSelection::Brush => "Brushed selection",
        }
    }
}

/// Brushed rectangle in scatterplot data coordinates (x = axis metric,
/// y = active metric). Corners may be given in any order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BrushRect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (x_lo, x_hi) = (self.x0.min(self.x1), self.x0.max(self.x1));
        let (y_lo, y_hi) = (self.y0.min(self.y1), self.y0.max(self.y1));
        (x_lo..=x_hi).contains(&x) && (y_lo..=y_hi).contains(&y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionState {
    year: Year,
    year_range: (Year, Year),
    slots: Vec<Option<CountryId>>,
    primary: Option<CountryId>,
    region: Option<RegionSelection>,
    region_filter: BTreeSet<CountryId>,
    metric: Metric,
    fallback_metric: Metric,
    confidence_level: f64,
    bin_count: Option<usize>,
    max_bin_count: usize,
    projection: Projection,
    brush: Option<BrushRect>,
}

impl SelectionState {
    /// Initial state: configured defaults, with the year clamped into the
    /// store's observed range.
    pub fn new(store: &DatasetStore, config: &DashboardConfig) -> Self {
        let year_range = store
            .year_range()
            .unwrap_or((config.default_year, config.default_year));
        let year = config.default_year.clamp(year_range.0, year_range.1);
        if year != config.default_year {
            tracing::debug!(
                configured = config.default_year,
                year,
                "default year outside the dataset; clamped"
            );
        }
        let fallback_metric = if config.default_metric == Metric::AXIS {
            Metric::DEFAULT_COMPARED
        } else {
            config.default_metric
        };
        Self {
            year,
            year_range,
            slots: vec![None; config.slot_capacity.max(1)],
            primary: None,
            region: None,
            region_filter: BTreeSet::new(),
            metric: fallback_metric,
            fallback_metric,
            confidence_level: config.confidence_level,
            bin_count: config.bin_count,
            max_bin_count: config.max_bin_count,
            projection: Projection::default(),
            brush: None,
        }
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn year_range(&self) -> (Year, Year) {
        self.year_range
    }

    pub fn comparison_slots(&self) -> &[Option<CountryId>] {
        &self.slots
    }

    pub fn slot_capacity(&self) -> usize {
        self.slots.len()
    }

    /// Comparison slots followed by the dedicated primary slot.
    pub fn all_slots(&self) -> Vec<Option<CountryId>> {
        let mut slots = self.slots.clone();
        slots.push(self.primary);
        slots
    }

    /// Occupied slots in slot order, primary last.
    pub fn occupied(&self) -> Vec<(CountryId, Highlight)> {
        let mut occupied: Vec<(CountryId, Highlight)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|id| (id, Highlight::Slot(idx))))
            .collect();
        if let Some(primary) = self.primary {
            occupied.push((primary, Highlight::Primary));
        }
        occupied
    }

    pub fn slot_of(&self, id: CountryId) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(id))
    }

    pub fn primary(&self) -> Option<CountryId> {
        self.primary
    }

    pub fn region(&self) -> Option<&RegionSelection> {
        self.region.as_ref()
    }

    pub fn region_filter(&self) -> &BTreeSet<CountryId> {
        &self.region_filter
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn bin_count(&self) -> Option<usize> {
        self.bin_count
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Visual brush extent while a brush gesture is in progress.
    pub fn brush(&self) -> Option<BrushRect> {
        self.brush
    }

    pub fn highlight_of(&self, id: CountryId) -> Highlight {
        if let Some(slot) = self.slot_of(id) {
            Highlight::Slot(slot)
        } else if self.primary == Some(id) {
            Highlight::Primary
        } else if self.region_filter.contains(&id) {
            Highlight::RegionMember
        } else {
            Highlight::None
        }
    }

    pub fn set_year(&mut self, year: Year) -> Result<bool, SelectionError> {
        let (min, max) = self.year_range;
        if !(min..=max).contains(&year) {
            let err = SelectionError::YearOutOfRange { year, min, max };
            tracing::warn!(%err, "rejected year change");
            return Err(err);
        }
        Ok(replace(&mut self.year, year))
    }

    /// Toggle a country in the comparison slots.
    ///
    /// Clears its slot when already selected, otherwise occupies the first
    /// free slot. A full slot list, or the primary country, is a no-op.
    pub fn toggle_entity(&mut self, id: CountryId) -> bool {
        if self.primary == Some(id) {
            return false;
        }
        if let Some(slot) = self.slot_of(id) {
            self.slots[slot] = None;
            return true;
        }
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(free) => {
                *free = Some(id);
                true
            }
            None => {
                tracing::debug!(country = %id, "all comparison slots occupied");
                false
            }
        }
    }

    /// Set, replace or clear the primary country. Setting the current primary
    /// again clears it. A country promoted to primary leaves its comparison
    /// slot.
    pub fn set_primary(&mut self, id: Option<CountryId>) -> bool {
        let next = match id {
            Some(id) if self.primary == Some(id) => None,
            other => other,
        };
        if next == self.primary {
            return false;
        }
        if let Some(id) = next
            && let Some(slot) = self.slot_of(id)
        {
            self.slots[slot] = None;
        }
        self.primary = next;
        true
    }

    /// Filter to the countries classified as `value` under `column`. An empty
    /// value clears the filter.
    pub fn set_region_filter(
        &mut self,
        store: &DatasetStore,
        column: &str,
        value: &str,
    ) -> Result<bool, SelectionError> {
        if value.is_empty() {
            return Ok(self.clear_region_filter());
        }
        if !store.has_classification(column) {
            let err = SelectionError::UnknownClassification(column.to_string());
            tracing::warn!(%err, "rejected region filter");
            return Err(err);
        }
        let filter = store.region_ids_for(column, value);
        if filter.is_empty() {
            tracing::debug!(column, value, "region filter matches no country with data");
        }
        let region = Some(RegionSelection::Classification {
            column: column.to_string(),
            value: value.to_string(),
        });
        let changed = self.region != region || self.region_filter != filter;
        self.region = region;
        self.region_filter = filter;
        Ok(changed)
    }

    pub fn clear_region_filter(&mut self) -> bool {
        let changed = self.region.is_some() || !self.region_filter.is_empty();
        self.region = None;
        self.region_filter.clear();
        changed
    }

    /// Change the compared metric. The x-axis metric is replaced by the
    /// configured default.
    pub fn set_active_metric(&mut self, metric: Metric) -> bool {
        let metric = if metric == Metric::AXIS {
            tracing::debug!(substitute = %self.fallback_metric, "axis metric cannot be compared");
            self.fallback_metric
        } else {
            metric
        };
        replace(&mut self.metric, metric)
    }

    /// Set the interval from a confidence percentage, e.g. `95` for a 95%
    /// band (significance level `0.05`).
    pub fn set_confidence_level(&mut self, pct: f64) -> Result<bool, SelectionError> {
        if !(pct > 0.0 && pct < 100.0) {
            let err = SelectionError::ConfidenceOutOfRange(pct);
            tracing::warn!(%err, "rejected confidence change");
            return Err(err);
        }
        let level = (100.0 - pct) / 100.0;
        let changed = self.confidence_level != level;
        self.confidence_level = level;
        Ok(changed)
    }

    pub fn set_bin_size(&mut self, count: usize) -> Result<bool, SelectionError> {
        if count == 0 || count > self.max_bin_count {
            let err = SelectionError::BinCountOutOfRange {
                value: count,
                max: self.max_bin_count,
            };
            tracing::warn!(%err, "rejected bin count");
            return Err(err);
        }
        Ok(replace(&mut self.bin_count, Some(count)))
    }

    /// Return to the per-metric default bin widths.
    pub fn clear_bin_size(&mut self) -> bool {
        replace(&mut self.bin_count, None)
    }

    pub fn set_projection(&mut self, projection: Projection) -> bool {
        replace(&mut self.projection, projection)
    }

    /// Start a brush gesture, dropping any stale extent. The previous filter
    /// stays until the first update.
    pub fn begin_brush(&mut self) -> bool {
        self.brush.take().is_some()
    }

    /// Replace the region filter with the countries inside the brush.
    pub fn update_brush(&mut self, rect: BrushRect, ids: BTreeSet<CountryId>) -> bool {
        let changed = self.region_filter != ids || self.brush != Some(rect);
        self.brush = Some(rect);
        self.region = Some(RegionSelection::Brush);
        self.region_filter = ids;
        changed
    }

    /// Finish the gesture: the visual extent goes away, the filter stays.
    pub fn end_brush(&mut self) -> bool {
        self.brush.take().is_some()
    }
}

/// Assign and report whether the value changed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use wellbeing_model::{MetricMap, Record};

    use super::*;

    fn id(code: u32) -> CountryId {
        CountryId::new(code).unwrap()
    }

    fn store() -> DatasetStore {
        let records = [2019, 2020]
            .into_iter()
            .flat_map(|year| {
                [4, 8, 12].map(|code| {
                    Record::new(id(code), format!("C{code}"), year, MetricMap::from_fn(|_| 1.0))
                })
            })
            .collect();
        DatasetStore::load(records, Vec::new(), BTreeSet::new()).unwrap()
    }

    fn state() -> SelectionState {
        SelectionState::new(&store(), &DashboardConfig::default())
    }

    #[test]
    fn toggling_twice_empties_the_slot() {
        let mut state = state();
        assert!(state.toggle_entity(id(4)));
        assert_eq!(state.comparison_slots()[0], Some(id(4)));
        assert!(state.toggle_entity(id(4)));
        assert!(state.comparison_slots().iter().all(Option::is_none));
    }

    #[test]
    fn full_slots_ignore_new_countries() {
        let mut state = state();
        for code in [4, 8, 12] {
            assert!(state.toggle_entity(id(code)));
        }
        assert!(!state.toggle_entity(id(16)));
        assert!(state.toggle_entity(id(8)));
        assert!(state.toggle_entity(id(16)));
        assert_eq!(state.slot_of(id(16)), Some(1));
    }

    #[test]
    fn primary_toggles_and_leaves_comparison_slot() {
        let mut state = state();
        state.toggle_entity(id(8));
        assert!(state.set_primary(Some(id(8))));
        assert_eq!(state.slot_of(id(8)), None);
        assert_eq!(state.highlight_of(id(8)), Highlight::Primary);
        assert!(!state.toggle_entity(id(8)));
        assert!(state.set_primary(Some(id(8))));
        assert_eq!(state.primary(), None);
        assert!(!state.set_primary(None));
    }

    #[test]
    fn rejected_year_keeps_state() {
        let mut state = state();
        let before = state.clone();
        let err = state.set_year(2031).unwrap_err();
        assert_eq!(
            err,
            SelectionError::YearOutOfRange {
                year: 2031,
                min: 2019,
                max: 2020
            }
        );
        assert_eq!(state, before);
        assert_eq!(state.set_year(2019), Ok(true));
    }

    #[test]
    fn axis_metric_falls_back_to_default() {
        let mut state = state();
        assert!(state.set_active_metric(Metric::Freedom));
        assert!(state.set_active_metric(Metric::HappinessScore));
        assert_eq!(state.metric(), Metric::LogGdpPerCapita);
    }

    #[test]
    fn confidence_percentage_maps_to_level() {
        let mut state = state();
        assert_eq!(state.set_confidence_level(99.0), Ok(true));
        assert!((state.confidence_level() - 0.01).abs() < 1e-12);
        assert!(state.set_confidence_level(100.0).is_err());
        assert!(state.set_confidence_level(0.0).is_err());
    }

    #[test]
    fn bin_count_is_bounded() {
        let mut state = state();
        assert_eq!(state.set_bin_size(20), Ok(true));
        assert_eq!(
            state.set_bin_size(101),
            Err(SelectionError::BinCountOutOfRange { value: 101, max: 100 })
        );
        assert_eq!(state.bin_count(), Some(20));
        assert!(state.clear_bin_size());
    }

    #[test]
    fn brush_end_keeps_filter() {
        let mut state = state();
        let rect = BrushRect {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 1.0,
        };
        state.begin_brush();
        assert!(state.update_brush(rect, BTreeSet::from([id(4), id(8)])));
        assert_eq!(state.brush(), Some(rect));
        assert!(state.end_brush());
        assert_eq!(state.brush(), None);
        assert_eq!(state.region_filter().len(), 2);
        assert_eq!(state.region(), Some(&RegionSelection::Brush));
    }
}
