//! Views: derived data for one chart each, recomputed on every refresh.
//!
//! A view reads the store and selection through a [`ViewContext`], may
//! publish aggregates for later views on the [`AggregateBoard`], and hands
//! its [`DerivedData`] to a [`Renderer`]. Views declare the aggregates they
//! produce and consume; the registry orders them so producers run first.

mod distribution;
mod line;
mod map;
mod radar;
mod region;
mod render;
mod scatter;
mod selector;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::selection::SelectionState;
use crate::store::DatasetStore;

pub use distribution::{
    DistributionMarker, HappinessHistogramView, HistogramData, MetricHistogramView,
};
pub use line::{LineChart, LineData, LineSeries, LineView};
pub use map::{CountryStatus, MapCountry, MapData, MapLegend, MapView};
pub use radar::{RADAR_TICKS, RadarData, RadarSeries, RadarView};
pub use region::{RegionAggregate, RegionSeries, RegionSummaryView};
pub use render::{Frame, NullRenderer, RecordingRenderer, Renderer};
pub use scatter::{ScatterData, ScatterPoint, ScatterView};
pub(crate) use scatter::brushed_ids;
pub use selector::{SelectorCountry, SelectorData, SelectorView};

/// Read-only inputs of one recompute.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub store: &'a DatasetStore,
    pub state: &'a SelectionState,
    pub config: &'a DashboardConfig,
}

/// Names of aggregates shared between views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKey {
    /// Region means and percentiles for the selected year.
    RegionSummary,
    /// Region means per year for every metric.
    RegionSeries,
}

impl AggregateKey {
    pub const ALL: [AggregateKey; 2] = [AggregateKey::RegionSummary, AggregateKey::RegionSeries];
}

impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateKey::RegionSummary => "region_summary",
            AggregateKey::RegionSeries => "region_series",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    RegionSummary(RegionAggregate),
    RegionSeries(RegionSeries),
}

impl Aggregate {
    pub fn key(&self) -> AggregateKey {
        match self {
            Aggregate::RegionSummary(_) => AggregateKey::RegionSummary,
            Aggregate::RegionSeries(_) => AggregateKey::RegionSeries,
        }
    }
}

/// Aggregates published during the current refresh pass.
///
/// A fresh board is built for every pass, so a consumer never sees a value
/// derived from an earlier selection.
#[derive(Debug, Clone, Default)]
pub struct AggregateBoard {
    entries: BTreeMap<AggregateKey, Aggregate>,
}

impl AggregateBoard {
    pub fn publish(&mut self, aggregate: Aggregate) {
        self.entries.insert(aggregate.key(), aggregate);
    }

    pub fn get(&self, key: AggregateKey) -> Option<&Aggregate> {
        self.entries.get(&key)
    }

    pub fn region_summary(&self) -> Option<&RegionAggregate> {
        match self.get(AggregateKey::RegionSummary)? {
            Aggregate::RegionSummary(summary) => Some(summary),
            Aggregate::RegionSeries(_) => None,
        }
    }

    pub fn region_series(&self) -> Option<&RegionSeries> {
        match self.get(AggregateKey::RegionSeries)? {
            Aggregate::RegionSeries(series) => Some(series),
            Aggregate::RegionSummary(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of one view's recompute, handed unchanged to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedData {
    RegionSummary(RegionAggregate),
    Map(MapData),
    Selector(SelectorData),
    Scatter(ScatterData),
    Histogram(HistogramData),
    Radar(RadarData),
    Lines(LineData),
}

pub trait View {
    /// Unique name within a registry.
    fn name(&self) -> &str;

    fn produces(&self) -> &[AggregateKey] {
        &[]
    }

    fn consumes(&self) -> &[AggregateKey] {
        &[]
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, board: &mut AggregateBoard) -> DerivedData;

    fn draw(&mut self, data: &DerivedData, renderer: &mut dyn Renderer) {
        renderer.draw(self.name(), data);
    }
}

/// The standard dashboard views, producers first.
pub fn default_views() -> Vec<Box<dyn View>> {
    vec![
        Box::new(RegionSummaryView),
        Box::new(MapView),
        Box::new(SelectorView),
        Box::new(ScatterView),
        Box::new(HappinessHistogramView),
        Box::new(MetricHistogramView),
        Box::new(RadarView),
        Box::new(LineView),
    ]
}

/// Logged when a consumer runs without its aggregate; the view renders its
/// empty state.
pub(crate) fn missing_aggregate(view: &str, key: AggregateKey) {
    tracing::debug!(view, aggregate = %key, "aggregate not published; rendering without it");
}
