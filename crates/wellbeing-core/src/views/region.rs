use std::collections::BTreeMap;

use serde::Serialize;
use wellbeing_model::{Metric, MetricMap, Year};
use wellbeing_stats::{percentile_in_year, regional_aggregate, regional_time_series};

use super::{Aggregate, AggregateBoard, AggregateKey, DerivedData, View, ViewContext};

/// Means and percentiles of the active region for the selected year.
///
/// Percentiles rank the region mean against the year's full observed
/// distribution, in `[0, 100]`, inverted for corruption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAggregate {
    pub label: Option<String>,
    pub year: Year,
    /// Region countries with a record for `year`.
    pub members: usize,
    pub means: MetricMap<f64>,
    pub percentiles: MetricMap<f64>,
}

impl RegionAggregate {
    pub fn has_data(&self) -> bool {
        self.members > 0
    }
}

/// Region mean per year for every metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSeries {
    pub label: Option<String>,
    pub members: usize,
    pub series: MetricMap<BTreeMap<Year, f64>>,
}

/// Producer of the region aggregates. Always publishes, so consumers can
/// tell "empty region" (no members, `NaN` values) from "not computed".
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionSummaryView;

const PRODUCES: [AggregateKey; 2] = [AggregateKey::RegionSummary, AggregateKey::RegionSeries];

impl View for RegionSummaryView {
    fn name(&self) -> &str {
        "region-summary"
    }

    fn produces(&self) -> &[AggregateKey] {
        &PRODUCES
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, board: &mut AggregateBoard) -> DerivedData {
        let year = ctx.state.year();
        let filter = ctx.state.region_filter();
        let label = ctx.state.region().map(|region| region.label().to_string());

        let year_rows: Vec<_> = ctx.store.rows_for_year(year).collect();
        let members: Vec<_> = year_rows
            .iter()
            .copied()
            .filter(|record| filter.contains(&record.country_id))
            .collect();
        let means = MetricMap::from_fn(|metric| regional_aggregate(members.iter().copied(), metric));
        let percentiles = means.map(|metric, mean| {
            if mean.is_nan() {
                f64::NAN
            } else {
                percentile_in_year(*mean, year_rows.iter().copied(), metric)
            }
        });

        let history: Vec<_> = filter
            .iter()
            .flat_map(|id| ctx.store.records_for(*id))
            .collect();
        let series = MetricMap::from_fn(|metric: Metric| {
            regional_time_series(history.iter().copied(), metric)
        });

        let summary = RegionAggregate {
            label: label.clone(),
            year,
            members: members.len(),
            means,
            percentiles,
        };
        board.publish(Aggregate::RegionSummary(summary.clone()));
        board.publish(Aggregate::RegionSeries(RegionSeries {
            label,
            members: filter.len(),
            series,
        }));
        DerivedData::RegionSummary(summary)
    }
}
