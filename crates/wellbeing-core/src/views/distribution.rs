use serde::Serialize;
use wellbeing_model::{CountryId, Metric, Year};
use wellbeing_stats::{Bin, equal_width_edges, extent, fixed_width_edges, paired_histogram};

use super::{AggregateBoard, DerivedData, View, ViewContext};
use crate::selection::Highlight;

/// A selected country's position on a distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionMarker {
    pub id: CountryId,
    pub name: String,
    pub value: f64,
    pub highlight: Highlight,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramData {
    pub year: Year,
    pub metric: Metric,
    pub domain: Option<(f64, f64)>,
    /// Full population per bin, plus the region filter members over the
    /// same edges. Selected countries are reported as markers.
    pub bins: Vec<Bin>,
    pub markers: Vec<DistributionMarker>,
}

/// Which lower bound a distribution's domain starts from.
#[derive(Clone, Copy)]
enum DomainStart {
    /// `0`, with unit-width default bins.
    Zero,
    /// `floor(min)`, with the metric's default bin width.
    FloorOfMin,
}

fn histogram(ctx: &ViewContext<'_>, metric: Metric, start: DomainStart) -> HistogramData {
    let year = ctx.state.year();
    let palette = &ctx.config.palette;
    let mut values = Vec::new();
    let mut highlighted = Vec::new();
    let mut markers = Vec::new();
    let compared = ctx.state.metric();
    let region = ctx.state.region_filter();
    for record in ctx.store.rows_for_year(year) {
        // Rows missing the compared metric drop out of both histograms.
        let (Some(value), Some(_)) = (record.observed(metric), record.observed(compared)) else {
            continue;
        };
        values.push(value);
        if region.contains(&record.country_id) {
            highlighted.push(value);
        }
        let highlight = ctx.state.highlight_of(record.country_id);
        let color = match highlight {
            Highlight::Slot(slot) => palette.slot_color(slot),
            Highlight::Primary => palette.primary.as_str(),
            Highlight::RegionMember | Highlight::None => continue,
        };
        markers.push(DistributionMarker {
            id: record.country_id,
            name: record.country_name.clone(),
            value,
            highlight,
            color: color.to_string(),
        });
    }

    let domain = extent(values.iter().copied()).map(|(min, max)| match start {
        DomainStart::Zero => (0.0, max),
        DomainStart::FloorOfMin => (min.floor(), max),
    });
    let edges = match (domain, ctx.state.bin_count()) {
        (None, _) => Vec::new(),
        (Some((lo, hi)), Some(count)) => equal_width_edges(lo, hi, count),
        (Some((lo, hi)), None) => {
            let width = match start {
                DomainStart::Zero => 1.0,
                DomainStart::FloorOfMin => metric.default_bin_width(),
            };
            fixed_width_edges(lo, hi, width)
        }
    };

    HistogramData {
        year,
        metric,
        domain,
        bins: paired_histogram(&values, &highlighted, &edges),
        markers,
    }
}

/// Distribution of the axis metric (happiness) for the selected year.
#[derive(Debug, Clone, Copy, Default)]
pub struct HappinessHistogramView;

impl View for HappinessHistogramView {
    fn name(&self) -> &str {
        "happiness-histogram"
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, _board: &mut AggregateBoard) -> DerivedData {
        DerivedData::Histogram(histogram(ctx, Metric::AXIS, DomainStart::Zero))
    }
}

/// Distribution of the active metric for the selected year.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricHistogramView;

impl View for MetricHistogramView {
    fn name(&self) -> &str {
        "metric-histogram"
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, _board: &mut AggregateBoard) -> DerivedData {
        let metric = ctx.state.metric();
        DerivedData::Histogram(histogram(ctx, metric, DomainStart::FloorOfMin))
    }
}
