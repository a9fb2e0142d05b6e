use serde::Serialize;
use wellbeing_model::{CountryId, Metric, MetricMap, Year};
use wellbeing_stats::percentile_in_year;

use super::{AggregateBoard, AggregateKey, DerivedData, View, ViewContext, missing_aggregate};
use crate::selection::Highlight;

/// Percentile rings drawn behind the series.
pub const RADAR_TICKS: [u32; 4] = [25, 50, 75, 100];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub label: String,
    /// `None` for the region series.
    pub id: Option<CountryId>,
    pub highlight: Highlight,
    pub color: String,
    /// Percentile in `[0, 100]` per metric; `NaN` where the value is missing.
    pub values: MetricMap<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarData {
    pub year: Year,
    pub axes: Vec<Metric>,
    pub ticks: Vec<u32>,
    pub series: Vec<RadarSeries>,
}

/// Spider chart of metric percentiles for the selected countries and the
/// active region.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadarView;

const CONSUMES: [AggregateKey; 1] = [AggregateKey::RegionSummary];

impl View for RadarView {
    fn name(&self) -> &str {
        "radar"
    }

    fn consumes(&self) -> &[AggregateKey] {
        &CONSUMES
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, board: &mut AggregateBoard) -> DerivedData {
        let year = ctx.state.year();
        let palette = &ctx.config.palette;
        let year_rows: Vec<_> = ctx.store.rows_for_year(year).collect();

        let mut series = Vec::new();
        for (id, highlight) in ctx.state.occupied() {
            let Some(record) = ctx.store.record(id, year) else {
                tracing::debug!(country = %id, year, "selected country has no record this year");
                continue;
            };
            let color = match highlight {
                Highlight::Slot(slot) => palette.slot_color(slot).to_string(),
                _ => palette.primary.clone(),
            };
            series.push(RadarSeries {
                label: record.country_name.clone(),
                id: Some(id),
                highlight,
                color,
                values: MetricMap::from_fn(|metric| {
                    percentile_in_year(record.value(metric), year_rows.iter().copied(), metric)
                }),
            });
        }

        match board.region_summary() {
            Some(summary) if summary.has_data() => series.push(RadarSeries {
                label: summary
                    .label
                    .clone()
                    .unwrap_or_else(|| "Region".to_string()),
                id: None,
                highlight: Highlight::RegionMember,
                color: palette.region.clone(),
                values: summary.percentiles,
            }),
            Some(_) => {}
            None => missing_aggregate(self.name(), AggregateKey::RegionSummary),
        }

        DerivedData::Radar(RadarData {
            year,
            axes: Metric::ALL.to_vec(),
            ticks: RADAR_TICKS.to_vec(),
            series,
        })
    }
}
