use serde::Serialize;
use wellbeing_model::{CountryId, Metric, Year};

use super::{AggregateBoard, AggregateKey, DerivedData, View, ViewContext, missing_aggregate};
use crate::selection::Highlight;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub id: Option<CountryId>,
    pub highlight: Highlight,
    pub color: String,
    /// One point per year with a record; `NaN` marks a missing value.
    pub points: Vec<(Year, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub metric: Metric,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineData {
    /// The charts are only shown once a primary country is chosen.
    pub visible: bool,
    pub years: Vec<Year>,
    pub charts: Vec<LineChart>,
}

/// Yearly trends of happiness and the active metric for the selected
/// countries and the active region.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineView;

const CONSUMES: [AggregateKey; 1] = [AggregateKey::RegionSeries];

impl View for LineView {
    fn name(&self) -> &str {
        "lines"
    }

    fn consumes(&self) -> &[AggregateKey] {
        &CONSUMES
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, board: &mut AggregateBoard) -> DerivedData {
        let palette = &ctx.config.palette;
        let region = board.region_series();
        if region.is_none() {
            missing_aggregate(self.name(), AggregateKey::RegionSeries);
        }

        let charts = [Metric::AXIS, ctx.state.metric()]
            .into_iter()
            .map(|metric| {
                let mut series: Vec<LineSeries> = ctx
                    .state
                    .occupied()
                    .into_iter()
                    .map(|(id, highlight)| {
                        let color = match highlight {
                            Highlight::Slot(slot) => palette.slot_color(slot).to_string(),
                            _ => palette.primary.clone(),
                        };
                        LineSeries {
                            label: ctx.store.country_name(id).unwrap_or_default().to_string(),
                            id: Some(id),
                            highlight,
                            color,
                            points: ctx
                                .store
                                .records_for(id)
                                .into_iter()
                                .map(|record| {
                                    (record.year, record.observed(metric).unwrap_or(f64::NAN))
                                })
                                .collect(),
                        }
                    })
                    .collect();
                if let Some(region) = region.filter(|region| region.members > 0) {
                    series.push(LineSeries {
                        label: region.label.clone().unwrap_or_else(|| "Region".to_string()),
                        id: None,
                        highlight: Highlight::RegionMember,
                        color: palette.region.clone(),
                        points: region.series[metric]
                            .iter()
                            .map(|(year, mean)| (*year, *mean))
                            .collect(),
                    });
                }
                LineChart { metric, series }
            })
            .collect();

        DerivedData::Lines(LineData {
            visible: ctx.state.primary().is_some(),
            years: ctx.store.all_years(),
            charts,
        })
    }
}
