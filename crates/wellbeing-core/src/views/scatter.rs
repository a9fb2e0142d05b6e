use std::collections::BTreeSet;

use serde::Serialize;
use wellbeing_model::{CountryId, Metric, Year};
use wellbeing_stats::{
    BandPoint, Regression, confidence_band, extent, linear_regression, linspace,
};

use super::{AggregateBoard, DerivedData, View, ViewContext};
use crate::selection::{BrushRect, Highlight};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub id: CountryId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub highlight: Highlight,
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterData {
    pub year: Year,
    pub x_metric: Metric,
    pub y_metric: Metric,
    /// `[0, max]` of the axis metric.
    pub x_domain: Option<(f64, f64)>,
    pub y_domain: Option<(f64, f64)>,
    pub points: Vec<ScatterPoint>,
    pub regression: Regression,
    /// Regression line at both ends of the x domain.
    pub line: Option<[(f64, f64); 2]>,
    pub confidence_level: f64,
    pub band: Vec<BandPoint>,
    pub brush: Option<BrushRect>,
}

/// Happiness against the active metric, with the fitted line and its
/// confidence band.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScatterView;

impl View for ScatterView {
    fn name(&self) -> &str {
        "scatter"
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, _board: &mut AggregateBoard) -> DerivedData {
        let year = ctx.state.year();
        let metric = ctx.state.metric();
        let palette = &ctx.config.palette;

        let points: Vec<ScatterPoint> = ctx
            .store
            .rows_for_year(year)
            .filter_map(|record| {
                let x = record.observed(Metric::AXIS)?;
                let y = record.observed(metric)?;
                let highlight = ctx.state.highlight_of(record.country_id);
                let color = match highlight {
                    Highlight::Slot(slot) => palette.slot_color(slot),
                    Highlight::Primary => palette.primary.as_str(),
                    Highlight::RegionMember => palette.region.as_str(),
                    Highlight::None => palette.default.as_str(),
                };
                Some(ScatterPoint {
                    id: record.country_id,
                    name: record.country_name.clone(),
                    x,
                    y,
                    highlight,
                    color: color.to_string(),
                    opacity: highlight.opacity(),
                })
            })
            .collect();

        let pairs: Vec<(f64, f64)> = points.iter().map(|point| (point.x, point.y)).collect();
        let x_domain = extent(points.iter().map(|point| point.x)).map(|(_, max)| (0.0, max));
        let y_domain = extent(points.iter().map(|point| point.y));
        let regression = linear_regression(&pairs);
        let level = ctx.state.confidence_level();

        let (line, band) = match x_domain {
            Some((lo, hi)) if !regression.is_degenerate() => {
                let xs = linspace(lo, hi, ctx.config.band_samples);
                (
                    Some([(lo, regression.predict(lo)), (hi, regression.predict(hi))]),
                    confidence_band(&pairs, &xs, level),
                )
            }
            _ => (None, Vec::new()),
        };

        DerivedData::Scatter(ScatterData {
            year,
            x_metric: Metric::AXIS,
            y_metric: metric,
            x_domain,
            y_domain,
            points,
            regression,
            line,
            confidence_level: level,
            band,
            brush: ctx.state.brush(),
        })
    }
}

/// Countries whose scatter point for the selected year falls inside `rect`.
pub(crate) fn brushed_ids(ctx: &ViewContext<'_>, rect: BrushRect) -> BTreeSet<CountryId> {
    let metric = ctx.state.metric();
    ctx.store
        .rows_for_year(ctx.state.year())
        .filter(|record| {
            match (record.observed(Metric::AXIS), record.observed(metric)) {
                (Some(x), Some(y)) => rect.contains(x, y),
                _ => false,
            }
        })
        .map(|record| record.country_id)
        .collect()
}
