use serde::Serialize;
use wellbeing_model::{CountryId, Metric, Year};
use wellbeing_stats::extent;

use super::{AggregateBoard, DerivedData, View, ViewContext};
use crate::selection::{Highlight, Projection};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorCountry {
    pub id: CountryId,
    pub name: Option<String>,
    pub happiness: Option<f64>,
    /// Clicking sets the primary country only when it has a record this year.
    pub selectable: bool,
    pub highlight: Highlight,
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorData {
    pub year: Year,
    pub projection: Projection,
    pub extent: Option<(f64, f64)>,
    pub primary: Option<CountryId>,
    pub countries: Vec<SelectorCountry>,
}

/// The "pick my country" map.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorView;

impl View for SelectorView {
    fn name(&self) -> &str {
        "selector"
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, _board: &mut AggregateBoard) -> DerivedData {
        let year = ctx.state.year();
        let palette = &ctx.config.palette;
        let countries = ctx
            .store
            .map_countries()
            .into_iter()
            .map(|id| {
                let record = ctx.store.record(id, year);
                let highlight = match ctx.state.highlight_of(id) {
                    Highlight::RegionMember => Highlight::None,
                    other => other,
                };
                let stroke = match highlight {
                    Highlight::Slot(slot) => Some(palette.slot_color(slot).to_string()),
                    Highlight::Primary => Some(palette.primary.clone()),
                    Highlight::RegionMember | Highlight::None => None,
                };
                SelectorCountry {
                    id,
                    name: ctx.store.country_name(id).map(str::to_string),
                    happiness: record.and_then(|record| record.observed(Metric::AXIS)),
                    selectable: record.is_some(),
                    highlight,
                    stroke,
                }
            })
            .collect();

        DerivedData::Selector(SelectorData {
            year,
            projection: ctx.state.projection(),
            extent: extent(
                ctx.store
                    .rows_for_year(year)
                    .filter_map(|record| record.observed(Metric::AXIS)),
            ),
            primary: ctx.state.primary(),
            countries,
        })
    }
}
