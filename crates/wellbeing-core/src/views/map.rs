use serde::Serialize;
use wellbeing_model::{CountryId, Metric, Year};
use wellbeing_stats::extent;

use super::{AggregateBoard, AggregateKey, DerivedData, View, ViewContext, missing_aggregate};
use crate::selection::{Highlight, Projection};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "happiness", rename_all = "snake_case")]
pub enum CountryStatus {
    Observed(f64),
    /// The country has data, but not for the selected year.
    MissingForYear,
    /// The country never appears in the dataset.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapCountry {
    pub id: CountryId,
    pub name: Option<String>,
    pub status: CountryStatus,
    pub highlight: Highlight,
    /// Slot or primary color; `None` leaves the fill to the color scale.
    pub fill: Option<String>,
    /// Region stroke color for members of the active region.
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLegend {
    pub primary: Option<String>,
    pub region: Option<String>,
    /// Unit ticks of the happiness color scale, `0..=ceil(max)`.
    pub ticks: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub year: Year,
    pub projection: Projection,
    /// Domain of the happiness color scale for the year.
    pub extent: Option<(f64, f64)>,
    pub countries: Vec<MapCountry>,
    pub legend: MapLegend,
}

/// Comparison map colored by happiness.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapView;

const CONSUMES: [AggregateKey; 1] = [AggregateKey::RegionSummary];

impl View for MapView {
    fn name(&self) -> &str {
        "map"
    }

    fn consumes(&self) -> &[AggregateKey] {
        &CONSUMES
    }

    fn recompute(&mut self, ctx: &ViewContext<'_>, board: &mut AggregateBoard) -> DerivedData {
        let year = ctx.state.year();
        let palette = &ctx.config.palette;
        let extent = extent(
            ctx.store
                .rows_for_year(year)
                .filter_map(|record| record.observed(Metric::AXIS)),
        );

        let countries = ctx
            .store
            .map_countries()
            .into_iter()
            .map(|id| {
                let status = match ctx.store.record(id, year) {
                    Some(record) => match record.observed(Metric::AXIS) {
                        Some(value) => CountryStatus::Observed(value),
                        None => CountryStatus::MissingForYear,
                    },
                    None if ctx.store.is_valid(id) => CountryStatus::MissingForYear,
                    None => CountryStatus::NoData,
                };
                let highlight = ctx.state.highlight_of(id);
                let fill = match highlight {
                    Highlight::Slot(slot) => Some(palette.slot_color(slot).to_string()),
                    Highlight::Primary => Some(palette.primary.clone()),
                    Highlight::RegionMember | Highlight::None => None,
                };
                let stroke = ctx
                    .state
                    .region_filter()
                    .contains(&id)
                    .then(|| palette.region.clone());
                MapCountry {
                    id,
                    name: ctx.store.country_name(id).map(str::to_string),
                    status,
                    highlight,
                    fill,
                    stroke,
                }
            })
            .collect();

        let region = match board.region_summary() {
            Some(summary) if summary.has_data() => summary.label.clone(),
            Some(_) => None,
            None => {
                missing_aggregate(self.name(), AggregateKey::RegionSummary);
                None
            }
        };
        let legend = MapLegend {
            primary: ctx
                .state
                .primary()
                .and_then(|id| ctx.store.country_name(id))
                .map(str::to_string),
            region,
            ticks: extent.map_or_else(Vec::new, |(_, max)| (0..=max.max(0.0).ceil() as u32).collect()),
        };

        DerivedData::Map(MapData {
            year,
            projection: ctx.state.projection(),
            extent,
            countries,
            legend,
        })
    }
}
