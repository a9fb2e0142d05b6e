//! Headless driver: load the sources, apply interactions, collect what every
//! view drew.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;
use wellbeing_core::{
    ClickTarget, Dashboard, DashboardConfig, DatasetStore, DerivedData, DispatchOutcome,
    InteractionEvent, RecordingRenderer,
};
use wellbeing_core::views::CountryStatus;
use wellbeing_ingest::{SourcePaths, load_sources};
use wellbeing_model::{CountryId, Metric, Year};

pub fn load_store(paths: &SourcePaths) -> Result<DatasetStore> {
    let sources = load_sources(paths)
        .with_context(|| format!("load sources from {}", paths.data.display()))?;
    DatasetStore::from_sources(sources).context("index dataset")
}

/// Defaults unless a TOML file is given.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(DashboardConfig::default()),
    }
}

/// One line of the `metrics` listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub default_bin_width: f64,
    pub inverted: bool,
    pub axis: bool,
}

pub fn metric_catalog() -> Vec<MetricInfo> {
    Metric::ALL
        .into_iter()
        .map(|metric| MetricInfo {
            name: metric.as_str(),
            label: metric.label(),
            default_bin_width: metric.default_bin_width(),
            inverted: metric.is_inverted(),
            axis: metric == Metric::AXIS,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub countries: usize,
    pub boundaries: usize,
    pub year_range: Option<(Year, Year)>,
    pub countries_per_year: BTreeMap<Year, usize>,
    /// Classification column to number of distinct values.
    pub classifications: BTreeMap<String, usize>,
}

pub fn summarize(store: &DatasetStore) -> DatasetSummary {
    let countries_per_year = store
        .all_years()
        .into_iter()
        .map(|year| (year, store.rows_for_year(year).count()))
        .collect();
    let classifications = store
        .classification_columns()
        .map(|column| {
            (
                column.to_string(),
                store.classification_values(column).len(),
            )
        })
        .collect();
    DatasetSummary {
        records: store.records().len(),
        countries: store.valid_countries().len(),
        boundaries: store.boundary_ids().len(),
        year_range: store.year_range(),
        countries_per_year,
        classifications,
    }
}

/// `COLUMN=VALUE` region filter argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFilter {
    pub classification: String,
    pub value: String,
}

impl FromStr for RegionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((classification, value)) = s.split_once('=') else {
            return Err(format!("expected COLUMN=VALUE, got '{s}'"));
        };
        let classification = classification.trim();
        if classification.is_empty() {
            return Err(format!("missing classification column in '{s}'"));
        }
        Ok(Self {
            classification: classification.to_string(),
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.classification, self.value)
    }
}

/// Interactions given as command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Interactions {
    pub year: Option<Year>,
    pub select: Vec<CountryId>,
    pub primary: Option<CountryId>,
    pub region: Option<RegionFilter>,
    pub metric: Option<Metric>,
    pub confidence: Option<f64>,
    pub bins: Option<usize>,
}

impl Interactions {
    /// Events in application order: year, comparison clicks, primary, region,
    /// metric, confidence, bins.
    pub fn events(&self) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        if let Some(year) = self.year {
            events.push(InteractionEvent::SetYear { year });
        }
        events.extend(self.select.iter().map(|&country| InteractionEvent::Click {
            target: ClickTarget::Map,
            country,
        }));
        if let Some(country) = self.primary {
            events.push(InteractionEvent::SetPrimary {
                country: Some(country),
            });
        }
        if let Some(region) = &self.region {
            events.push(InteractionEvent::SetRegion {
                classification: region.classification.clone(),
                value: region.value.clone(),
            });
        }
        if let Some(metric) = self.metric {
            events.push(InteractionEvent::SetMetric { metric });
        }
        if let Some(percent) = self.confidence {
            events.push(InteractionEvent::SetConfidence { percent });
        }
        if let Some(count) = self.bins {
            events.push(InteractionEvent::SetBins { count: Some(count) });
        }
        events
    }
}

/// Parse a JSON-lines event stream. Blank lines and `#` comments are skipped.
pub fn parse_event_stream(contents: &str) -> Result<Vec<InteractionEvent>> {
    let mut events = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line)
            .with_context(|| format!("invalid event on line {}", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}

pub fn read_event_stream(path: &Path) -> Result<Vec<InteractionEvent>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read event stream {}", path.display()))?;
    parse_event_stream(&contents).with_context(|| format!("parse {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Refreshed,
    Unchanged,
    Rejected,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Refreshed => "refreshed",
            StepStatus::Unchanged => "unchanged",
            StepStatus::Rejected => "rejected",
        }
    }
}

/// What happened to one dispatched event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub event: &'static str,
    pub status: StepStatus,
    pub pass: Option<u64>,
    pub views: usize,
    pub message: Option<String>,
}

impl StepOutcome {
    fn new(step: usize, event: &InteractionEvent, outcome: &DispatchOutcome) -> Self {
        let (status, pass, views, message) = match outcome {
            DispatchOutcome::Refreshed(report) => (
                StepStatus::Refreshed,
                Some(report.pass),
                report.views.len(),
                None,
            ),
            DispatchOutcome::Unchanged => (StepStatus::Unchanged, None, 0, None),
            DispatchOutcome::Rejected(err) => {
                (StepStatus::Rejected, None, 0, Some(err.to_string()))
            }
        };
        Self {
            step,
            event: event.name(),
            status,
            pass,
            views,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub view: String,
    pub data: DerivedData,
}

/// Everything `inspect` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub year: Year,
    pub metric: Metric,
    pub primary: Option<CountryId>,
    pub region: Option<String>,
    pub view_order: Vec<String>,
    pub steps: Vec<StepOutcome>,
    pub views: Vec<ViewSnapshot>,
}

/// A dashboard with the standard views, recording every frame it draws.
#[derive(Debug)]
pub struct Harness {
    dashboard: Dashboard,
    renderer: RecordingRenderer,
}

impl Harness {
    pub fn new(store: DatasetStore, config: DashboardConfig) -> Result<Self> {
        let renderer = RecordingRenderer::new();
        let dashboard = Dashboard::new(store, config)
            .with_default_views(renderer.clone())
            .context("register default views")?;
        Ok(Self {
            dashboard,
            renderer,
        })
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Dispatch `events` in order, one outcome each.
    pub fn apply(&mut self, events: &[InteractionEvent]) -> Vec<StepOutcome> {
        events
            .iter()
            .enumerate()
            .map(|(idx, event)| {
                let outcome = self.dashboard.dispatch(event);
                let step = StepOutcome::new(idx + 1, event, &outcome);
                tracing::info!(
                    step = step.step,
                    event = step.event,
                    status = step.status.as_str(),
                    "event applied"
                );
                step
            })
            .collect()
    }

    /// Latest data of every view in refresh order. Runs an initial refresh
    /// when nothing has been drawn yet.
    pub fn snapshot(&mut self) -> Vec<ViewSnapshot> {
        if self.renderer.last_pass().is_empty() {
            self.dashboard.refresh_all();
        }
        self.dashboard
            .view_order()
            .into_iter()
            .filter_map(|view| {
                self.renderer.latest(view).map(|data| ViewSnapshot {
                    view: view.to_string(),
                    data,
                })
            })
            .collect()
    }

    pub fn inspect(&mut self, events: &[InteractionEvent]) -> InspectReport {
        let steps = self.apply(events);
        let views = self.snapshot();
        let state = self.dashboard.state();
        InspectReport {
            year: state.year(),
            metric: state.metric(),
            primary: state.primary(),
            region: state.region().map(|region| region.label().to_string()),
            view_order: self
                .dashboard
                .view_order()
                .into_iter()
                .map(str::to_string)
                .collect(),
            steps,
            views,
        }
    }
}

pub fn data_kind(data: &DerivedData) -> &'static str {
    match data {
        DerivedData::RegionSummary(_) => "region summary",
        DerivedData::Map(_) => "map",
        DerivedData::Selector(_) => "selector",
        DerivedData::Scatter(_) => "scatter",
        DerivedData::Histogram(_) => "histogram",
        DerivedData::Radar(_) => "radar",
        DerivedData::Lines(_) => "lines",
    }
}

/// One-line digest of a view's derived data.
pub fn describe(data: &DerivedData) -> String {
    match data {
        DerivedData::RegionSummary(region) => match &region.label {
            Some(label) => format!("{label}: {} members", region.members),
            None => "no region selected".to_string(),
        },
        DerivedData::Map(map) => {
            let observed = map
                .countries
                .iter()
                .filter(|country| matches!(country.status, CountryStatus::Observed(_)))
                .count();
            format!(
                "{} countries, {observed} observed, {}",
                map.countries.len(),
                format_extent(map.extent)
            )
        }
        DerivedData::Selector(selector) => {
            let selectable = selector
                .countries
                .iter()
                .filter(|country| country.selectable)
                .count();
            format!(
                "{selectable} of {} selectable, {}",
                selector.countries.len(),
                format_extent(selector.extent)
            )
        }
        DerivedData::Scatter(scatter) => {
            let fit = if scatter.regression.is_degenerate() {
                "no regression".to_string()
            } else {
                format!(
                    "slope {:.3}, intercept {:.3}",
                    scatter.regression.slope, scatter.regression.intercept
                )
            };
            format!(
                "{} vs {}: {} points, {fit}",
                scatter.y_metric.label(),
                scatter.x_metric.label(),
                scatter.points.len()
            )
        }
        DerivedData::Histogram(histogram) => {
            let total: usize = histogram.bins.iter().map(|bin| bin.total).sum();
            let highlighted: usize = histogram.bins.iter().map(|bin| bin.highlighted).sum();
            format!(
                "{}: {} bins, {total} values, {highlighted} highlighted",
                histogram.metric.label(),
                histogram.bins.len()
            )
        }
        DerivedData::Radar(radar) => {
            format!("{} series over {} axes", radar.series.len(), radar.axes.len())
        }
        DerivedData::Lines(lines) if !lines.visible => "hidden (no primary country)".to_string(),
        DerivedData::Lines(lines) => {
            let series: usize = lines.charts.iter().map(|chart| chart.series.len()).sum();
            format!(
                "{} charts, {series} series over {} years",
                lines.charts.len(),
                lines.years.len()
            )
        }
    }
}

fn format_extent(extent: Option<(f64, f64)>) -> String {
    match extent {
        Some((min, max)) => format!("extent {min:.2} to {max:.2}"),
        None => "no extent".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_filter_parses_column_and_value() {
        let filter: RegionFilter = "sub-region = Northern Europe".parse().unwrap();
        assert_eq!(filter.classification, "sub-region");
        assert_eq!(filter.value, "Northern Europe");
        assert_eq!(filter.to_string(), "sub-region=Northern Europe");

        let cleared: RegionFilter = "region=".parse().unwrap();
        assert!(cleared.value.is_empty());

        assert!("Europe".parse::<RegionFilter>().is_err());
        assert!("=Europe".parse::<RegionFilter>().is_err());
    }

    #[test]
    fn flag_interactions_keep_their_order() {
        let interactions = Interactions {
            year: Some(2019),
            select: vec![CountryId::new(752).unwrap(), CountryId::new(578).unwrap()],
            primary: Some(CountryId::new(404).unwrap()),
            metric: Some(Metric::Generosity),
            bins: Some(5),
            ..Interactions::default()
        };
        let names: Vec<&str> = interactions
            .events()
            .iter()
            .map(InteractionEvent::name)
            .collect();
        assert_eq!(
            names,
            vec!["set_year", "click", "click", "set_primary", "set_metric", "set_bins"]
        );
    }

    #[test]
    fn event_stream_skips_blank_and_comment_lines() {
        let events = parse_event_stream(
            "# warm-up\n{\"event\": \"set_year\", \"year\": 2019}\n\n{\"event\": \"brush_end\"}\n",
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                InteractionEvent::SetYear { year: 2019 },
                InteractionEvent::BrushEnd
            ]
        );
    }

    #[test]
    fn event_stream_reports_line_number() {
        let err = parse_event_stream("{\"event\": \"brush_end\"}\n{\"event\": \"zoom\"}\n")
            .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn catalog_marks_axis_and_inverted_metrics() {
        let catalog = metric_catalog();
        assert_eq!(catalog.len(), 7);
        assert!(catalog[0].axis);
        let inverted: Vec<&str> = catalog
            .iter()
            .filter(|info| info.inverted)
            .map(|info| info.name)
            .collect();
        assert_eq!(inverted, vec!["Perceptions of corruption"]);
    }
}
