//! Harness runs against fixture files on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wellbeing_cli::harness::{
    Harness, Interactions, StepStatus, describe, load_config, load_store, read_event_stream,
    summarize,
};
use wellbeing_core::{DerivedData, InteractionEvent};
use wellbeing_ingest::SourcePaths;
use wellbeing_model::CountryId;

const DATA: &str = "\
Country name,id,year,Happiness Score,Log GDP per capita,Social support,Healthy life expectancy at birth,Freedom to make life choices,Generosity,Perceptions of corruption
Sweden,752,2019,7.3,10.8,0.93,72.0,0.94,0.11,0.25
Sweden,752,2020,7.4,10.8,0.94,72.2,0.95,0.12,0.24
Norway,578,2020,7.3,11.1,0.95,73.2,0.96,0.15,0.26
Chad,148,2020,4.4,7.4,0.62,48.5,0.58,0.04,0.81
";

const REGIONS: &str = "\
name,alpha-3,country-code,region,sub-region
Sweden,SWE,752,Europe,Northern Europe
Norway,NOR,578,Europe,Northern Europe
Chad,TCD,148,Africa,Sub-Saharan Africa
";

const WORLD: &str = r#"{"type":"Topology","objects":{"countries":{"geometries":[{"id":"752"},{"id":"578"},{"id":"148"},{"id":"010"}]}}}"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn fixture(dir: &TempDir) -> SourcePaths {
    SourcePaths {
        data: write(dir.path(), "data.csv", DATA),
        regions: write(dir.path(), "regions.csv", REGIONS),
        boundaries: Some(write(dir.path(), "world.json", WORLD)),
    }
}

fn harness(dir: &TempDir) -> Harness {
    let store = load_store(&fixture(dir)).expect("load store");
    Harness::new(store, load_config(None).expect("default config")).expect("harness")
}

fn id(code: u32) -> CountryId {
    CountryId::new(code).unwrap()
}

#[test]
fn summary_counts_years_and_classifications() {
    let dir = TempDir::new().expect("temp dir");
    let store = load_store(&fixture(&dir)).expect("load store");
    let summary = summarize(&store);

    assert_eq!(summary.records, 4);
    assert_eq!(summary.countries, 3);
    assert_eq!(summary.boundaries, 4);
    assert_eq!(summary.year_range, Some((2019, 2020)));
    assert_eq!(
        summary.countries_per_year,
        BTreeMap::from([(2019, 1), (2020, 3)])
    );
    assert_eq!(summary.classifications.get("region"), Some(&2));
    assert_eq!(summary.classifications.get("sub-region"), Some(&2));
}

#[test]
fn inspect_applies_flag_interactions_in_order() {
    let dir = TempDir::new().expect("temp dir");
    let mut harness = harness(&dir);
    let interactions = Interactions {
        year: Some(2020),
        select: vec![id(752), id(148)],
        primary: Some(id(578)),
        region: Some("region=Europe".parse().unwrap()),
        ..Interactions::default()
    };

    let report = harness.inspect(&interactions.events());

    let statuses: Vec<StepStatus> = report.steps.iter().map(|step| step.status).collect();
    assert_eq!(
        statuses,
        vec![
            StepStatus::Unchanged,
            StepStatus::Refreshed,
            StepStatus::Refreshed,
            StepStatus::Refreshed,
            StepStatus::Refreshed,
        ]
    );
    let passes: Vec<Option<u64>> = report.steps.iter().map(|step| step.pass).collect();
    assert_eq!(passes, vec![None, Some(1), Some(2), Some(3), Some(4)]);
    assert!(report.steps[1..].iter().all(|step| step.views == 8));

    assert_eq!(report.year, 2020);
    assert_eq!(report.primary, Some(id(578)));
    assert_eq!(report.region.as_deref(), Some("Europe"));
    assert_eq!(report.views.len(), 8);
    assert_eq!(report.view_order[0], "region-summary");

    let radar = report
        .views
        .iter()
        .find(|snapshot| snapshot.view == "radar")
        .expect("radar drawn");
    insta::assert_snapshot!(describe(&radar.data), @"4 series over 7 axes");
}

#[test]
fn inspect_without_interactions_draws_the_initial_state() {
    let dir = TempDir::new().expect("temp dir");
    let mut harness = harness(&dir);
    let report = harness.inspect(&[]);

    assert!(report.steps.is_empty());
    assert_eq!(report.views.len(), 8);
    let lines = report
        .views
        .iter()
        .find(|snapshot| snapshot.view == "lines")
        .expect("lines drawn");
    assert!(matches!(lines.data, DerivedData::Lines(_)));
    assert_eq!(describe(&lines.data), "hidden (no primary country)");

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["views"][0]["view"], "region-summary");
    assert_eq!(json["views"][0]["data"]["kind"], "region_summary");
}

#[test]
fn rejected_interaction_keeps_the_state() {
    let dir = TempDir::new().expect("temp dir");
    let mut harness = harness(&dir);
    let steps = harness.apply(&[
        InteractionEvent::SetYear { year: 1999 },
        InteractionEvent::SetBins { count: Some(0) },
    ]);

    assert!(steps.iter().all(|step| step.status == StepStatus::Rejected));
    assert!(steps[0].message.as_deref().unwrap_or_default().contains("1999"));
    assert_eq!(harness.dashboard().state().year(), 2020);
}

#[test]
fn replay_reads_json_lines() {
    let dir = TempDir::new().expect("temp dir");
    let events = write(
        dir.path(),
        "events.jsonl",
        "{\"event\": \"set_year\", \"year\": 2019}\n\
         {\"event\": \"click\", \"target\": \"selector\", \"country\": 148}\n\
         {\"event\": \"click\", \"target\": \"selector\", \"country\": 752}\n",
    );
    let events = read_event_stream(&events).expect("read events");
    let mut harness = harness(&dir);
    let steps = harness.apply(&events);

    let statuses: Vec<StepStatus> = steps.iter().map(|step| step.status).collect();
    assert_eq!(
        statuses,
        vec![
            StepStatus::Refreshed,
            StepStatus::Unchanged,
            StepStatus::Refreshed,
        ]
    );
    assert_eq!(steps[2].event, "click");
    assert_eq!(harness.dashboard().state().primary(), Some(id(752)));
}

#[test]
fn load_failures_carry_context() {
    let dir = TempDir::new().expect("temp dir");
    let mut paths = fixture(&dir);
    paths.data = dir.path().join("missing.csv");
    let err = load_store(&paths).unwrap_err();
    assert!(err.to_string().starts_with("load sources from"));

    let config = write(dir.path(), "dashboard.toml", "slot_capacity = 0\n");
    let err = load_config(Some(&config)).unwrap_err();
    assert!(err.to_string().starts_with("load config"));

    let events = write(dir.path(), "bad.jsonl", "{\"event\": \"set_year\"}\n");
    let err = read_event_stream(&events).unwrap_err();
    assert!(format!("{err:#}").contains("line 1"));
}
