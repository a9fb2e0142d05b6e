use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wellbeing_ingest::{IngestError, SourcePaths, load_sources, read_csv_table};
use wellbeing_model::Metric;

const DATA: &str = "\
Country name,id,year,Happiness Score,Log GDP per capita,Social support,Healthy life expectancy at birth,Freedom to make life choices,Generosity,Perceptions of corruption
Sweden,752,2019,7.3,10.8,0.93,72.0,0.94,0.11,0.25
Sweden,752,2020,7.4,10.8,0.94,72.2,0.95,,0.24
Chad,148,2020,4.4,7.4,0.62,48.5,0.58,0.04,0.81
";

const REGIONS: &str = "\
name,alpha-3,country-code,region,sub-region
Sweden,SWE,752,Europe,Northern Europe
Chad,TCD,148,Africa,Sub-Saharan Africa
";

const WORLD: &str = r#"{"type":"Topology","objects":{"countries":{"geometries":[{"id":"752"},{"id":"148"},{"id":"010"}]}}}"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn fixture_paths(dir: &TempDir, data: &str) -> SourcePaths {
    SourcePaths {
        data: write(dir.path(), "data.csv", data),
        regions: write(dir.path(), "regions.csv", REGIONS),
        boundaries: Some(write(dir.path(), "world.json", WORLD)),
    }
}

#[test]
fn loads_all_three_sources() {
    let dir = TempDir::new().expect("temp dir");
    let sources = load_sources(&fixture_paths(&dir, DATA)).expect("load sources");

    assert_eq!(sources.records.len(), 3);
    assert_eq!(sources.regions.len(), 2);
    assert_eq!(sources.boundary_ids.len(), 3);

    let sweden_2020 = &sources.records[1];
    assert_eq!(sweden_2020.country_name, "Sweden");
    assert_eq!(sweden_2020.year, 2020);
    assert_eq!(sweden_2020.observed(Metric::Generosity), None);
    assert_eq!(sources.regions[1].classification("sub-region"), Some("Sub-Saharan Africa"));
}

#[test]
fn boundary_file_is_optional() {
    let dir = TempDir::new().expect("temp dir");
    let mut paths = fixture_paths(&dir, DATA);
    paths.boundaries = None;
    let sources = load_sources(&paths).expect("load sources");
    assert!(sources.boundary_ids.is_empty());
}

#[test]
fn any_failing_source_aborts_the_load() {
    let dir = TempDir::new().expect("temp dir");
    let mut paths = fixture_paths(&dir, DATA);
    paths.boundaries = Some(dir.path().join("missing.json"));
    let err = load_sources(&paths).unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}

#[test]
fn malformed_data_table_is_a_format_error() {
    let dir = TempDir::new().expect("temp dir");
    let data = "Country name,id,year\nSweden,752,2020\n";
    let err = load_sources(&fixture_paths(&dir, data)).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { table: "data", .. }));
    assert_eq!(
        err.to_string(),
        "data table is missing required column 'Happiness Score'"
    );
}

#[test]
fn reads_table_with_quoted_cells() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        dir.path(),
        "quoted.csv",
        "name,country-code\n\"Korea, Republic of\",410\n",
    );
    let table = read_csv_table(&path).expect("read csv");
    assert_eq!(table.rows[0][0], "Korea, Republic of");
}
