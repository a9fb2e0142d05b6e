//! Coercion of the yearly data table into typed records.
//!
//! The name and id columns stay strings (the id is then parsed as a country
//! code); every metric column and the year are numeric. An empty metric cell
//! becomes `0.0`, the dataset's missing-value marker.

use wellbeing_model::{CountryId, Metric, MetricMap, Record, Year};

use crate::csv_table::CsvTable;
use crate::error::{IngestError, Result};

pub const COUNTRY_NAME_COLUMN: &str = "Country name";
pub const COUNTRY_ID_COLUMN: &str = "id";
pub const YEAR_COLUMN: &str = "year";

const TABLE: &str = "data";

struct Columns {
    name: usize,
    id: usize,
    year: usize,
    metrics: MetricMap<usize>,
}

fn require(table: &CsvTable, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| IngestError::MissingColumn {
            table: TABLE,
            column: column.to_string(),
        })
}

fn resolve_columns(table: &CsvTable) -> Result<Columns> {
    let name = require(table, COUNTRY_NAME_COLUMN)?;
    let id = require(table, COUNTRY_ID_COLUMN)?;
    let year = require(table, YEAR_COLUMN)?;
    let mut metrics = MetricMap::default();
    for metric in Metric::ALL {
        metrics.set(metric, require(table, metric.as_str())?);
    }
    Ok(Columns {
        name,
        id,
        year,
        metrics,
    })
}

fn parse_metric(raw: &str, column: &str, row: usize) -> Result<f64> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| IngestError::NonNumeric {
            column: column.to_string(),
            row,
            value: raw.to_string(),
        })
}

fn parse_year(raw: &str, row: usize) -> Result<Year> {
    let non_integer = || IngestError::NonIntegerYear {
        row,
        value: raw.to_string(),
    };
    if let Ok(year) = raw.parse::<Year>() {
        return Ok(year);
    }
    let value = raw.parse::<f64>().map_err(|_| non_integer())?;
    if value.fract() != 0.0 || value < f64::from(Year::MIN) || value > f64::from(Year::MAX) {
        return Err(non_integer());
    }
    Ok(value as Year)
}

/// Coerce every data row into a [`Record`], in file order.
///
/// Rows are numbered from 1 (the first row after the header) in errors.
pub fn parse_records(table: &CsvTable) -> Result<Vec<Record>> {
    let columns = resolve_columns(table)?;
    let mut records = Vec::with_capacity(table.rows.len());
    for (idx, cells) in table.rows.iter().enumerate() {
        let row = idx + 1;
        let country_id: CountryId =
            cells[columns.id]
                .parse()
                .map_err(|source| IngestError::InvalidCountryId {
                    table: TABLE,
                    row,
                    source,
                })?;
        let year = parse_year(&cells[columns.year], row)?;
        let mut metrics = MetricMap::default();
        for metric in Metric::ALL {
            let raw = &cells[columns.metrics[metric]];
            metrics.set(metric, parse_metric(raw, metric.as_str(), row)?);
        }
        records.push(Record::new(
            country_id,
            cells[columns.name].clone(),
            year,
            metrics,
        ));
    }
    tracing::debug!(rows = records.len(), "parsed data table");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::csv_table::parse_csv_str;

    const HEADER: &str = "Country name,id,year,Happiness Score,Log GDP per capita,Social support,\
                          Healthy life expectancy at birth,Freedom to make life choices,Generosity,\
                          Perceptions of corruption";

    fn table(rows: &str) -> CsvTable {
        parse_csv_str(&format!("{HEADER}\n{rows}"), Path::new("data.csv")).unwrap()
    }

    #[test]
    fn coerces_numeric_columns() {
        let records =
            parse_records(&table("Norway,578,2020,7.3,11.0,0.95,73.3,0.96,,0.27\n")).unwrap();
        assert_eq!(records.len(), 1);
        let norway = &records[0];
        assert_eq!(norway.country_id.get(), 578);
        assert_eq!(norway.year, 2020);
        assert_eq!(norway.value(Metric::HappinessScore), 7.3);
        assert_eq!(norway.value(Metric::Generosity), 0.0);
        assert_eq!(norway.observed(Metric::Generosity), None);
    }

    #[test]
    fn accepts_integral_float_years() {
        let records = parse_records(&table("Norway,578,2020.0,7,11,1,73,1,0.1,0.2\n")).unwrap();
        assert_eq!(records[0].year, 2020);
    }

    #[test]
    fn rejects_fractional_year() {
        let err = parse_records(&table("Norway,578,2020.5,7,11,1,73,1,0.1,0.2\n")).unwrap_err();
        assert!(matches!(err, IngestError::NonIntegerYear { row: 1, .. }));
    }

    #[test]
    fn rejects_text_in_metric_column() {
        let err = parse_records(&table("Norway,578,2020,high,11,1,73,1,0.1,0.2\n")).unwrap_err();
        match err {
            IngestError::NonNumeric { column, row, value } => {
                assert_eq!(column, "Happiness Score");
                assert_eq!(row, 1);
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_metric_column_is_reported() {
        let contents = "Country name,id,year,Happiness Score\nNorway,578,2020,7.3\n";
        let table = parse_csv_str(contents, Path::new("data.csv")).unwrap();
        let err = parse_records(&table).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn { column, .. } if column == "Log GDP per capita"
        ));
    }
}
