//! Error types for loading dashboard sources.

use std::path::PathBuf;

use thiserror::Error;

use wellbeing_model::{CountryId, ModelError, Year};

/// Errors raised while reading or coercing source files.
///
/// Every variant is fatal to startup: no view is built from a partially
/// loaded dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed boundary JSON.
    #[error("failed to parse boundary file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required column is absent from the header row.
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    /// A metric cell could not be coerced to a number.
    #[error("row {row}: column '{column}' is not numeric: {value:?}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// A year cell is not an integer.
    #[error("row {row}: year is not an integer: {value:?}")]
    NonIntegerYear { row: usize, value: String },

    /// A country code cell is empty, zero or not numeric.
    #[error("{table} table row {row}: {source}")]
    InvalidCountryId {
        table: &'static str,
        row: usize,
        #[source]
        source: ModelError,
    },

    /// More than one record for the same country and year.
    #[error("duplicate record for country {country} in {year}")]
    DuplicateRecord { country: CountryId, year: Year },

    /// The boundary file has neither TopoJSON objects nor GeoJSON features.
    #[error("boundary file {path} has no country geometries")]
    NoGeometries { path: PathBuf },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
