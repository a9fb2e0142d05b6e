use std::path::PathBuf;

use thiserror::Error;
use wellbeing_model::Year;

use crate::views::AggregateKey;

/// A mutator rejected its input. The selection is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("year {year} is outside the observed range {min}..={max}")]
    YearOutOfRange { year: Year, min: Year, max: Year },

    #[error("confidence percentage must be strictly between 0 and 100, got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("bin count must be between 1 and {max}, got {value}")]
    BinCountOutOfRange { value: usize, max: usize },

    #[error("unknown classification column '{0}'")]
    UnknownClassification(String),
}

/// A view could not be added to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a view named '{0}' is already registered")]
    DuplicateView(String),

    #[error("aggregate {key} is produced by both '{first}' and '{second}'")]
    DuplicateProducer {
        key: AggregateKey,
        first: String,
        second: String,
    },

    #[error("views form a dependency cycle: {}", views.join(" -> "))]
    DependencyCycle { views: Vec<String> },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}
