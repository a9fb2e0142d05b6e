use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid country id: {0:?}")]
    InvalidCountryId(String),
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
