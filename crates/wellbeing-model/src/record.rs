use serde::Serialize;

use crate::ids::{CountryId, Year};
use crate::metric::{Metric, MetricMap};

/// One country-year observation. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub country_id: CountryId,
    pub country_name: String,
    pub year: Year,
    pub metrics: MetricMap<f64>,
}

impl Record {
    pub fn new(
        country_id: CountryId,
        country_name: impl Into<String>,
        year: Year,
        metrics: MetricMap<f64>,
    ) -> Self {
        Self {
            country_id,
            country_name: country_name.into(),
            year,
            metrics,
        }
    }

    /// Raw metric value as loaded, including the `0.0` missing marker.
    pub fn value(&self, metric: Metric) -> f64 {
        self.metrics[metric]
    }

    /// Metric value, or `None` when the source left it empty.
    ///
    /// The data table encodes missing observations as exactly `0`.
    pub fn observed(&self, metric: Metric) -> Option<f64> {
        let value = self.metrics[metric];
        (value != 0.0 && value.is_finite()).then_some(value)
    }
}
