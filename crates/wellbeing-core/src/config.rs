//! Dashboard configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! slot_capacity = 4
//! default_year = 2019
//! default_metric = "Social support"
//!
//! [palette]
//! slots = ["#a217dc", "#01c5a9", "#1437FF", "#e41a1c"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use wellbeing_model::{Metric, Year};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Colors of the comparison slots, by slot index. Reused cyclically when
    /// there are more slots than colors.
    pub slots: Vec<String>,
    pub primary: String,
    pub region: String,
    pub default: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            slots: vec![
                "#a217dc".to_string(),
                "#01c5a9".to_string(),
                "#1437FF".to_string(),
            ],
            primary: "#FFA500".to_string(),
            region: "#004488".to_string(),
            default: "#000".to_string(),
        }
    }
}

impl Palette {
    pub fn slot_color(&self, slot: usize) -> &str {
        if self.slots.is_empty() {
            return &self.default;
        }
        &self.slots[slot % self.slots.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Comparison slots. The primary country has its own extra slot.
    pub slot_capacity: usize,
    pub palette: Palette,
    pub default_year: Year,
    pub default_metric: Metric,
    /// Two-sided significance level of the regression band.
    pub confidence_level: f64,
    /// `None` selects the per-metric default bin widths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_count: Option<usize>,
    pub max_bin_count: usize,
    /// Number of x positions at which the confidence band is evaluated.
    pub band_samples: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            slot_capacity: 3,
            palette: Palette::default(),
            default_year: 2020,
            default_metric: Metric::DEFAULT_COMPARED,
            confidence_level: 0.05,
            bin_count: None,
            max_bin_count: 100,
            band_samples: 50,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded dashboard config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validated()
    }

    /// Check ranges and substitute the default compared metric when the axis
    /// metric was configured.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.slot_capacity == 0 {
            return Err(invalid("slot_capacity", "must be at least 1"));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(invalid(
                "confidence_level",
                format!("must be in (0, 1), got {}", self.confidence_level),
            ));
        }
        if self.band_samples < 2 {
            return Err(invalid("band_samples", "must be at least 2"));
        }
        if self.max_bin_count == 0 {
            return Err(invalid("max_bin_count", "must be at least 1"));
        }
        if let Some(count) = self.bin_count
            && (count == 0 || count > self.max_bin_count)
        {
            return Err(invalid(
                "bin_count",
                format!("must be between 1 and {}, got {count}", self.max_bin_count),
            ));
        }
        if self.default_metric == Metric::AXIS {
            tracing::warn!(
                configured = %self.default_metric,
                substitute = %Metric::DEFAULT_COMPARED,
                "default metric equals the x-axis metric"
            );
            self.default_metric = Metric::DEFAULT_COMPARED;
        }
        Ok(self)
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}
