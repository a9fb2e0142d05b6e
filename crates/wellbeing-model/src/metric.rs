//! The seven well-being indicators carried by every record.
//!
//! Metric names are the column headers of the yearly data table. The
//! enumeration fixes their order, which is also the axis order of the radar
//! chart.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::ModelError;

/// One well-being indicator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Metric {
    HappinessScore,
    LogGdpPerCapita,
    SocialSupport,
    HealthyLifeExpectancy,
    Freedom,
    Generosity,
    PerceptionsOfCorruption,
}

/// Comparison direction used when ranking a value against a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankDirection {
    /// Share of the distribution at or below the value.
    AtOrBelow,
    /// Share of the distribution at or above the value.
    AtOrAbove,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::HappinessScore,
        Metric::LogGdpPerCapita,
        Metric::SocialSupport,
        Metric::HealthyLifeExpectancy,
        Metric::Freedom,
        Metric::Generosity,
        Metric::PerceptionsOfCorruption,
    ];

    /// The fixed x-axis metric of the scatterplot and histograms.
    pub const AXIS: Metric = Metric::HappinessScore;

    /// Metric compared against the axis when nothing else is configured.
    pub const DEFAULT_COMPARED: Metric = Metric::LogGdpPerCapita;

    /// Column header in the data table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::HappinessScore => "Happiness Score",
            Metric::LogGdpPerCapita => "Log GDP per capita",
            Metric::SocialSupport => "Social support",
            Metric::HealthyLifeExpectancy => "Healthy life expectancy at birth",
            Metric::Freedom => "Freedom to make life choices",
            Metric::Generosity => "Generosity",
            Metric::PerceptionsOfCorruption => "Perceptions of corruption",
        }
    }

    /// Short label for chart axes.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::HappinessScore => "Happiness",
            Metric::LogGdpPerCapita => "GDP Per Capita",
            Metric::SocialSupport => "Social Support",
            Metric::HealthyLifeExpectancy => "Life Expectancy",
            Metric::Freedom => "Freedom",
            Metric::Generosity => "Generosity",
            Metric::PerceptionsOfCorruption => "Corruption",
        }
    }

    /// Position of the metric in [`Metric::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Metric::HappinessScore => 0,
            Metric::LogGdpPerCapita => 1,
            Metric::SocialSupport => 2,
            Metric::HealthyLifeExpectancy => 3,
            Metric::Freedom => 4,
            Metric::Generosity => 5,
            Metric::PerceptionsOfCorruption => 6,
        }
    }

    /// Lower corruption perception is better, so its rank is inverted.
    pub fn is_inverted(&self) -> bool {
        matches!(self, Metric::PerceptionsOfCorruption)
    }

    pub fn rank_direction(&self) -> RankDirection {
        if self.is_inverted() {
            RankDirection::AtOrAbove
        } else {
            RankDirection::AtOrBelow
        }
    }

    /// Histogram bin width used when no explicit bin count is selected.
    pub fn default_bin_width(&self) -> f64 {
        match self {
            Metric::HappinessScore | Metric::LogGdpPerCapita => 0.5,
            Metric::SocialSupport | Metric::Freedom => 0.05,
            Metric::HealthyLifeExpectancy => 2.0,
            Metric::Generosity | Metric::PerceptionsOfCorruption => 0.1,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ModelError;

    /// Accepts column headers and chart labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Metric::ALL
            .into_iter()
            .find(|m| {
                m.as_str().eq_ignore_ascii_case(&needle) || m.label().eq_ignore_ascii_case(&needle)
            })
            .ok_or_else(|| ModelError::UnknownMetric(s.to_string()))
    }
}

impl TryFrom<String> for Metric {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A value for each metric, stored densely in [`Metric::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricMap<T>([T; 7]);

impl<T> MetricMap<T> {
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        Self(Metric::ALL.map(&mut f))
    }

    pub fn get(&self, metric: Metric) -> &T {
        &self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: T) {
        self.0[metric.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Metric, &T) -> U) -> MetricMap<U> {
        MetricMap::from_fn(|m| f(m, self.get(m)))
    }
}

impl<T> Index<Metric> for MetricMap<T> {
    type Output = T;

    fn index(&self, metric: Metric) -> &T {
        self.get(metric)
    }
}

impl<T> IndexMut<Metric> for MetricMap<T> {
    fn index_mut(&mut self, metric: Metric) -> &mut T {
        &mut self.0[metric.index()]
    }
}

impl<T: Serialize> Serialize for MetricMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Metric::ALL.len()))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(metric.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (position, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), position);
        }
    }

    #[test]
    fn parses_headers_and_labels() {
        assert_eq!(
            "healthy life  expectancy at birth".parse::<Metric>().unwrap(),
            Metric::HealthyLifeExpectancy
        );
        assert_eq!("Corruption".parse::<Metric>().unwrap(), Metric::PerceptionsOfCorruption);
        assert!("Life Ladder".parse::<Metric>().is_err());
    }

    #[test]
    fn only_corruption_is_inverted() {
        let inverted: Vec<Metric> = Metric::ALL.into_iter().filter(Metric::is_inverted).collect();
        assert_eq!(inverted, vec![Metric::PerceptionsOfCorruption]);
        assert_eq!(
            Metric::PerceptionsOfCorruption.rank_direction(),
            RankDirection::AtOrAbove
        );
    }

    #[test]
    fn metric_map_serializes_by_header() {
        let map = MetricMap::from_fn(|m| m.index());
        let json = serde_json::to_value(map).unwrap();
        assert_eq!(json["Generosity"], 5);
        assert_eq!(json["Happiness Score"], 0);
    }
}
