#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Calendar year of an observation.
pub type Year = i32;

/// Numeric country code shared by the data table, the region table and the
/// boundary file.
///
/// Code `0` is reserved: the dashboard historically used it as the empty
/// slot sentinel, so it never names a country.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct CountryId(u32);

impl CountryId {
    pub fn new(code: u32) -> Result<Self, ModelError> {
        if code == 0 {
            return Err(ModelError::InvalidCountryId(code.to_string()));
        }
        Ok(Self(code))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for CountryId {
    type Error = ModelError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<CountryId> for u32 {
    fn from(id: CountryId) -> Self {
        id.0
    }
}

impl FromStr for CountryId {
    type Err = ModelError;

    /// Parses codes as they appear in the source files ("004", "4", " 840 ").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = trimmed
            .parse::<u32>()
            .or_else(|_| {
                // Some exports write codes as floats ("4.0").
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
                    .map(|v| v as u32)
                    .ok_or(())
            })
            .map_err(|()| ModelError::InvalidCountryId(s.to_string()))?;
        Self::new(code).map_err(|_| ModelError::InvalidCountryId(s.to_string()))
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_codes() {
        let id: CountryId = "004".parse().unwrap();
        assert_eq!(id.get(), 4);
        assert_eq!(id.to_string(), "004");
    }

    #[test]
    fn parses_float_codes() {
        let id: CountryId = "840.0".parse().unwrap();
        assert_eq!(id.get(), 840);
    }

    #[test]
    fn deserialization_rejects_zero() {
        let id: CountryId = serde_json::from_str("840").unwrap();
        assert_eq!(id.get(), 840);
        assert!(serde_json::from_str::<CountryId>("0").is_err());
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(CountryId::new(0).is_err());
        assert!("0".parse::<CountryId>().is_err());
        assert!("abc".parse::<CountryId>().is_err());
        assert!("4.5".parse::<CountryId>().is_err());
        assert!("".parse::<CountryId>().is_err());
    }
}
