// Guideline limit table
use super::pollutant::{ConcentrationUnit, Pollutant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidelineLimit {
    pub value: f64,
    pub unit: ConcentrationUnit,
}

impl GuidelineLimit {
    pub const fn ug_m3(value: f64) -> Self {
        Self {
            value,
            unit: ConcentrationUnit::MicrogramsPerCubicMetre,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GuidelineError {
    #[error("guideline limit for {pollutant} must be a positive number, got {value}")]
    InvalidLimit { pollutant: Pollutant, value: f64 },
    #[error("unknown pollutant in guideline table: {0}")]
    UnknownPollutant(String),
}

/// WHO 24-hour guideline values.
const WHO_24H: [(Pollutant, GuidelineLimit); 6] = [
    (Pollutant::Pm25, GuidelineLimit::ug_m3(15.0)),
    (Pollutant::Pm10, GuidelineLimit::ug_m3(45.0)),
    (Pollutant::No2, GuidelineLimit::ug_m3(25.0)),
    (Pollutant::So2, GuidelineLimit::ug_m3(40.0)),
    (Pollutant::O3, GuidelineLimit::ug_m3(100.0)),
    (
        Pollutant::Co,
        GuidelineLimit {
            value: 4.0,
            unit: ConcentrationUnit::MilligramsPerCubicMetre,
        },
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub struct GuidelineTable {
    limits: BTreeMap<Pollutant, GuidelineLimit>,
}

impl Default for GuidelineTable {
    fn default() -> Self {
        Self {
            limits: WHO_24H.into_iter().collect(),
        }
    }
}

impl GuidelineTable {
    pub fn new(limits: impl IntoIterator<Item = (Pollutant, GuidelineLimit)>) -> Result<Self, GuidelineError> {
        let limits: BTreeMap<_, _> = limits.into_iter().collect();
        for (pollutant, limit) in &limits {
            if !limit.value.is_finite() || limit.value <= 0.0 {
                return Err(GuidelineError::InvalidLimit {
                    pollutant: *pollutant,
                    value: limit.value,
                });
            }
        }
        Ok(Self { limits })
    }

    /// Start from the WHO defaults and replace the entries named in
    /// `overrides` (keys are pollutant identifiers in any spelling).
    pub fn with_overrides(overrides: &BTreeMap<String, GuidelineLimit>) -> Result<Self, GuidelineError> {
        let mut limits = Self::default().limits;
        for (id, limit) in overrides {
            let pollutant =
                Pollutant::parse(id).ok_or_else(|| GuidelineError::UnknownPollutant(id.clone()))?;
            limits.insert(pollutant, *limit);
        }
        Self::new(limits)
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<&GuidelineLimit> {
        self.limits.get(&pollutant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_who_defaults() {
        let table = GuidelineTable::default();
        assert_eq!(table.get(Pollutant::Pm25).unwrap().value, 15.0);
        assert_eq!(table.get(Pollutant::Pm10).unwrap().value, 45.0);
        assert_eq!(table.get(Pollutant::No2).unwrap().value, 25.0);
        assert_eq!(table.get(Pollutant::So2).unwrap().value, 40.0);
        assert_eq!(table.get(Pollutant::O3).unwrap().value, 100.0);
        assert_eq!(
            table.get(Pollutant::Co).unwrap().unit,
            ConcentrationUnit::MilligramsPerCubicMetre
        );
    }

    #[test]
    fn test_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("pm25".to_string(), GuidelineLimit::ug_m3(5.0));
        let table = GuidelineTable::with_overrides(&overrides).unwrap();
        assert_eq!(table.get(Pollutant::Pm25).unwrap().value, 5.0);
        assert_eq!(table.get(Pollutant::Pm10).unwrap().value, 45.0);
    }

    #[test]
    fn test_rejects_bad_limits() {
        let mut overrides = BTreeMap::new();
        overrides.insert("NO2".to_string(), GuidelineLimit::ug_m3(0.0));
        assert!(matches!(
            GuidelineTable::with_overrides(&overrides),
            Err(GuidelineError::InvalidLimit { pollutant: Pollutant::No2, .. })
        ));

        let mut overrides = BTreeMap::new();
        overrides.insert("NH3".to_string(), GuidelineLimit::ug_m3(10.0));
        assert!(matches!(
            GuidelineTable::with_overrides(&overrides),
            Err(GuidelineError::UnknownPollutant(_))
        ));
    }
}
