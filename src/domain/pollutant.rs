// Pollutant vocabulary and concentration readings
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "O3")]
    O3,
    #[serde(rename = "CO")]
    Co,
}

impl Pollutant {
    /// Canonical upper-case identifier
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::O3 => "O3",
            Pollutant::Co => "CO",
        }
    }

    /// Parse an identifier as spelled by any of the upstream APIs.
    /// Returns None for anything outside the vocabulary.
    pub fn parse(id: &str) -> Option<Self> {
        // "PM2.5", "pm25", "PM2_5" all collapse to "PM25"
        let normalized: String = id
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();

        match normalized.as_str() {
            "PM25" => Some(Pollutant::Pm25),
            "PM10" => Some(Pollutant::Pm10),
            "NO2" => Some(Pollutant::No2),
            "SO2" => Some(Pollutant::So2),
            "O3" | "OZONE" => Some(Pollutant::O3),
            "CO" => Some(Pollutant::Co),
            _ => None,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcentrationUnit {
    #[serde(rename = "ug/m3", alias = "µg/m³", alias = "µg/m3")]
    MicrogramsPerCubicMetre,
    #[serde(rename = "mg/m3", alias = "mg/m³")]
    MilligramsPerCubicMetre,
    #[serde(rename = "ppm")]
    PartsPerMillion,
    #[serde(rename = "ppb")]
    PartsPerBillion,
}

impl ConcentrationUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            ConcentrationUnit::MicrogramsPerCubicMetre => "µg/m³",
            ConcentrationUnit::MilligramsPerCubicMetre => "mg/m³",
            ConcentrationUnit::PartsPerMillion => "ppm",
            ConcentrationUnit::PartsPerBillion => "ppb",
        }
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single pollutant measurement. The identifier is kept as received so
/// that unknown pollutants can still be carried (and ignored) downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub pollutant_id: String,
    pub concentration: f64,
    pub unit: ConcentrationUnit,
}

impl Reading {
    pub fn pollutant(&self) -> Option<Pollutant> {
        Pollutant::parse(&self.pollutant_id)
    }
}

/// Readings in insertion order, at most one per pollutant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadingSet {
    readings: Vec<Reading>,
}

impl ReadingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reading. Returns false, keeping the set unchanged, when the
    /// concentration is negative or non-finite, or when a reading for the
    /// same pollutant under any spelling ("PM2.5", "pm25") is already present.
    /// The first reading for a pollutant wins.
    pub fn insert(&mut self, pollutant_id: impl Into<String>, concentration: f64, unit: ConcentrationUnit) -> bool {
        let pollutant_id = pollutant_id.into();
        if !concentration.is_finite() || concentration < 0.0 {
            tracing::debug!("Dropping reading {}={} (not a valid concentration)", pollutant_id, concentration);
            return false;
        }

        let key = canonical_id(&pollutant_id);
        if let Some(existing) = self.readings.iter().find(|r| canonical_id(&r.pollutant_id) == key) {
            tracing::debug!(
                "Dropping reading {}={}: already have {}={}",
                pollutant_id,
                concentration,
                existing.pollutant_id,
                existing.concentration
            );
            return false;
        }

        self.readings.push(Reading {
            pollutant_id,
            concentration,
            unit,
        });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }
}

/// Grouping key for an identifier: the canonical code for known pollutants,
/// the upper-cased identifier otherwise.
pub fn canonical_id(pollutant_id: &str) -> String {
    match Pollutant::parse(pollutant_id) {
        Some(p) => p.code().to_string(),
        None => pollutant_id.trim().to_ascii_uppercase(),
    }
}
