// Station and city report models
use super::aqi::{AqiValue, Classification};
use super::exceedance::ExceedanceReport;
use super::pollutant::ConcentrationUnit;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub aqi: AqiValue,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A station ready to be drawn as a map marker.
#[derive(Debug, Clone, Serialize)]
pub struct StationView {
    #[serde(flatten)]
    pub station: Station,
    pub classification: Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantLevel {
    pub pollutant_id: String,
    pub concentration: f64,
    pub unit: ConcentrationUnit,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityReport {
    pub city: String,
    pub classification: Classification,
    pub pollutants: Vec<PollutantLevel>,
    pub exceedance: ExceedanceReport,
    pub advisories: Vec<String>,
    pub location: Option<Coordinates>,
    pub generated_at: DateTime<Utc>,
}
