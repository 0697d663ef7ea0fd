// Repository traits for upstream air-quality data
use crate::domain::pollutant::ConcentrationUnit;
use crate::domain::station::Station;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One pollutant row from the open-data portal.
#[derive(Debug, Clone, PartialEq)]
pub struct PollutantRecord {
    pub city: String,
    pub station: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub pollutant_id: String,
    /// None when the portal reported a non-numeric value such as "NA"
    pub avg_value: Option<f64>,
    pub unit: ConcentrationUnit,
    pub last_update: Option<DateTime<Utc>>,
}

/// Rectangle given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lat1: f64,
    pub lng1: f64,
    pub lat2: f64,
    pub lng2: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("request to {service} failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} responded with status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("{service} returned an error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },
    #[error("could not decode {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait PollutantRepository: Send + Sync {
    /// Records for a city. Implementations may return rows for other cities;
    /// callers filter by name.
    async fn fetch_city_records(&self, city: &str) -> Result<Vec<PollutantRecord>, RepositoryError>;

    /// Distinct city names the portal currently reports on
    async fn list_cities(&self) -> Result<Vec<String>, RepositoryError>;
}

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn stations_in_bounds(&self, bounds: Bounds) -> Result<Vec<Station>, RepositoryError>;
}
