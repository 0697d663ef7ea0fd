// World Air Quality Index aggregator repository implementation
use crate::application::air_quality_repository::{Bounds, RepositoryError, StationRepository};
use crate::domain::aqi::AqiValue;
use crate::domain::station::Station;
use crate::infrastructure::config::WaqiSettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "waqi";

#[derive(Debug, Clone)]
pub struct WaqiRepository {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct WaqiResponse {
    status: String,
    /// A list of stations on success, an error string otherwise
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WaqiStation {
    lat: f64,
    lon: f64,
    #[serde(default)]
    aqi: serde_json::Value,
    station: WaqiStationInfo,
}

#[derive(Debug, Deserialize)]
struct WaqiStationInfo {
    name: String,
    #[serde(default)]
    time: Option<String>,
}

impl WaqiRepository {
    pub fn new(settings: &WaqiSettings) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|source| RepositoryError::Request { service: SERVICE, source })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn build_bounds_url(&self, bounds: Bounds) -> String {
        format!(
            "{}/map/bounds/?latlng={},{},{},{}&token={}",
            self.base_url,
            bounds.lat1,
            bounds.lng1,
            bounds.lat2,
            bounds.lng2,
            urlencoding::encode(&self.token)
        )
    }

    fn decode(response: WaqiResponse) -> Result<Vec<Station>, RepositoryError> {
        if response.status != "ok" {
            let message = match &response.data {
                serde_json::Value::String(s) => s.clone(),
                other => format!("status {} ({})", response.status, other),
            };
            return Err(RepositoryError::Api {
                service: SERVICE,
                message,
            });
        }

        let stations: Vec<WaqiStation> = serde_json::from_value(response.data)
            .map_err(|source| RepositoryError::Decode { service: SERVICE, source })?;

        Ok(stations
            .into_iter()
            .map(|s| Station {
                name: s.station.name,
                latitude: s.lat,
                longitude: s.lon,
                aqi: AqiValue::from_json(&s.aqi),
                updated_at: s
                    .station
                    .time
                    .as_deref()
                    .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                    .map(|t| t.with_timezone(&Utc)),
            })
            .collect())
    }
}

#[async_trait]
impl StationRepository for WaqiRepository {
    async fn stations_in_bounds(&self, bounds: Bounds) -> Result<Vec<Station>, RepositoryError> {
        let url = self.build_bounds_url(bounds);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| RepositoryError::Request { service: SERVICE, source })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        let data = response
            .json::<WaqiResponse>()
            .await
            .map_err(|source| RepositoryError::Request { service: SERVICE, source })?;

        let stations = Self::decode(data)?;
        tracing::debug!("{} returned {} stations", SERVICE, stations.len());
        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: serde_json::Value) -> Result<Vec<Station>, RepositoryError> {
        WaqiRepository::decode(serde_json::from_value(body).unwrap())
    }

    #[test]
    fn test_decode_stations() {
        let stations = decode(serde_json::json!({
            "status": "ok",
            "data": [
                { "lat": 28.63, "lon": 77.22, "uid": 1, "aqi": "157",
                  "station": { "name": "Mandir Marg, Delhi", "time": "2026-10-19T10:00:00+05:30" } },
                { "lat": 28.5, "lon": 77.1, "uid": 2, "aqi": "-",
                  "station": { "name": "Dwarka, Delhi" } }
            ]
        }))
        .unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].aqi, AqiValue::Index(157));
        assert_eq!(
            stations[0].updated_at.unwrap().to_rfc3339(),
            "2026-10-19T04:30:00+00:00"
        );
        assert_eq!(stations[1].aqi, AqiValue::Unavailable);
        assert_eq!(stations[1].updated_at, None);
    }

    #[test]
    fn test_error_status() {
        let err = decode(serde_json::json!({ "status": "error", "data": "Invalid key" })).unwrap_err();
        assert!(matches!(err, RepositoryError::Api { ref message, .. } if message == "Invalid key"));
    }

    #[test]
    fn test_build_bounds_url() {
        let repo = WaqiRepository::new(&WaqiSettings {
            token: "abc".to_string(),
            ..WaqiSettings::default()
        })
        .unwrap();
        let url = repo.build_bounds_url(Bounds {
            lat1: 28.4,
            lng1: 76.8,
            lat2: 28.9,
            lng2: 77.4,
        });
        assert_eq!(url, "https://api.waqi.info/map/bounds/?latlng=28.4,76.8,28.9,77.4&token=abc");
    }
}
