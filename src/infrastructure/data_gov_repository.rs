// data.gov.in open-data portal repository implementation
use crate::application::air_quality_repository::{PollutantRecord, PollutantRepository, RepositoryError};
use crate::domain::pollutant::{ConcentrationUnit, Pollutant};
use crate::infrastructure::config::DataGovSettings;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "data.gov.in";

/// Portal timestamps are local Indian time without an offset.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

#[derive(Debug, Clone)]
pub struct DataGovRepository {
    client: reqwest::Client,
    base_url: String,
    resource_id: String,
    api_key: String,
    limit: u32,
    co_unit: ConcentrationUnit,
}

#[derive(Debug, Deserialize)]
struct PortalResponse {
    #[serde(default)]
    records: Option<Vec<PortalRecord>>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PortalRecord {
    #[serde(default)]
    city: String,
    #[serde(default)]
    station: String,
    #[serde(default)]
    latitude: serde_json::Value,
    #[serde(default)]
    longitude: serde_json::Value,
    #[serde(default)]
    pollutant_id: String,
    #[serde(default, alias = "pollutant_avg")]
    avg_value: serde_json::Value,
    #[serde(default)]
    last_update: Option<String>,
}

impl DataGovRepository {
    pub fn new(settings: &DataGovSettings) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|source| RepositoryError::Request { service: SERVICE, source })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            resource_id: settings.resource_id.clone(),
            api_key: settings.api_key.clone(),
            limit: settings.limit,
            co_unit: settings.co_unit,
        })
    }

    fn build_query_url(&self, city: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}?api-key={}&format=json&limit={}",
            self.base_url,
            self.resource_id,
            urlencoding::encode(&self.api_key),
            self.limit
        );
        if let Some(city) = city {
            url.push_str("&filters%5Bcity%5D=");
            url.push_str(&urlencoding::encode(city));
        }
        url
    }

    async fn execute_query(&self, city: Option<&str>) -> Result<Vec<PortalRecord>, RepositoryError> {
        let url = self.build_query_url(city);

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

        let body = response
            .text()
            .await
            .map_err(|source| RepositoryError::Request { service: SERVICE, source })?;

        decode_body(&body)
    }

    fn to_record(&self, raw: PortalRecord) -> PollutantRecord {
        let unit = match Pollutant::parse(&raw.pollutant_id) {
            Some(Pollutant::Co) => self.co_unit,
            _ => ConcentrationUnit::MicrogramsPerCubicMetre,
        };

        PollutantRecord {
            city: raw.city,
            station: raw.station,
            latitude: coerce_number(&raw.latitude),
            longitude: coerce_number(&raw.longitude),
            pollutant_id: raw.pollutant_id,
            avg_value: coerce_number(&raw.avg_value),
            unit,
            last_update: raw.last_update.as_deref().and_then(parse_last_update),
        }
    }
}

/// Malformed JSON is a decode failure; a well-formed body without
/// `records` carries the portal's own error message.
fn decode_body(body: &str) -> Result<Vec<PortalRecord>, RepositoryError> {
    let data: PortalResponse =
        serde_json::from_str(body).map_err(|source| RepositoryError::Decode { service: SERVICE, source })?;

    data.records.ok_or_else(|| RepositoryError::Api {
        service: SERVICE,
        message: data.message.unwrap_or_else(|| "response has no records".to_string()),
    })
}

/// The portal sends numbers as strings and uses "NA" for gaps.
fn coerce_number(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn parse_last_update(s: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%d-%m-%Y %H:%M:%S").ok()?;
    let ist = FixedOffset::east_opt(IST_OFFSET_SECS)?;
    naive
        .and_local_timezone(ist)
        .single()
        .map(|t| t.with_timezone(&Utc))
}

#[async_trait]
impl PollutantRepository for DataGovRepository {
    async fn fetch_city_records(&self, city: &str) -> Result<Vec<PollutantRecord>, RepositoryError> {
        let raw = self.execute_query(Some(city)).await?;
        tracing::debug!("{} returned {} records for {}", SERVICE, raw.len(), city);
        Ok(raw.into_iter().map(|r| self.to_record(r)).collect())
    }

    async fn list_cities(&self) -> Result<Vec<String>, RepositoryError> {
        let raw = self.execute_query(None).await?;
        let mut cities: Vec<String> = raw
            .into_iter()
            .map(|r| r.city)
            .filter(|c| !c.trim().is_empty())
            .collect();
        cities.sort();
        cities.dedup();
        Ok(cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn repository(co_unit: ConcentrationUnit) -> DataGovRepository {
        DataGovRepository::new(&DataGovSettings {
            api_key: "k&y".to_string(),
            co_unit,
            ..DataGovSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_build_query_url() {
        let repo = repository(ConcentrationUnit::MilligramsPerCubicMetre);
        assert_eq!(
            repo.build_query_url(Some("New Delhi")),
            "https://api.data.gov.in/resource/3b01bcb8-0b14-4abf-b6f2-c1bfd384ba69\
             ?api-key=k%26y&format=json&limit=100&filters%5Bcity%5D=New%20Delhi"
        );
        assert!(!repo.build_query_url(None).contains("filters"));
    }

    #[test]
    fn test_decode_portal_records() {
        let body = serde_json::json!({
            "records": [
                {
                    "city": "Delhi", "station": "ITO", "latitude": "28.62", "longitude": "77.24",
                    "pollutant_id": "PM2.5", "avg_value": "65", "last_update": "19-10-2026 10:00:00"
                },
                {
                    "city": "Delhi", "station": "ITO", "latitude": "28.62", "longitude": "77.24",
                    "pollutant_id": "CO", "pollutant_avg": 31, "last_update": "garbage"
                },
                {
                    "city": "Delhi", "station": "ITO", "latitude": "NA", "longitude": "NA",
                    "pollutant_id": "NO2", "avg_value": "NA"
                }
            ]
        });
        let response: PortalResponse = serde_json::from_value(body).unwrap();
        let repo = repository(ConcentrationUnit::MilligramsPerCubicMetre);
        let records: Vec<PollutantRecord> = response
            .records
            .unwrap()
            .into_iter()
            .map(|r| repo.to_record(r))
            .collect();

        assert_eq!(records[0].avg_value, Some(65.0));
        assert_eq!(records[0].latitude, Some(28.62));
        assert_eq!(records[0].unit, ConcentrationUnit::MicrogramsPerCubicMetre);
        let updated = records[0].last_update.unwrap();
        assert_eq!((updated.day(), updated.hour(), updated.minute()), (19, 4, 30));

        assert_eq!(records[1].avg_value, Some(31.0));
        assert_eq!(records[1].unit, ConcentrationUnit::MilligramsPerCubicMetre);
        assert_eq!(records[1].last_update, None);

        assert_eq!(records[2].avg_value, None);
        assert_eq!(records[2].latitude, None);
    }

    #[test]
    fn test_missing_records_is_an_api_error() {
        let err = decode_body(r#"{ "message": "Invalid API key" }"#).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Api { ref message, .. } if message == "Invalid API key"
        ));

        assert!(matches!(decode_body("{}"), Err(RepositoryError::Api { .. })));
    }

    #[test]
    fn test_malformed_body_is_a_decode_error() {
        for body in ["<html>Service Unavailable</html>", "", r#"{"records": 5}"#] {
            assert!(
                matches!(decode_body(body), Err(RepositoryError::Decode { service: SERVICE, .. })),
                "body {:?}",
                body
            );
        }
    }

    #[test]
    fn test_decode_body_returns_records() {
        let records = decode_body(r#"{ "records": [ { "city": "Pune", "pollutant_id": "PM10" } ] }"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].city, "Pune");
    }
}
