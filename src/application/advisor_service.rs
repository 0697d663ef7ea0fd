// Advisor service - Use case for building a city's air-quality report
use crate::application::air_quality_repository::{PollutantRecord, PollutantRepository, RepositoryError};
use crate::domain::aqi::{AqiValue, Classification};
use crate::domain::exceedance::{evaluate, ExceedanceReport};
use crate::domain::pollutant::{canonical_id, ConcentrationUnit, ReadingSet};
use crate::domain::rules::Rules;
use crate::domain::station::{CityReport, Coordinates, PollutantLevel};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("no usable air-quality data for {city}")]
    NoData { city: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct AdvisorService {
    repository: Arc<dyn PollutantRepository>,
    rules: Arc<Rules>,
}

impl AdvisorService {
    pub fn new(repository: Arc<dyn PollutantRepository>, rules: Arc<Rules>) -> Self {
        Self { repository, rules }
    }

    pub async fn city_report(&self, city: &str) -> Result<CityReport, AdvisorError> {
        let city = city.trim();
        let records: Vec<PollutantRecord> = self
            .repository
            .fetch_city_records(city)
            .await?
            .into_iter()
            .filter(|r| r.city.trim().eq_ignore_ascii_case(city))
            .filter(|r| r.avg_value.is_some())
            .collect();

        if records.is_empty() {
            return Err(AdvisorError::NoData { city: city.to_string() });
        }
        tracing::debug!("{} usable records for {}", records.len(), city);

        let (pollutants, mean) = Self::mean_by_pollutant(&records);
        let Some(mean) = mean else {
            return Err(AdvisorError::NoData { city: city.to_string() });
        };

        // Overall AQI is approximated as the mean of the station averages
        // that made it into a pollutant level.
        let classification = self.rules.scale.classify(AqiValue::from(mean));

        let mut readings = ReadingSet::new();
        for level in &pollutants {
            readings.insert(level.pollutant_id.clone(), level.concentration, level.unit);
        }
        let exceedance = evaluate(&readings, &self.rules.limits);

        // Nothing was compared, so "within limits" says nothing about the air.
        let advisories = if exceedance.is_vacuous() {
            self.rules.advisories.fallback()
        } else {
            match &exceedance.worst {
                Some(worst) => self.rules.advisories.for_pollutant(worst.pollutant.code()),
                None => self.rules.advisories.for_category(classification.category),
            }
        }
        .to_vec();

        let location = records.iter().find_map(|r| match (r.latitude, r.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        });

        Ok(CityReport {
            city: city.to_string(),
            classification,
            pollutants,
            exceedance,
            advisories,
            location,
            generated_at: Utc::now(),
        })
    }

    pub async fn list_cities(&self) -> Result<Vec<String>, AdvisorError> {
        let mut cities = self.repository.list_cities().await?;
        cities.sort_by_key(|c| c.to_lowercase());
        cities.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        Ok(cities)
    }

    pub fn classify(&self, aqi: AqiValue) -> Classification {
        self.rules.scale.classify(aqi)
    }

    pub fn evaluate(&self, readings: &ReadingSet) -> ExceedanceReport {
        evaluate(readings, &self.rules.limits)
    }

    pub fn advisories(&self, key: &str) -> Vec<String> {
        self.rules.advisories.lookup(key).to_vec()
    }

    /// Average each pollutant across stations, ordered by canonical
    /// identifier, so "PM2.5" and "pm25" land in one level. A record whose
    /// unit differs from the first one seen for its pollutant is dropped.
    /// Also returns the mean of every accepted value, or None if nothing was
    /// accepted.
    fn mean_by_pollutant(records: &[PollutantRecord]) -> (Vec<PollutantLevel>, Option<f64>) {
        let mut groups: BTreeMap<String, (ConcentrationUnit, f64, usize)> = BTreeMap::new();
        let (mut total, mut accepted) = (0.0, 0usize);

        for record in records {
            let Some(value) = record.avg_value else { continue };
            let entry = groups
                .entry(canonical_id(&record.pollutant_id))
                .or_insert((record.unit, 0.0, 0));
            if entry.0 != record.unit {
                tracing::warn!(
                    "Ignoring {} at {}: unit {} differs from {}",
                    record.pollutant_id,
                    record.station,
                    record.unit,
                    entry.0
                );
                continue;
            }
            entry.1 += value;
            entry.2 += 1;
            total += value;
            accepted += 1;
        }

        let levels = groups
            .into_iter()
            .map(|(id, (unit, sum, count))| PollutantLevel {
                pollutant_id: id,
                concentration: sum / count as f64,
                unit,
            })
            .collect();
        let mean = (accepted > 0).then(|| total / accepted as f64);
        (levels, mean)
    }
}
