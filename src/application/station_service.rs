// Station service - Use case for classified map markers
use crate::application::air_quality_repository::{Bounds, RepositoryError, StationRepository};
use crate::domain::rules::Rules;
use crate::domain::station::StationView;
use std::sync::Arc;

#[derive(Clone)]
pub struct StationService {
    repository: Arc<dyn StationRepository>,
    rules: Arc<Rules>,
}

impl StationService {
    pub fn new(repository: Arc<dyn StationRepository>, rules: Arc<Rules>) -> Self {
        Self { repository, rules }
    }

    pub async fn stations(&self, bounds: Bounds) -> Result<Vec<StationView>, RepositoryError> {
        let stations = self.repository.stations_in_bounds(bounds).await?;
        Ok(stations
            .into_iter()
            .map(|station| StationView {
                classification: self.rules.scale.classify(station.aqi),
                station,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aqi::{AqiCategory, AqiValue};
    use crate::domain::station::Station;
    use async_trait::async_trait;

    struct FakeStations(Vec<Station>);

    #[async_trait]
    impl StationRepository for FakeStations {
        async fn stations_in_bounds(&self, _bounds: Bounds) -> Result<Vec<Station>, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    fn station(name: &str, aqi: AqiValue) -> Station {
        Station {
            name: name.to_string(),
            latitude: 19.0,
            longitude: 72.8,
            aqi,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_stations_are_classified() {
        let svc = StationService::new(
            Arc::new(FakeStations(vec![
                station("Bandra", AqiValue::Index(151)),
                station("Colaba", AqiValue::Unavailable),
            ])),
            Arc::new(Rules::default()),
        );
        let bounds = Bounds {
            lat1: 18.0,
            lng1: 72.0,
            lat2: 20.0,
            lng2: 73.0,
        };

        let views = svc.stations(bounds).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].classification.category, AqiCategory::Unhealthy);
        assert_eq!(views[0].classification.color, "red");
        assert_eq!(views[1].classification.category, AqiCategory::NoData);
    }
}
