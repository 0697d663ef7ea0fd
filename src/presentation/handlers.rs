// HTTP request handlers
use crate::application::air_quality_repository::Bounds;
use crate::domain::aqi::{AqiValue, Classification};
use crate::domain::exceedance::ExceedanceReport;
use crate::domain::pollutant::{ConcentrationUnit, Pollutant, ReadingSet};
use crate::domain::station::{CityReport, StationView};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ClassifyQuery {
    pub aqi: Option<String>,
}

#[derive(Deserialize)]
pub struct BoundsQuery {
    pub lat1: f64,
    pub lng1: f64,
    pub lat2: f64,
    pub lng2: f64,
}

#[derive(Deserialize)]
pub struct EvaluateRequest {
    pub readings: BTreeMap<String, f64>,
    /// Required whenever a CO reading is present
    #[serde(default)]
    pub co_unit: Option<ConcentrationUnit>,
}

#[derive(Serialize)]
pub struct AdvisoryResponse {
    pub key: String,
    pub advisories: Vec<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_cities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.advisor_service.list_cities().await?))
}

/// Full advisor report for a city
pub async fn city_report(
    Path(city): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CityReport>, ApiError> {
    let report = state.advisor_service.city_report(&city).await?;
    tracing::info!(
        "Report for {}: AQI {:?} ({})",
        report.city,
        report.classification.aqi.index(),
        report.classification.label
    );
    Ok(Json(report))
}

/// Classified stations inside a map viewport
pub async fn stations(
    Query(query): Query<BoundsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StationView>>, ApiError> {
    let bounds = Bounds {
        lat1: query.lat1,
        lng1: query.lng1,
        lat2: query.lat2,
        lng2: query.lng2,
    };
    Ok(Json(state.station_service.stations(bounds).await?))
}

/// Any `aqi` value is accepted; unusable input classifies as No Data.
pub async fn classify(
    Query(query): Query<ClassifyQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<Classification> {
    let aqi = query
        .aqi
        .as_deref()
        .map(AqiValue::from_str_lossy)
        .unwrap_or(AqiValue::Unavailable);
    Json(state.advisor_service.classify(aqi))
}

pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<ExceedanceReport>, ApiError> {
    let mut readings = ReadingSet::new();

    for (id, value) in request.readings {
        let unit = if Pollutant::parse(&id) == Some(Pollutant::Co) {
            request.co_unit.ok_or_else(|| {
                ApiError::BadRequest("co_unit is required when a CO reading is supplied".to_string())
            })?
        } else {
            ConcentrationUnit::MicrogramsPerCubicMetre
        };
        readings.insert(id, value, unit);
    }

    Ok(Json(state.advisor_service.evaluate(&readings)))
}

pub async fn advisories(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<AdvisoryResponse> {
    let advisories = state.advisor_service.advisories(&key);
    Json(AdvisoryResponse { key, advisories })
}
