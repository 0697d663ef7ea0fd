// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::{get, post}, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::advisor_service::AdvisorService;
use crate::application::station_service::StationService;
use crate::infrastructure::config::load_advisor_config;
use crate::infrastructure::data_gov_repository::DataGovRepository;
use crate::infrastructure::waqi_repository::WaqiRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    advisories, city_report, classify, evaluate, health_check, list_cities, stations,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration and build the classification tables once
    let config = load_advisor_config().context("failed to load configuration")?;
    let rules = Arc::new(config.rules()?);

    if config.data_gov.api_key.is_empty() {
        tracing::warn!("No data.gov.in API key configured; city reports will fail");
    }
    if config.waqi.token.is_empty() {
        tracing::warn!("No WAQI token configured; station lookups will fail");
    }

    // Create repositories (infrastructure layer)
    let pollutant_repository = Arc::new(DataGovRepository::new(&config.data_gov)?);
    let station_repository = Arc::new(WaqiRepository::new(&config.waqi)?);

    // Create services (application layer)
    let advisor_service = AdvisorService::new(pollutant_repository, rules.clone());
    let station_service = StationService::new(station_repository, rules);

    let state = Arc::new(AppState {
        advisor_service,
        station_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/cities", get(list_cities))
        .route("/cities/:city/report", get(city_report))
        .route("/stations", get(stations))
        .route("/classify", get(classify))
        .route("/evaluate", post(evaluate))
        .route("/advisories/:key", get(advisories))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .server
        .addr
        .parse()
        .with_context(|| format!("invalid server.addr {}", config.server.addr))?;
    tracing::info!("Starting air-quality-advisor on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
