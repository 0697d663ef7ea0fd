// Application state for HTTP handlers
use crate::application::advisor_service::AdvisorService;
use crate::application::station_service::StationService;

#[derive(Clone)]
pub struct AppState {
    pub advisor_service: AdvisorService,
    pub station_service: StationService,
}
