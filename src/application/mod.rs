// Application layer - Use cases over the repository traits
pub mod advisor_service;
pub mod air_quality_repository;
pub mod station_service;
