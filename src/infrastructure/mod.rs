// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod data_gov_repository;
pub mod waqi_repository;
