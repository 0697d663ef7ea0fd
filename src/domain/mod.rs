// Domain layer - Classification rules and models, no I/O
pub mod advisory;
pub mod aqi;
pub mod exceedance;
pub mod guideline;
pub mod pollutant;
pub mod rules;
pub mod station;
