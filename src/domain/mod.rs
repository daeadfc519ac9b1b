// Domain layer - Readings, classification tables and view models
pub mod air_quality;
pub mod dashboard;
pub mod pollutant;
pub mod reading;
pub mod session;
pub mod transmitter;
