// Application layer - Use cases and ports
pub mod auth_service;
pub mod dashboard_service;
pub mod formatters;
pub mod identity_provider;
pub mod latest_reading_poller;
pub mod reading_repository;
pub mod transmitter_service;
