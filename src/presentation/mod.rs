// Presentation layer - HTTP routing, extraction and error mapping
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod session;
