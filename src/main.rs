// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::auth_service::AuthService;
use crate::application::dashboard_service::DashboardService;
use crate::application::latest_reading_poller::LatestReadingPoller;
use crate::application::transmitter_service::TransmitterService;
use crate::infrastructure::config::{load_dashboard_config, load_firebase_config};
use crate::infrastructure::firebase_auth::FirebaseAuth;
use crate::infrastructure::firebase_repository::FirebaseRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, get_latest, health_check, list_transmitters, login, stream_latest,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let firebase_config = load_firebase_config()?;
    let settings = Arc::new(load_dashboard_config()?);

    // Create adapters (infrastructure layer)
    let client = reqwest::Client::new();
    let repository = Arc::new(FirebaseRepository::new(
        client.clone(),
        firebase_config.firebase.database_url,
        firebase_config.firebase.readings_root,
    ));
    let identity = Arc::new(FirebaseAuth::new(
        client,
        firebase_config.firebase.auth_url,
        firebase_config.firebase.api_key,
    ));

    // Create services (application layer)
    let auth_service = AuthService::new(identity);
    let transmitter_service = TransmitterService::new(&settings.transmitters);
    let dashboard_service = DashboardService::new(repository.clone(), settings.clone());
    let poller = LatestReadingPoller::new(repository, settings.scale.clone(), settings.poll_interval);

    // Create application state
    let state = Arc::new(AppState {
        auth_service,
        transmitter_service,
        dashboard_service,
        poller,
    });

    // Build router (presentation layer)
    // Compression is applied per response in json_response, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/login", post(login))
        .route("/transmitters", get(list_transmitters))
        .route("/transmitters/:id/dashboard", get(get_dashboard))
        .route("/transmitters/:id/latest", get(get_latest))
        .route("/transmitters/:id/latest/stream", get(stream_latest))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = settings.listen_addr;
    tracing::info!("Starting air-quality-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
