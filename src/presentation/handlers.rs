// HTTP request handlers
use crate::domain::session::Session;
use crate::domain::transmitter::Transmitter;
use crate::infrastructure::chunked_json::stream_from_poll;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Exchange email and password for an id token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(user).into_response())
}

/// List the configured transmitters
pub async fn list_transmitters(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let transmitters = state.transmitter_service.list();
    respond(&transmitters, &headers).await
}

/// Full dashboard for one transmitter
pub async fn get_dashboard(
    Path(id): Path<u32>,
    session: Session,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let transmitter = resolve(&state, id)?;
    let dashboard = state
        .dashboard_service
        .get_dashboard(&session, &transmitter)
        .await?;
    Ok(respond(&dashboard, &headers).await)
}

/// Latest reading card, or `null` when the transmitter has no readings
pub async fn get_latest(
    Path(id): Path<u32>,
    session: Session,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let transmitter = resolve(&state, id)?;
    let card = state
        .dashboard_service
        .get_latest(&session, &transmitter)
        .await?;
    Ok(respond(&card, &headers).await)
}

/// Periodically refreshed latest reading, one JSON line per poll
pub async fn stream_latest(
    Path(id): Path<u32>,
    session: Session,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let transmitter = resolve(&state, id)?;
    tracing::debug!("Starting latest reading stream for {}", transmitter.name);
    let handle = state.poller.spawn(session, transmitter);
    Ok(stream_from_poll(handle))
}

fn resolve(state: &AppState, id: u32) -> Result<Transmitter, ApiError> {
    state
        .transmitter_service
        .find(id)
        .cloned()
        .ok_or(ApiError::UnknownTransmitter(id))
}

async fn respond<T: serde::Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
