// API error mapping
use crate::application::identity_provider::AuthError;
use crate::application::reading_repository::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,
    #[error("invalid email or password")]
    LoginRejected,
    #[error("{0}")]
    BadRequest(String),
    #[error("unknown transmitter {0}")]
    UnknownTransmitter(u32),
    /// Store or provider failure; details stay in the logs
    #[error("Failed to load data")]
    Upstream(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::LoginRejected => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownTransmitter(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(StoreError::PermissionDenied) = err.downcast_ref::<StoreError>() {
            return ApiError::Unauthorized;
        }
        match err.downcast_ref::<AuthError>() {
            Some(AuthError::MissingCredentials) => ApiError::BadRequest(err.to_string()),
            Some(AuthError::Rejected(_)) => ApiError::LoginRejected,
            None => ApiError::Upstream(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Upstream(e) = &self {
            tracing::error!("Upstream failure: {:#}", e);
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
