use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Position stream lost")]
    TrackingLost,
    #[error("Invalid sample: latitude {latitude}, longitude {longitude}")]
    InvalidSample { latitude: f64, longitude: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Invalid FIT: {0}")]
    InvalidFit(String),
    #[error("No track points found in file")]
    EmptyFile,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error("Source not found: {0}")]
    SourceNotFound(String),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Parse(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Track(TrackError::InvalidSample { .. }) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Track(TrackError::PermissionDenied) => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            AppError::SourceNotFound(_) | AppError::SessionNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Track(TrackError::TrackingLost) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
