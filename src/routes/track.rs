use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::tracker::location::{ReplayProvider, SubscriptionConfig};
use crate::tracker::session;
use crate::types::snapshot::{RideSummary, TrackSnapshot};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/track/start", post(start))
        .route("/api/track/:session_id", get(snapshot))
        .route("/api/track/:session_id/stop", post(stop))
}

#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct StartRequest {
    source_id: String,
    /// Delay between replayed points in milliseconds; 0 replays as fast
    /// as possible.
    #[serde(default)]
    pace_ms: u64,
}

#[derive(Serialize, Deserialize)]
struct StartResponse {
    session_id: String,
}

async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<Json<StartResponse>, AppError> {
    let track = state
        .source(&request.source_id)
        .ok_or_else(|| AppError::SourceNotFound(request.source_id.clone()))?;

    let provider = ReplayProvider::new(track, Duration::from_millis(request.pace_ms));
    let handle = session::spawn(&provider, SubscriptionConfig::default())?;

    let session_id = Uuid::new_v4().to_string();
    state.insert_session(session_id.clone(), handle);

    tracing::info!(
        "Started tracking session {} over source {}",
        session_id,
        request.source_id
    );

    Ok(Json(StartResponse { session_id }))
}

async fn snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<TrackSnapshot>, AppError> {
    let handle = state
        .session(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;

    Ok(Json(handle.snapshot()))
}

async fn stop(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<RideSummary>, AppError> {
    let handle = state
        .session(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;

    let summary = handle.stop().await;
    Ok(Json(summary))
}
