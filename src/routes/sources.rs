use axum::extract::Multipart;
use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::tracker::parse;
use crate::types::source::SourceFormat;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sources", post(upload))
}

#[derive(Serialize, Deserialize)]
struct SourceResponse {
    source_id: String,
    format: String,
    point_count: usize,
    start_time: Option<DateTime<Utc>>,
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SourceResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            filename = field.file_name().map(|s| s.to_string());
            file_bytes = Some(field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read file bytes: {}", e))
            })?.to_vec());
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename = filename.ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;

    let format = SourceFormat::from_filename(&filename)
        .ok_or_else(|| AppError::BadRequest("Unsupported file format".to_string()))?;

    tracing::info!("Parsing {} replay source: {}", format.name(), filename);

    let track = parse::parse(&bytes, format)?;
    let point_count = track.points.len();
    let start_time = track.points.first().and_then(|point| point.time);

    let source_id = Uuid::new_v4().to_string();
    state.insert_source(source_id.clone(), Arc::new(track));

    tracing::info!(
        "Registered replay source {} from {} ({} points)",
        source_id,
        filename,
        point_count
    );

    Ok(Json(SourceResponse {
        source_id,
        format: format.name().to_string(),
        point_count,
        start_time,
    }))
}
