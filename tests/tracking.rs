use axum::{body::to_bytes, http::Request, Router};
use ridetrack_rs::{routes, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::sources::router())
        .merge(routes::track::router())
        .with_state(AppState::new())
}

// Three points along the equator, ~111 m apart, so every point clears
// the 10 m minimum-movement filter.
fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><name>Equator Ride</name><trkseg>
    <trkpt lat="0.0" lon="0.0"><time>2026-01-01T12:00:00Z</time></trkpt>
    <trkpt lat="0.0" lon="0.001"><time>2026-01-01T12:00:10Z</time></trkpt>
    <trkpt lat="0.0" lon="0.002"><time>2026-01-01T12:00:20Z</time></trkpt>
  </trkseg></trk>
</gpx>"#
}

fn multipart_body(file_name: &str, file_body: &str, boundary: &str) -> String {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{file_body}\r\n--{boundary}--\r\n"
    )
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn upload_source(app: &Router) -> String {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_body("ride.gpx", sample_gpx(), boundary);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/sources")
                .method("POST")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(axum::body::Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    json_body(response).await["source_id"]
        .as_str()
        .expect("source_id")
        .to_string()
}

#[tokio::test]
async fn full_session_flow_over_replay_source() {
    let app = app();
    let source_id = upload_source(&app).await;

    // Start a session replaying the uploaded source
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/track/start")
                .method("POST")
                .header("content-type", "application/json")
                .body(axum::body::Body::from(
                    json!({ "source_id": source_id }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let session_id = json_body(response).await["session_id"]
        .as_str()
        .expect("session_id")
        .to_string();

    // Let the replay drain; the stream then ends and the session freezes
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/track/{session_id}"))
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let snapshot = json_body(response).await;
    assert_eq!(snapshot["path"].as_array().expect("path").len(), 3);
    let distance = snapshot["distance_km"].as_f64().expect("distance");
    assert!((distance - 0.22).abs() <= 0.01);
    assert_eq!(snapshot["active"], Value::Bool(false));
    assert_eq!(snapshot["tracking_lost"], Value::Bool(true));

    // Stop is a no-op on the already-frozen session
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/track/{session_id}/stop"))
                .method("POST")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let summary = json_body(response).await;
    assert_eq!(summary["distance_km"].as_f64().expect("distance"), distance);
}

#[tokio::test]
async fn start_with_unknown_source_returns_not_found() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/track/start")
                .method("POST")
                .header("content-type", "application/json")
                .body(axum::body::Body::from(
                    json!({ "source_id": "no-such-source" }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn snapshot_of_unknown_session_returns_not_found() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/track/no-such-session")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stop_of_unknown_session_returns_not_found() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/track/no-such-session/stop")
                .method("POST")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
