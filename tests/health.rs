use axum::{body::to_bytes, http::Request, Router};
use ridetrack_rs::{routes, state::AppState};
use tower::ServiceExt;

fn app() -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::sources::router())
        .merge(routes::track::router())
        .with_state(AppState::new())
}

#[tokio::test]
async fn health_returns_ok() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let text = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(text.contains("\"status\":\"ok\""));
}
