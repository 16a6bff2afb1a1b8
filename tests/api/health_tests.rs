//! Health Check and Metrics Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, body_text, TestApp};

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new().await;

    let response = app.get("/health/live").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_running_hub() {
    let app = TestApp::new().await;

    let response = app.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_metrics_exposition() {
    let app = TestApp::new().await;
    app.post_json(
        "/api/messages",
        r#"{"user":"alice","content":"count me","channel":"general"}"#,
    )
    .await;

    let response = app.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert!(text.contains("channel_relay_messages_stored_total"));
    assert!(text.contains("channel_relay_sessions_active"));
}

#[tokio::test]
async fn test_unknown_path_falls_back_to_static_files() {
    let app = TestApp::new().await;

    let response = app.get("/definitely-not-here.html").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
