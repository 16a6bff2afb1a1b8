//! Account API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_accounts_are_listed_without_passwords() {
    let app = TestApp::new().await;

    let response = app.get("/api/accounts").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "accounts": [
                { "username": "alice", "channel": "general" },
                { "username": "bob", "channel": "tech" },
                { "username": "charlie", "channel": "random" }
            ]
        })
    );
}

#[test_case("alice", "general" ; "alice")]
#[test_case("bob", "tech" ; "bob")]
#[test_case("charlie", "random" ; "charlie")]
#[tokio::test]
async fn test_login_reports_assigned_channel(username: &str, channel: &str) {
    let app = TestApp::new().await;
    let body = json!({ "username": username, "password": "password123" });

    let response = app.post_json("/api/login", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "account": { "username": username, "channel": channel } })
    );
}

#[test_case("alice", "wrong" ; "wrong password")]
#[test_case("mallory", "password123" ; "unknown user")]
#[test_case("", "" ; "empty credentials")]
#[tokio::test]
async fn test_login_rejects_bad_credentials(username: &str, password: &str) {
    let app = TestApp::new().await;
    let body = json!({ "username": username, "password": password });

    let response = app.post_json("/api/login", &body.to_string()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Invalid username or password" })
    );
}

#[tokio::test]
async fn test_login_invalid_json() {
    let app = TestApp::new().await;

    let response = app.post_json("/api/login", "username=alice").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid JSON" }));
}

#[tokio::test]
async fn test_login_null_credentials_are_rejected_as_invalid() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/login", r#"{"username":null,"password":null}"#)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
