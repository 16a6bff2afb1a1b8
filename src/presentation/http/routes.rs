//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.settings.server.static_dir);

    Router::new()
        .nest("/api", api_routes())
        // Real-time channel
        .route("/ws", get(ws_handler))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Anything else is a static asset
        .fallback_service(static_dir)
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// REST routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/messages",
            get(handlers::message::get_messages).post(handlers::message::send_message),
        )
        .route("/users", get(handlers::user::get_online_users))
        .route("/accounts", get(handlers::auth::get_accounts))
        .route("/login", post(handlers::auth::login))
}
