//! CORS Middleware Configuration
//!
//! Browser clients are often served from another origin during development,
//! so the default is to allow any origin. Preflight `OPTIONS` requests are
//! answered by the layer itself.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsSettings;

/// Create CORS layer from settings
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match allowed_origins(settings) {
        Some(origins) => layer
            .allow_origin(AllowOrigin::list(origins))
            .max_age(std::time::Duration::from_secs(3600)),
        None => layer.allow_origin(Any),
    }
}

/// Parsed origin list, or `None` when any origin is allowed.
fn allowed_origins(settings: &CorsSettings) -> Option<Vec<HeaderValue>> {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| o.parse().ok())
        .collect();

    (!origins.is_empty()).then_some(origins)
}
