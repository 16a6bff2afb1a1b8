//! Presence Handlers

use axum::{extract::State, Json};

use crate::application::dto::PresenceResponse;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Online users grouped by channel
pub async fn get_online_users(
    State(state): State<AppState>,
) -> Result<Json<PresenceResponse>, AppError> {
    let presence = state.hub.presence().await?;
    Ok(Json(PresenceResponse::from(presence)))
}
