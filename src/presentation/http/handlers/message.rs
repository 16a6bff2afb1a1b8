//! Message Handlers

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};

use crate::application::dto::{HistoryQuery, SendMessageRequest, StatusResponse};
use crate::domain::Message;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Get recent messages of a channel
pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.messages.history(query.channel.as_deref())?;
    Ok(Json(messages))
}

/// Store a message and broadcast it to its channel
pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected message body");
        AppError::invalid_json()
    })?;

    let message = state.messages.prepare(body)?;
    tracing::info!(
        message_id = %message.id,
        channel = %message.channel,
        user = %message.user,
        "Message submitted over REST"
    );
    state.hub.publish_confirmed(message).await?;

    Ok(Json(StatusResponse::sent()))
}
