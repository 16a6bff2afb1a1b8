//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use serde::Deserialize;
use validator::Validate;

use crate::domain::MessageKind;

/// Login request
///
/// A missing or `null` field counts as an empty string.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Send message request
///
/// `id` and `timestamp` are accepted but ignored; the server assigns both.
/// Missing and `null` fields are treated alike.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub user: Option<String>,

    pub content: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<MessageKind>,

    #[validate(
        required(message = "channel is required"),
        length(min = 1, message = "channel is required")
    )]
    pub channel: Option<String>,
}

/// History query string
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub channel: Option<String>,
}

/// WebSocket connection query string
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}
