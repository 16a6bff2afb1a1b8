//! WebSocket Message Types
//!
//! Frames exchanged over the real-time channel. Outbound frames are plain
//! serialized [`Message`](crate::domain::Message) values; inbound frames are
//! decoded leniently so clients may send the full message shape or just the
//! fields they own.

use serde::{Deserialize, Serialize};

use crate::domain::MessageKind;

/// Error text sent before closing a connection with bad credentials.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Incoming client frame
///
/// `id`, `user`, `timestamp` and `channel` are server-authoritative; any
/// client-supplied values for them are ignored during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientFrame {
    #[serde(default)]
    pub content: String,

    #[serde(rename = "type", default)]
    pub kind: MessageKind,
}

impl ClientFrame {
    /// Decode a text frame.
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Decode a binary frame carrying UTF-8 JSON.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Error payload sent to a client before the server closes the connection
#[derive(Debug, Clone, Serialize)]
pub struct ErrorFrame {
    pub error: String,
}

impl ErrorFrame {
    pub fn invalid_credentials() -> Self {
        Self {
            error: INVALID_CREDENTIALS.to_string(),
        }
    }
}
