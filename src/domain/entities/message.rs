//! Message entity and store trait.
//!
//! A message is an immutable value: once constructed it is only ever
//! appended to a store and copied onto outbound queues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::message_id;

/// Author name used for every server-synthesized notice.
pub const SYSTEM_USER: &str = "System";

/// Kind of content a message carries.
///
/// Serialized as the lowercase wire names `text`, `system`, `image`, `file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A regular user message
    #[default]
    Text,
    /// A server-generated notice (join, leave, welcome)
    System,
    /// An image reference
    Image,
    /// A file reference
    File,
}

impl MessageKind {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::System => "system",
            Self::Image => "image",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chat message scoped to exactly one channel.
///
/// Wire form:
/// ```json
/// {"id": "...", "user": "alice", "content": "hi",
///  "timestamp": "2024-01-01T00:00:00Z", "type": "text", "channel": "general"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Globally unique identifier, always server-assigned
    pub id: String,

    /// Author username
    pub user: String,

    /// Message body
    pub content: String,

    /// Server clock at creation
    pub timestamp: DateTime<Utc>,

    /// Content kind
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// Channel the message belongs to
    pub channel: String,
}

impl Message {
    /// Build a message with a fresh id and the current server time.
    pub fn new(
        user: impl Into<String>,
        content: impl Into<String>,
        kind: MessageKind,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            id: message_id::next_id(),
            user: user.into(),
            content: content.into(),
            timestamp: Utc::now(),
            kind,
            channel: channel.into(),
        }
    }

    /// A plain text message from a user.
    pub fn text(user: impl Into<String>, content: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::new(user, content, MessageKind::Text, channel)
    }

    /// A server notice authored by [`SYSTEM_USER`].
    pub fn system(content: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::new(SYSTEM_USER, content, MessageKind::System, channel)
    }

    /// Notice synthesized when a session is admitted to a channel.
    pub fn join_notice(username: &str, channel: &str) -> Self {
        Self::system(format!("{} joined {}", username, channel), channel)
    }

    /// Notice synthesized when a session leaves a channel.
    pub fn leave_notice(username: &str, channel: &str) -> Self {
        Self::system(format!("{} left {}", username, channel), channel)
    }

    /// Placeholder returned for a channel with no history yet.
    pub fn welcome_notice(channel: &str) -> Self {
        Self::system(
            format!("Welcome to {} channel! Start your first message 👋", channel),
            channel,
        )
    }

    /// Check if this is a server-generated notice.
    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }

    /// Check if this message was authored by `username`.
    pub fn is_from_user(&self, username: &str) -> bool {
        self.user == username
    }

    /// Check if this message belongs to `channel`.
    pub fn belongs_to_channel(&self, channel: &str) -> bool {
        self.channel == channel
    }
}

/// Channel-partitioned message history.
///
/// Implementations must be safe to call from any task concurrently and must
/// keep every channel's sequence in arrival order.
pub trait MessageRepository: Send + Sync {
    /// Append a message to the tail of its channel's history.
    fn append(&self, message: Message);

    /// The last `min(limit, count)` messages of a channel, oldest first.
    ///
    /// A channel without history yields a single welcome notice instead.
    fn recent_messages(&self, channel: &str, limit: usize) -> Vec<Message>;

    /// Number of stored messages for a channel (0 if never seen).
    fn count(&self, channel: &str) -> usize;

    /// Drop a channel's history.
    fn clear_channel(&self, channel: &str);

    /// Drop every channel's history.
    fn clear_all(&self);
}
