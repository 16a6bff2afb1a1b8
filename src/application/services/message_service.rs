//! Message Service
//!
//! History queries and validation of messages submitted over REST.

use std::sync::Arc;

use validator::Validate;

use crate::application::dto::request::SendMessageRequest;
use crate::domain::{Message, MessageRepository};

/// Author recorded for REST-submitted messages that name none.
pub const DEFAULT_API_USER: &str = "Web User";

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("channel is required")]
    ChannelRequired,
}

/// Message service over a shared history store
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageRepository>,
    history_limit: usize,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageRepository>, history_limit: usize) -> Self {
        Self {
            store,
            history_limit,
        }
    }

    /// Recent history of a channel, capped at the configured limit.
    pub fn history(&self, channel: Option<&str>) -> Result<Vec<Message>, MessageError> {
        let channel = channel
            .filter(|c| !c.is_empty())
            .ok_or(MessageError::ChannelRequired)?;

        let messages = self.store.recent_messages(channel, self.history_limit);
        tracing::debug!(
            channel = %channel,
            returned = messages.len(),
            stored = self.store.count(channel),
            "History requested"
        );
        Ok(messages)
    }

    /// Validate a REST submission and build the message to publish.
    ///
    /// The server assigns `id` and `timestamp`; `user` falls back to
    /// [`DEFAULT_API_USER`].
    pub fn prepare(&self, request: SendMessageRequest) -> Result<Message, MessageError> {
        request
            .validate()
            .map_err(|_| MessageError::ChannelRequired)?;

        let user = request
            .user
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_USER.to_string());

        Ok(Message::new(
            user,
            request.content.unwrap_or_default(),
            request.kind.unwrap_or_default(),
            request.channel.unwrap_or_default(),
        ))
    }
}
