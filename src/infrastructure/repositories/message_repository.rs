//! Message Repository Implementation
//!
//! In-memory, channel-partitioned message history.

use dashmap::DashMap;

use crate::domain::{Message, MessageRepository};
use crate::infrastructure::metrics;

/// In-memory message repository.
///
/// Each channel's history lives in its own `Vec`, guarded by the DashMap
/// shard lock. Appends to one channel are serialized against each other and
/// against reads of that channel; different channels rarely contend.
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    channels: DashMap<String, Vec<Message>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }
}

impl MessageRepository for InMemoryMessageRepository {
    fn append(&self, message: Message) {
        metrics::record_message_stored(message.kind.as_str());
        self.channels
            .entry(message.channel.clone())
            .or_default()
            .push(message);
    }

    fn recent_messages(&self, channel: &str, limit: usize) -> Vec<Message> {
        match self.channels.get(channel) {
            Some(history) if !history.is_empty() => {
                let start = history.len().saturating_sub(limit);
                history[start..].to_vec()
            }
            _ => vec![Message::welcome_notice(channel)],
        }
    }

    fn count(&self, channel: &str) -> usize {
        self.channels.get(channel).map(|h| h.len()).unwrap_or(0)
    }

    fn clear_channel(&self, channel: &str) {
        self.channels.remove(channel);
    }

    fn clear_all(&self) {
        self.channels.clear();
    }
}
