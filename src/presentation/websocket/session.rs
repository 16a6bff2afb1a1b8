//! WebSocket Session Management

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use super::messages::ClientFrame;
use crate::domain::Message;

/// Per-connection state owned by the read task.
///
/// Identity is fixed when the connection authenticates and never changes.
#[derive(Debug)]
pub struct SessionState {
    pub session_id: Uuid,
    pub username: String,
    pub channel: String,
    pub last_pong: Instant,
}

impl SessionState {
    pub fn new(session_id: Uuid, username: String, channel: String) -> Self {
        Self {
            session_id,
            username,
            channel,
            last_pong: Instant::now(),
        }
    }

    /// Record a liveness response from the peer.
    pub fn pong(&mut self) {
        self.last_pong = Instant::now();
    }

    /// Point in time after which a silent connection is considered dead.
    pub fn read_deadline(&self, pong_wait: Duration) -> Instant {
        self.last_pong + pong_wait
    }

    /// Turn a decoded client frame into a message owned by this session.
    ///
    /// Identity, author, channel and timestamp always come from the server.
    pub fn stamp(&self, frame: ClientFrame) -> Message {
        Message::new(
            self.username.clone(),
            frame.content,
            frame.kind,
            self.channel.clone(),
        )
    }
}
