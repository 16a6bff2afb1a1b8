//! Connection Hub
//!
//! The hub is the only owner of the live-session registry. Every
//! registration, unregistration and broadcast is a [`HubCommand`] sent over
//! one ordered intake and handled by [`Hub::run`] strictly one at a time, so
//! the registry needs no lock.
//!
//! Backpressure policy: each session has a bounded outbound queue and the
//! hub never waits on it. A session whose queue is full when a broadcast
//! reaches it is evicted on the spot (queue closed, registry entry removed).
//! A session whose queue receiver is gone leaves normally, with a leave
//! notice. Delivery is best-effort and at-most-once.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::domain::{Message, MessageRepository};
use crate::infrastructure::metrics;

/// Hub errors
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("hub is not running")]
    Stopped,
}

/// A registered session as seen by the hub.
///
/// Holds the only sender of the session's outbound queue; dropping the
/// entry closes the queue and lets the write task finish.
#[derive(Debug)]
pub struct ConnectedSession {
    pub session_id: Uuid,
    pub username: String,
    pub channel: String,
    sender: mpsc::Sender<Message>,
}

impl ConnectedSession {
    /// Create a session and the receiving end of its outbound queue.
    pub fn new(
        username: impl Into<String>,
        channel: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Message>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let session = Self {
            session_id: Uuid::new_v4(),
            username: username.into(),
            channel: channel.into(),
            sender,
        };
        (session, receiver)
    }
}

/// Commands accepted by the hub loop
#[derive(Debug)]
pub enum HubCommand {
    /// Admit a session and announce it to its channel
    Register(ConnectedSession),
    /// Remove a session (no-op if already gone) and announce its departure
    Unregister(Uuid),
    /// Fan a message out to its channel without storing it
    Broadcast(Message),
    /// Append a message to history, then fan it out. `ack` fires once the
    /// message is stored.
    Publish {
        message: Message,
        ack: Option<oneshot::Sender<()>>,
    },
    /// Snapshot who is online
    Presence(oneshot::Sender<Presence>),
}

/// Online usernames grouped by channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presence {
    pub channel_users: BTreeMap<String, Vec<String>>,
    pub total_count: usize,
}

/// Result of one fan-out.
#[derive(Debug, Default)]
struct Fanout {
    delivered: usize,
    evicted: usize,
    /// Sessions whose write side is gone; they leave through `unregister`.
    disconnected: Vec<Uuid>,
}

/// The hub actor.
pub struct Hub {
    sessions: HashMap<Uuid, ConnectedSession>,
    store: Arc<dyn MessageRepository>,
    commands: mpsc::Receiver<HubCommand>,
    session_count: Arc<AtomicUsize>,
}

impl Hub {
    /// Create the hub and a handle to talk to it.
    ///
    /// `intake_buffer` bounds the number of queued commands; producers wait
    /// when it is full.
    pub fn new(store: Arc<dyn MessageRepository>, intake_buffer: usize) -> (Self, HubHandle) {
        let (tx, commands) = mpsc::channel(intake_buffer.max(1));
        let session_count = Arc::new(AtomicUsize::new(0));
        let hub = Self {
            sessions: HashMap::new(),
            store,
            commands,
            session_count: session_count.clone(),
        };
        let handle = HubHandle { tx, session_count };
        (hub, handle)
    }

    /// Create the hub and run it on the current runtime.
    pub fn spawn(store: Arc<dyn MessageRepository>, intake_buffer: usize) -> HubHandle {
        let (hub, handle) = Self::new(store, intake_buffer);
        tokio::spawn(hub.run());
        handle
    }

    /// Process commands until every handle has been dropped.
    pub async fn run(mut self) {
        tracing::info!("Hub started");

        while let Some(command) = self.commands.recv().await {
            match command {
                HubCommand::Register(session) => self.register(session),
                HubCommand::Unregister(session_id) => self.unregister(session_id),
                HubCommand::Broadcast(message) => self.broadcast(&message),
                HubCommand::Publish { message, ack } => {
                    self.store.append(message.clone());
                    if let Some(ack) = ack {
                        let _ = ack.send(());
                    }
                    self.broadcast(&message);
                }
                HubCommand::Presence(reply) => {
                    let _ = reply.send(self.presence());
                }
            }
        }

        tracing::info!(remaining = self.sessions.len(), "Hub stopped");
    }

    fn register(&mut self, session: ConnectedSession) {
        let join = Message::join_notice(&session.username, &session.channel);

        tracing::info!(
            session_id = %session.session_id,
            username = %session.username,
            channel = %session.channel,
            "Session registered"
        );
        self.sessions.insert(session.session_id, session);
        self.sync_count();

        self.store.append(join.clone());
        self.broadcast(&join);
    }

    fn unregister(&mut self, session_id: Uuid) {
        let Some(session) = self.sessions.remove(&session_id) else {
            tracing::debug!(session_id = %session_id, "Unregister for unknown session ignored");
            return;
        };
        self.sync_count();

        tracing::info!(
            session_id = %session_id,
            username = %session.username,
            channel = %session.channel,
            "Session unregistered"
        );

        let leave = Message::leave_notice(&session.username, &session.channel);
        // Dropping the entry closes its outbound queue.
        drop(session);

        self.store.append(leave.clone());
        self.broadcast(&leave);
    }

    fn broadcast(&mut self, message: &Message) {
        let fanout = self.fan_out(message);

        tracing::debug!(
            channel = %message.channel,
            user = %message.user,
            kind = %message.kind,
            delivered = fanout.delivered,
            evicted = fanout.evicted,
            "Broadcast complete"
        );
        metrics::record_broadcast(message.kind.as_str(), fanout.delivered, fanout.evicted);

        for session_id in fanout.disconnected {
            self.unregister(session_id);
        }
    }

    fn fan_out(&mut self, message: &Message) -> Fanout {
        let mut fanout = Fanout::default();
        let mut stalled = Vec::new();

        for session in self.sessions.values() {
            if !message.belongs_to_channel(&session.channel) {
                continue;
            }
            match session.sender.try_send(message.clone()) {
                Ok(()) => fanout.delivered += 1,
                Err(TrySendError::Full(_)) => stalled.push(session.session_id),
                Err(TrySendError::Closed(_)) => fanout.disconnected.push(session.session_id),
            }
        }

        for session_id in stalled {
            if let Some(session) = self.sessions.remove(&session_id) {
                tracing::warn!(
                    session_id = %session_id,
                    username = %session.username,
                    channel = %session.channel,
                    "Outbound queue full, session evicted"
                );
                fanout.evicted += 1;
            }
        }
        if fanout.evicted > 0 {
            self.sync_count();
        }

        fanout
    }

    fn presence(&self) -> Presence {
        let mut channel_users: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for session in self.sessions.values() {
            channel_users
                .entry(session.channel.clone())
                .or_default()
                .push(session.username.clone());
        }
        for users in channel_users.values_mut() {
            users.sort();
        }

        Presence {
            channel_users,
            total_count: self.sessions.len(),
        }
    }

    fn sync_count(&self) {
        self.session_count.store(self.sessions.len(), Ordering::Relaxed);
        metrics::set_active_sessions(self.sessions.len());
    }
}

/// Cloneable handle for submitting commands to the hub.
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
    session_count: Arc<AtomicUsize>,
}

impl HubHandle {
    /// Admit a session to its channel.
    pub async fn register(&self, session: ConnectedSession) -> Result<(), HubError> {
        self.send(HubCommand::Register(session)).await
    }

    /// Remove a session. Unregistering an absent session is not an error.
    pub async fn unregister(&self, session_id: Uuid) -> Result<(), HubError> {
        self.send(HubCommand::Unregister(session_id)).await
    }

    /// Fan a message out to the sessions of its channel.
    pub async fn broadcast(&self, message: Message) -> Result<(), HubError> {
        self.send(HubCommand::Broadcast(message)).await
    }

    /// Store a message, then fan it out, as one step of the hub loop.
    ///
    /// Funnelling appends through the loop keeps each channel's stored order
    /// identical to the order recipients see.
    pub async fn publish(&self, message: Message) -> Result<(), HubError> {
        self.send(HubCommand::Publish { message, ack: None }).await
    }

    /// Like [`HubHandle::publish`], but returns only after the message is in
    /// history.
    pub async fn publish_confirmed(&self, message: Message) -> Result<(), HubError> {
        let (ack, stored) = oneshot::channel();
        self.send(HubCommand::Publish {
            message,
            ack: Some(ack),
        })
        .await?;
        stored.await.map_err(|_| HubError::Stopped)
    }

    /// Snapshot the registry.
    ///
    /// Also acts as a barrier: every command sent earlier from this task has
    /// been processed once the snapshot arrives.
    pub async fn presence(&self) -> Result<Presence, HubError> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::Presence(reply)).await?;
        response.await.map_err(|_| HubError::Stopped)
    }

    /// Number of registered sessions as last published by the hub loop.
    pub fn session_count(&self) -> usize {
        self.session_count.load(Ordering::Relaxed)
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.tx.send(command).await.map_err(|_| HubError::Stopped)
    }
}
