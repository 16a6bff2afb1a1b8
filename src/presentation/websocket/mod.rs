//! WebSocket Relay
//!
//! Real-time channel: the connection hub and the per-connection pumps.

pub mod handler;
pub mod hub;
pub mod messages;
pub mod session;

pub use handler::{ws_handler, SessionError};
pub use hub::{ConnectedSession, Hub, HubCommand, HubError, HubHandle, Presence};
pub use messages::{ClientFrame, ErrorFrame};
pub use session::SessionState;
