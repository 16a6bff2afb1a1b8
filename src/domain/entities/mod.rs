//! # Domain Entities
//!
//! - **Message**: one chat record, stamped by the server and tagged with
//!   the channel it belongs to
//! - **Account**: a configured login and the single channel it may join
//!
//! `MessageRepository` is the store contract; the in-memory implementation
//! lives in the infrastructure layer.

mod account;
mod message;

pub use account::{Account, PublicAccount};
pub use message::{Message, MessageKind, MessageRepository, SYSTEM_USER};
