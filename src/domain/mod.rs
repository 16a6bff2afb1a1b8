//! # Domain Layer
//!
//! Messages, accounts and the message store contract. Nothing here knows
//! about sockets or HTTP.

pub mod entities;

// Re-export commonly used types
pub use entities::*;
