//! Shared Utilities
//!
//! Error types and message ID generation used across all layers.

pub mod error;
pub mod message_id;
