//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AccountValidator**: Credential check and channel assignment
//! - **MessageService**: History queries and REST message validation

pub mod account_service;
pub mod message_service;

pub use account_service::{AccountValidator, AuthError};
pub use message_service::{MessageError, MessageService, DEFAULT_API_USER};
