//! HTTP Handlers
//!
//! Request handlers for the REST endpoints.

pub mod auth;
pub mod health;
pub mod message;
pub mod user;
