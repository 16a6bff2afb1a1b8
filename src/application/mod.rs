//! Application Layer
//!
//! Account validation, history queries and the request/response shapes of
//! the REST surface. Nothing here touches sockets or the hub directly.

pub mod dto;
pub mod services;
