//! Data Transfer Objects
//!
//! Request and response bodies for the REST surface.

pub mod request;
pub mod response;

pub use request::{ConnectQuery, HistoryQuery, LoginRequest, SendMessageRequest};
pub use response::{AccountsResponse, LoginResponse, PresenceResponse, StatusResponse};
