//! Response DTOs
//!
//! Data structures for API response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::PublicAccount;
use crate::presentation::websocket::Presence;

/// Status returned after a message is accepted
pub const STATUS_SENT: &str = "sent";

/// Generic status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn sent() -> Self {
        Self {
            status: STATUS_SENT,
        }
    }
}

/// Successful login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub account: PublicAccount,
}

/// Public account listing
#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub accounts: Vec<PublicAccount>,
}

/// Online users grouped by channel
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    pub channel_users: BTreeMap<String, Vec<String>>,
    pub total_count: usize,
}

impl From<Presence> for PresenceResponse {
    fn from(presence: Presence) -> Self {
        Self {
            channel_users: presence.channel_users,
            total_count: presence.total_count,
        }
    }
}
