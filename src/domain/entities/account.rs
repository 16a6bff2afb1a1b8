//! Account entity.
//!
//! Accounts are loaded from configuration at startup and never change while
//! the process runs. Each account is pinned to a single channel.

use serde::{Deserialize, Serialize};

/// A login identity and the channel it is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub channel: String,
}

impl Account {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            channel: channel.into(),
        }
    }

    /// Exact, case-sensitive credential match.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    /// The account without its password.
    pub fn public(&self) -> PublicAccount {
        PublicAccount {
            username: self.username.clone(),
            channel: self.channel.clone(),
        }
    }
}

/// Account view safe to hand to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccount {
    pub username: String,
    pub channel: String,
}
