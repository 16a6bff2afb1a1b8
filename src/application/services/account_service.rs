//! Account Validation Service
//!
//! Maps login credentials to the channel an account is pinned to.

use crate::config::AccountSettings;
use crate::domain::{Account, PublicAccount};

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Credential checker over an immutable account list.
///
/// Built once at startup from configuration and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct AccountValidator {
    accounts: Vec<Account>,
}

impl AccountValidator {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// Build from the `accounts` configuration section.
    pub fn from_settings(accounts: &[AccountSettings]) -> Self {
        Self::new(
            accounts
                .iter()
                .map(|a| Account::new(&a.username, &a.password, &a.channel))
                .collect(),
        )
    }

    /// Find the account matching the credentials exactly.
    pub fn validate(&self, username: &str, password: &str) -> Result<&Account, AuthError> {
        self.accounts
            .iter()
            .find(|account| account.matches(username, password))
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Every account without its password, in configuration order.
    pub fn public_accounts(&self) -> Vec<PublicAccount> {
        self.accounts.iter().map(Account::public).collect()
    }
}
