//! Account Handlers
//!
//! Login only checks credentials and reports the assigned channel; the
//! real-time connection authenticates again with the same credentials.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::application::dto::{AccountsResponse, LoginRequest, LoginResponse};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List accounts without passwords
pub async fn get_accounts(State(state): State<AppState>) -> Json<AccountsResponse> {
    Json(AccountsResponse {
        accounts: state.accounts.public_accounts(),
    })
}

/// Check credentials
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(body) = body.map_err(|_| AppError::invalid_json())?;
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let account = state
        .accounts
        .validate(&username, &password)
        .inspect_err(|_| tracing::debug!(username = %username, "Login rejected"))?;

    tracing::info!(username = %account.username, channel = %account.channel, "Login accepted");

    Ok(Json(LoginResponse {
        success: true,
        account: account.public(),
    }))
}
