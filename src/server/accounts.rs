//! Account endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use finance_store::{Account, UserId};
use serde::Serialize;

use super::{ApiError, AppState};

/// An account as returned to clients. Balances are not stored locally and
/// are always reported as `null`.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    #[serde(flatten)]
    pub account: Account,
    pub current_balance: Option<f64>,
    pub available_balance: Option<f64>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account,
            current_balance: None,
            available_balance: None,
        }
    }
}

fn respond(accounts: Vec<Account>) -> Json<Vec<AccountResponse>> {
    Json(accounts.into_iter().map(AccountResponse::from).collect())
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    Ok(respond(state.accounts.list_by_user(user_id).await?))
}

pub async fn list_for_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    Ok(respond(state.accounts.list_by_item(item_id).await?))
}
