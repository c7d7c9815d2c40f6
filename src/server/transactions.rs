//! Transaction endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use finance_store::{Transaction, UserId};
use serde::Serialize;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<TransactionList>, ApiError> {
    let transactions = state.transactions.list_by_user(user_id).await?;
    crate::trace_log!("listed {} transactions for user {}", transactions.len(), user_id);
    Ok(Json(TransactionList { transactions }))
}
