//! HTTP API
//!
//! Routes are thin: extract, call one store, map the result. Errors go through
//! [`ApiError`].

use axum::{
    Json, Router,
    routing::{get, post},
};
use finance_store::stores::{
    AccountStore, AggregateStore, ItemStore, TransactionStore, UserStore,
};
use serde_json::{Value, json};
use std::future::Future;
use tokio::net::TcpListener;

use crate::core::Compound;

mod accounts;
mod aggregate;
mod error;
mod transactions;
mod users;

pub use aggregate::{AggregateRequest, AggregationParams, FilterParams};
pub use error::ApiError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub users: UserStore,
    pub items: ItemStore,
    pub accounts: AccountStore,
    pub transactions: TransactionStore,
    pub aggregates: AggregateStore,
}

impl AppState {
    pub fn new(compound: &Compound) -> Self {
        Self {
            users: compound.users(),
            items: compound.items(),
            accounts: compound.accounts(),
            transactions: compound.transactions(),
            aggregates: compound.aggregates(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/{id}", get(users::get))
        .route(
            "/api/users/username/{username}",
            get(users::get_by_username).delete(users::delete_by_username),
        )
        .route("/api/users/{id}/accounts", get(accounts::list_for_user))
        .route("/api/users/{id}/income", get(aggregate::total_income))
        .route("/api/users/{id}/aggregate", post(aggregate::aggregate))
        .route("/api/items/{id}/accounts", get(accounts::list_for_item))
        .route("/api/transactions/{user_id}", get(transactions::list_for_user))
        .with_state(state)
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// Serve until `shutdown` resolves, then let in-flight requests finish
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
