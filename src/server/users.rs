//! User endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use finance_store::{User, UserId};
use serde::Deserialize;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    state
        .users
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user {} not found", id)))
}

pub async fn get_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .users
        .get_by_username(&username)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user '{}' not found", username)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::BadRequest("username cannot be empty".to_string()));
    }

    let user = state.users.create(username).await?;
    tracing::info!("created user {} ({})", user.id, user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn delete_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.delete_by_username(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}
