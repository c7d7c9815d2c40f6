use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use finance_store::StoreError;
use serde::Serialize;

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    BadRequest(String),
    NotFound(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn status_for_store_error(err: &StoreError) -> StatusCode {
    match err {
        StoreError::InvalidFilter(_) | StoreError::InvalidAggregation(_) => {
            StatusCode::BAD_REQUEST
        }
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::QueryTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        StoreError::ExecutionFailed { .. }
        | StoreError::NoResult(_)
        | StoreError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Validation messages go back to the caller; internal causes are only logged
fn message_for_store_error(err: StoreError, status: StatusCode) -> String {
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {err}");
        return "internal server error".to_string();
    }
    if status == StatusCode::GATEWAY_TIMEOUT {
        tracing::warn!("request timed out: {err}");
        return "query timed out".to_string();
    }
    err.to_string()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Store(err) => {
                let status = status_for_store_error(&err);
                (status, message_for_store_error(err, status))
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
