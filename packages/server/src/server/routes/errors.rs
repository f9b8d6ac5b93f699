//! JSON error bodies shared by all API routes.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// `{ success: false, error, details? }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl Into<String>, details: Option<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.into(),
            details: details.map(|raw| details_value(&raw)),
        }),
    )
}

/// Remote payloads that are JSON are passed through as JSON, anything else
/// as a string.
fn details_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

pub fn not_found(what: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("{what} not found"), None)
}

pub fn bad_request(error: impl Into<String>) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, error, None)
}

pub fn conflict(error: impl Into<String>) -> ApiError {
    api_error(StatusCode::CONFLICT, error, None)
}

/// Whether a Postgres unique constraint rejected the write.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .filter_map(sqlx::Error::as_database_error)
        .any(|db_err| db_err.is_unique_violation())
}

/// Log the full chain and hide it from the client.
pub fn internal_error(err: anyhow::Error) -> ApiError {
    tracing::error!(error = %format!("{err:#}"), "Request failed");
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
        None,
    )
}
