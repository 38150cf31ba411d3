//! Error handling for the API gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::Error;
use serde::{Deserialize, Serialize};

/// API error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Error information
    pub error: ErrorInfo,
}

/// Detailed error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (string identifier for the error type)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors
///
/// The 500-class variants carry the underlying engine error as a source but
/// present a generic message to the client; the detail is logged, not leaked.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Chain not found or inactive: {0}")]
    InvalidChain(i64),

    #[error("Token not found on chain {chain_id}: {address}")]
    InvalidToken { chain_id: i64, address: String },

    #[error("Failed to generate swap quote")]
    Quote(#[source] Error),

    #[error("Failed to record swap transaction")]
    Execution(#[source] Error),

    #[error("Failed to list swap routes")]
    Routes(#[source] Error),
}

impl ApiError {
    /// Classify an engine error raised on the quote path
    pub fn from_quote(err: Error) -> Self {
        match err {
            Error::ValidationError(msg) => ApiError::Validation(msg),
            other => ApiError::Quote(other),
        }
    }

    /// Classify an engine error raised on the execute path
    ///
    /// A duplicate transaction hash is a client idempotency error, not a
    /// server failure.
    pub fn from_execute(err: Error) -> Self {
        match err {
            Error::ValidationError(msg) => ApiError::Validation(msg),
            Error::DuplicateTransaction(msg) => ApiError::Validation(msg),
            other => ApiError::Execution(other),
        }
    }

    /// Classify an engine error raised on the route-listing path
    pub fn from_routes(err: Error) -> Self {
        match err {
            Error::ValidationError(msg) => ApiError::Validation(msg),
            other => ApiError::Routes(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::InvalidChain(_) => (StatusCode::NOT_FOUND, "INVALID_CHAIN"),
            ApiError::InvalidToken { .. } => (StatusCode::NOT_FOUND, "INVALID_TOKEN"),
            ApiError::Quote(_) => (StatusCode::INTERNAL_SERVER_ERROR, "QUOTE_ERROR"),
            ApiError::Execution(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXECUTION_ERROR"),
            ApiError::Routes(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ROUTES_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("API error [{}]: {:?}", code, &self);
        } else {
            tracing::debug!("API error [{}]: {}", code, &self);
        }

        let details = match &self {
            ApiError::InvalidToken { chain_id, address } => Some(serde_json::json!({
                "chain_id": chain_id,
                "address": address,
            })),
            _ => None,
        };

        let error_response = ErrorResponse {
            success: false,
            error: ErrorInfo {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_hash_maps_to_validation() {
        let err = ApiError::from_execute(Error::DuplicateTransaction("0xabc".to_string()));
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_internal_quote_error_message_is_generic() {
        let err = ApiError::from_quote(Error::Internal("pool exhausted".to_string()));
        assert!(matches!(err, ApiError::Quote(_)));
        assert!(!err.to_string().contains("pool exhausted"));
    }
}
