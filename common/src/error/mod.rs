//! Error types for the fee and quote engine
//!
//! This module provides a unified error handling system for all service
//! crates in the platform. It defines standard error types that can be used
//! across service boundaries and provides consistent error conversion.

use std::fmt::Display;
use thiserror::Error;

/// Fee engine error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input, rejected before any computation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error when a chain cannot be found or is inactive
    #[error("Chain not found: {0}")]
    ChainNotFound(String),

    /// Error when a token cannot be found or is inactive on a chain
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    /// Error when a trading pair cannot be found
    #[error("Trading pair not found: {0}")]
    PairNotFound(String),

    /// Error when a transaction record cannot be found
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Error when a transaction hash has already been recorded
    #[error("Duplicate transaction: {0}")]
    DuplicateTransaction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Decimal conversion error
    #[error("Decimal conversion error: {0}")]
    DecimalError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", context, msg)),
                Error::ChainNotFound(msg) => Error::ChainNotFound(format!("{}: {}", context, msg)),
                Error::TokenNotFound(msg) => Error::TokenNotFound(format!("{}: {}", context, msg)),
                Error::PairNotFound(msg) => Error::PairNotFound(format!("{}: {}", context, msg)),
                Error::TransactionNotFound(msg) => Error::TransactionNotFound(format!("{}: {}", context, msg)),
                Error::DuplicateTransaction(msg) => Error::DuplicateTransaction(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => Error::ConfigurationError(format!("{}: {}", context, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
                Error::Database(e) => Error::Database(e),
                Error::Serialization(e) => Error::Serialization(e),
                Error::DecimalError(msg) => Error::DecimalError(format!("{}: {}", context, msg)),
            }
        })
    }
}

/// Trait for converting other error types to our Error type
pub trait IntoError {
    /// Convert to Error
    fn into_error(self, message: &str) -> Error;
}

impl<E: std::error::Error> IntoError for E {
    fn into_error(self, message: &str) -> Error {
        Error::Internal(format!("{}: {}", message, self))
    }
}

/// Convert string messages into an error
impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Internal(message)
    }
}

/// Convert static string references into an error
impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Internal(message.to_string())
    }
}

/// From rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::DecimalError(err.to_string())
    }
}
