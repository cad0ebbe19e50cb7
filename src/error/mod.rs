//! Error handling for userdb.
//!
//! This module provides:
//! - [`UserDbError`]: The main error enum, tagged by kind
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Serializable error body with suggestion and context
//!
//! Backend errors never leave the crate raw: every `rusqlite::Error` is
//! classified into `IntegrityViolation` or `StoreUnavailable` on conversion.

mod codes;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;

/// Main error type for userdb operations.
#[derive(Error, Debug)]
pub enum UserDbError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for UserDbError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => {
                Self::IntegrityViolation(err.to_string())
            }
            _ => Self::StoreUnavailable(err.to_string()),
        }
    }
}

impl From<r2d2::Error> for UserDbError {
    fn from(err: r2d2::Error) -> Self {
        Self::StoreUnavailable(format!("connection pool: {err}"))
    }
}

impl UserDbError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::IntegrityViolation(_) => ErrorCode::IntegrityViolation,
            Self::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::NotFound(id) => Some(serde_json::json!({ "id": id })),
            Self::InvalidArgument(reason) => Some(serde_json::json!({ "reason": reason })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// Emitted by `--machine` CLI output and as the body of HTTP error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether the caller can fix this by changing the request
    pub recoverable: bool,

    /// Error category (e.g., "record", "storage")
    pub category: String,
}

impl StructuredError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn from_error(err: &UserDbError) -> Self {
        let mut structured = Self::new(err.code(), err.to_string());
        structured.context = err.context();
        structured
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<UserDbError> for StructuredError {
    fn from(err: UserDbError) -> Self {
        Self::from_error(&err)
    }
}

impl From<&UserDbError> for StructuredError {
    fn from(err: &UserDbError) -> Self {
        Self::from_error(err)
    }
}

/// Result type alias using UserDbError.
pub type Result<T> = std::result::Result<T, UserDbError>;
