//! Custom error types for folio-audit
//!
//! This module defines the error hierarchy for the audit subsystem using
//! thiserror. Note that the recorder never surfaces these to callers; they
//! are returned by the stores and the configuration layer.

use thiserror::Error;

/// The main error type for folio-audit operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Durable store errors (file or database)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input, e.g. an unknown entity type
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AuditError {
    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for AuditError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<r2d2::Error> for AuditError {
    fn from(err: r2d2::Error) -> Self {
        Self::Storage(format!("connection pool: {}", err))
    }
}

/// Result type alias for folio-audit operations
pub type AuditResult<T> = Result<T, AuditError>;
