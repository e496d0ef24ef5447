//! Custom error types for mimi-ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for mimi-ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for records and import files
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Import found nothing that is not already stored
    #[error("Nothing new to import: all {skipped} records already exist")]
    NothingToImport { skipped: usize },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Failures reported by the record backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// An operation needed a signed-in user
    #[error("Not signed in. Run 'mimi login <user>' first")]
    NotSignedIn,
}

impl LedgerError {
    /// Create a "not found" error for records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is the empty-import condition
    pub fn is_nothing_to_import(&self) -> bool {
        matches!(self, Self::NothingToImport { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for mimi-ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
