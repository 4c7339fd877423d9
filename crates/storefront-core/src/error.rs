//! Error types for storefront core operations.
//!
//! The list pipeline itself never fails: `evaluate`, `reduce` and `apply`
//! degrade to defaults and report through [`crate::diagnostics`]. Errors here
//! cover the edges of the core (snapshot I/O and typed field writes).

use thiserror::Error;

use crate::record::FieldKind;

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Core error type for storefront operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Snapshot could not be decoded or encoded
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Filesystem error while reading or writing a snapshot
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid caller input (sort keys, field values)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A record rejected a field write
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl From<std::io::Error> for StorefrontError {
    fn from(err: std::io::Error) -> Self {
        StorefrontError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorefrontError {
    fn from(err: serde_json::Error) -> Self {
        StorefrontError::Snapshot(err.to_string())
    }
}

/// Rejection of a single field write on a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// The record type has no field with this name
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The value does not fit the field's kind
    #[error("Field {field} expects a {expected} value")]
    KindMismatch { field: String, expected: FieldKind },

    /// The field is derived or otherwise not writable
    #[error("Field {0} is read-only")]
    ReadOnly(String),
}

impl FieldError {
    pub fn kind_mismatch(field: impl Into<String>, expected: FieldKind) -> Self {
        FieldError::KindMismatch {
            field: field.into(),
            expected,
        }
    }
}
