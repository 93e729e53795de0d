//! Error types for the domain crate.
//!
//! Parsing and validation failures share one enum so callers can match on
//! the case they care about and bubble the rest up with `?`.

use thiserror::Error;

/// Errors raised while parsing or validating domain values
#[derive(Error, Debug)]
pub enum DomainError {
    /// Catalog file could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Catalog JSON didn't match the expected shape
    #[error("Malformed catalog: {0}")]
    MalformedCatalog(#[from] serde_json::Error),

    /// A field had a value outside its allowed set
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A required form field was left empty
    #[error("{field} is required")]
    MissingField { field: String },

    /// Two catalog entries share the same name
    #[error("Duplicate menu item: {0}")]
    DuplicateItem(String),

    /// Referenced menu item doesn't exist
    #[error("Unknown menu item: {0}")]
    UnknownItem(String),

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    pub fn invalid(field: &str, value: impl ToString) -> Self {
        DomainError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn missing(field: &str) -> Self {
        DomainError::MissingField {
            field: field.to_string(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DomainError>;
