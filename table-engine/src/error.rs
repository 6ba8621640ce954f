//! FILENAME: table-engine/src/error.rs

use thiserror::Error;

/// Failure reported by a fallible accessor function.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct AccessorError(pub String);

impl AccessorError {
    pub fn new(message: impl Into<String>) -> Self {
        AccessorError(message.into())
    }
}

impl From<&str> for AccessorError {
    fn from(message: &str) -> Self {
        AccessorError(message.to_string())
    }
}

impl From<String> for AccessorError {
    fn from(message: String) -> Self {
        AccessorError(message)
    }
}

/// Errors the engine records on its diagnostic channel.
/// None of these cross the public API as a `Result`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("accessor for column '{column_id}' failed: {source}")]
    Accessor {
        column_id: String,
        #[source]
        source: AccessorError,
    },

    #[error("accessor for column '{column_id}' panicked: {message}")]
    AccessorPanic { column_id: String, message: String },

    #[error("column '{column_id}' has no accessor value for this record")]
    KeyNotFound { column_id: String, key: String },
}
