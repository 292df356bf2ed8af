//! Error types for the history engine.
//!
//! The engine itself absorbs invalid calls as defined no-ops (undoing with
//! an empty stack, ending without an open batch, and so on); errors only
//! arise at the record-framework boundary.

use crate::types::EntityId;
use thiserror::Error;

/// Main error type for record operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("duplicate entity in group: {0}")]
    DuplicateEntity(EntityId),

    #[error("attribute payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Serialization(e.to_string())
    }
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
