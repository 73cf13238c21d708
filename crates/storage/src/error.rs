//! Error types for the store collaborator
//!
//! Store errors travel through the query layer unchanged, so callers can
//! match on the original cause.

use quarry_core::UpdateError;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by a document store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Document could not be stored
    #[error("invalid document: {reason}")]
    InvalidDocument {
        /// Why the document was rejected
        reason: String,
    },

    /// Update operators could not be applied to a matched document
    #[error("update rejected: {0}")]
    Update(#[from] UpdateError),

    /// The backing store cannot serve requests
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Failure description
        reason: String,
    },

    /// Value conversion failed
    #[error("serialization error: {reason}")]
    Serialization {
        /// Failure description
        reason: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization {
            reason: e.to_string(),
        }
    }
}
