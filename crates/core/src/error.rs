//! Error types for descriptor construction
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, DescriptorError>;

/// Errors raised while describing contracts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Two methods of one contract share a name
    #[error("contract {contract} declares method {method} more than once")]
    DuplicateMethod {
        /// Contract name
        contract: String,
        /// Duplicated method name
        method: String,
    },
}

/// Errors raised while applying an update to a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// The existing field value has the wrong type for the operator
    #[error("cannot apply {op} to field {field}: expected {expected}")]
    TypeMismatch {
        /// Update operator name
        op: &'static str,
        /// Dotted field path
        field: String,
        /// What the operator requires
        expected: &'static str,
    },

    /// Integer arithmetic overflowed or produced a non-finite number
    #[error("numeric overflow applying increment to field {field}")]
    Overflow {
        /// Dotted field path
        field: String,
    },
}
