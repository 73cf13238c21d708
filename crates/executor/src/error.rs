//! Error types for registration and execution.
//!
//! All errors surfaced by the query layer are represented by the [`Error`]
//! enum. Failures raised inside a convention or the store keep their original
//! type: they are carried by the transparent [`Error::Convention`] and
//! [`Error::Store`] variants rather than rewrapped into a generic failure.

use quarry_core::{DescriptorError, MethodDescriptor};
use quarry_storage::StoreError;

use crate::convention::ConventionError;

/// Query layer errors.
///
/// # Categories
///
/// | Category | Variants | When |
/// |----------|----------|------|
/// | Registration | `NoMatchingConvention`, `DuplicateContract`, `NotRegistered`, `Descriptor` | Building a registry or a builder |
/// | Safety | `UnsafeOperation` | Terminal call with no criteria |
/// | Dispatch | `UnknownMethod`, `UnboundMethod`, `InvalidArguments` | Invoking a builder method |
/// | Execution | `WrapperSkipped`, `Serialization`, `Internal` | Running a terminal call |
/// | Passthrough | `Convention`, `Store` | Collaborator failures, unaltered |
/// | Configuration | `Config` | Loading repository settings |
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    // ==================== Registration ====================
    /// A declared custom method matches no registered convention
    #[error("no convention matches {method}")]
    NoMatchingConvention { method: MethodDescriptor },

    /// Two different contracts were registered under one name
    #[error("contract {name} registered twice with different declarations")]
    DuplicateContract { name: String },

    /// Contract type was never registered with the registry in use
    #[error("contract {contract} is not registered with this registry")]
    NotRegistered { contract: String },

    /// Contract declaration is malformed
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    // ==================== Safety ====================
    /// Gated terminal call on an empty filter without override
    #[error(
        "unsafe operation: {operation} has no criteria; \
         pass allow_without_criteria = true to act on the whole collection"
    )]
    UnsafeOperation { operation: &'static str },

    // ==================== Dispatch ====================
    /// Method is neither built-in nor declared by the contract
    #[error("contract {contract} declares no method {method}")]
    UnknownMethod { contract: String, method: String },

    /// Declared custom method has no convention binding
    #[error("method {method} of contract {contract} is not bound to a convention; register the contract before building")]
    UnboundMethod { contract: String, method: String },

    /// Arguments do not fit the method
    #[error("invalid arguments for {method}: {reason}")]
    InvalidArguments { method: String, reason: String },

    // ==================== Execution ====================
    /// The configured call wrapper returned without running the operation
    #[error("call wrapper did not run {operation}")]
    WrapperSkipped { operation: &'static str },

    /// Document could not be converted to or from the model type
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },

    // ==================== Passthrough ====================
    /// Failure raised by a convention's emit function
    #[error(transparent)]
    Convention(#[from] ConventionError),

    /// Failure raised by the store collaborator
    #[error(transparent)]
    Store(#[from] StoreError),

    // ==================== Configuration ====================
    /// Repository configuration could not be loaded
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            reason: e.to_string(),
        }
    }
}
