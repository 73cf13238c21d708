//! Naming conventions
//!
//! A [`Convention`] recognizes a class of method shapes and turns a call to
//! such a method into filter and update fragments. Recognition is decided
//! once, at registration, from static metadata only: the method descriptor
//! and the schema of the model the contract targets. Emission happens on
//! every call and sees only the descriptor and the call's arguments.
//!
//! If `matches` accepts a method, the emit functions must succeed for every
//! argument list that fits the method's declared parameter types.

use std::fmt;

use quarry_core::{Filter, MethodDescriptor, ModelSchema, Update, Value};

/// One call to a convention-bound method
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// The resolved method
    pub method: &'a MethodDescriptor,
    /// Actual arguments, one per declared parameter
    pub args: &'a [Value],
}

impl<'a> Invocation<'a> {
    /// Create an invocation
    pub fn new(method: &'a MethodDescriptor, args: &'a [Value]) -> Self {
        Self { method, args }
    }

    /// Argument at `index`
    pub fn arg(&self, index: usize) -> Result<&'a Value, ConventionError> {
        self.args
            .get(index)
            .ok_or_else(|| ConventionError::MissingArgument {
                method: self.method.name.clone(),
                index,
            })
    }
}

/// Failure raised by a convention while emitting a fragment
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConventionError {
    /// The call carried fewer arguments than the convention reads
    #[error("{method}: missing argument {index}")]
    MissingArgument {
        /// Method name
        method: String,
        /// Zero-based argument position
        index: usize,
    },

    /// An argument could not be turned into a fragment
    #[error("{method}: {reason}")]
    InvalidArgument {
        /// Method name
        method: String,
        /// Failure description
        reason: String,
    },
}

/// A pluggable method naming convention
///
/// Implementations must be stateless with respect to calls: one instance
/// serves every builder of every contract it is bound to, possibly on
/// several threads at once.
pub trait Convention: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Whether this convention owns `method` on a contract over `model`
    ///
    /// Must be a pure function of its inputs.
    fn matches(&self, model: &ModelSchema, method: &MethodDescriptor) -> bool;

    /// Filter fragment for one call, if the convention contributes criteria
    fn filter_fragment(&self, call: &Invocation<'_>) -> Result<Option<Filter>, ConventionError>;

    /// Update fragment for one call, if the convention contributes changes
    fn update_fragment(&self, _call: &Invocation<'_>) -> Result<Option<Update>, ConventionError> {
        Ok(None)
    }
}

impl fmt::Debug for dyn Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Convention({})", self.name())
    }
}
