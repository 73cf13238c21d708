//! Core types for Quarry
//!
//! This crate defines the foundational types used throughout the system:
//! - Document: JSON object documents with dotted field paths
//! - ModelSchema / FieldType: explicit member metadata for model types
//! - MethodDescriptor / ContractDescriptor: static identity of contract methods
//! - Filter: conjunctive query fragments with document matching
//! - Update: ordered update fragments
//! - Error: descriptor and update errors

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod filter;
pub mod method;
pub mod schema;
pub mod update;

pub use document::{Document, ID_FIELD};
pub use error::{DescriptorError, Result, UpdateError};
pub use filter::Filter;
pub use method::{ContractDescriptor, ContractDescriptorBuilder, MethodDescriptor, ReturnKind};
pub use schema::{FieldDef, FieldKind, FieldType, Model, ModelSchema};
pub use update::{Update, UpdateOp};

/// Re-exported so model and contract declarations need no direct dependency
pub use serde_json::{json, Value};
