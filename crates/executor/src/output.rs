//! Output enum for dispatched calls.
//!
//! Every dispatched call produces exactly one output variant. This mapping is
//! deterministic: fluent custom methods always produce [`Output::Builder`],
//! and each built-in always produces the same variant.

use quarry_core::{Document, Model};

use crate::{Error, Result};

/// Result of a dispatched call.
///
/// | Call | Output |
/// |------|--------|
/// | custom convention method | `Builder` |
/// | `delete_all`, `update_all` | `Count` |
/// | `delete_one`, `update_one` | `Bool` |
/// | `get_all`, `get_some` | `Documents` |
/// | `get_one` | `Document` |
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The builder was extended; continue chaining on the same instance
    Builder,
    /// Number of affected documents
    Count(u64),
    /// Store acknowledgement
    Bool(bool),
    /// Matching documents
    Documents(Vec<Document>),
    /// First matching document, if any
    Document(Option<Document>),
}

fn unexpected(expected: &str, got: &Output) -> Error {
    Error::Internal {
        reason: format!("expected {} output, got {:?}", expected, got),
    }
}

impl Output {
    /// Unwrap a `Count` output
    pub fn into_count(self) -> Result<u64> {
        match self {
            Output::Count(n) => Ok(n),
            other => Err(unexpected("count", &other)),
        }
    }

    /// Unwrap a `Bool` output
    pub fn into_bool(self) -> Result<bool> {
        match self {
            Output::Bool(b) => Ok(b),
            other => Err(unexpected("bool", &other)),
        }
    }

    /// Decode a `Documents` output into models
    pub fn into_models<M: Model>(self) -> Result<Vec<M>> {
        match self {
            Output::Documents(docs) => docs.into_iter().map(decode).collect(),
            other => Err(unexpected("documents", &other)),
        }
    }

    /// Decode a `Document` output into a model
    pub fn into_model<M: Model>(self) -> Result<Option<M>> {
        match self {
            Output::Document(doc) => doc.map(decode).transpose(),
            other => Err(unexpected("document", &other)),
        }
    }
}

/// Decode one stored document into the model type
pub(crate) fn decode<M: Model>(doc: Document) -> Result<M> {
    Ok(serde_json::from_value(serde_json::Value::Object(doc))?)
}

/// Encode a model as a storable document
pub(crate) fn encode<M: Model>(model: &M) -> Result<Document> {
    Ok(quarry_storage::to_document(serde_json::to_value(model)?)?)
}
