//! Filter fragments
//!
//! A [`Filter`] is one unit of query criteria produced by a convention from a
//! single call. Fragments compile by conjunction: [`Filter::and`] flattens
//! nested conjunctions and leaves a lone fragment as-is.
//!
//! Evaluation follows document-store matching rules:
//! - equality against an array field matches when any element is equal
//! - `Ne` matches documents where the field is missing
//! - equality with `null` matches documents where the field is missing

use crate::document::{get_at_path, values_equal, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query criteria over documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// Field equals value
    Eq {
        /// Dotted field path
        field: String,
        /// Expected value
        value: Value,
    },
    /// Field does not equal value
    Ne {
        /// Dotted field path
        field: String,
        /// Rejected value
        value: Value,
    },
    /// Field is present (possibly null)
    Exists {
        /// Dotted field path
        field: String,
    },
    /// Field equals any of the values
    In {
        /// Dotted field path
        field: String,
        /// Accepted values
        values: Vec<Value>,
    },
    /// All sub-filters match
    And {
        /// Conjoined filters
        filters: Vec<Filter>,
    },
}

impl Filter {
    /// Equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Inequality filter
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Presence filter
    pub fn exists(field: impl Into<String>) -> Self {
        Filter::Exists {
            field: field.into(),
        }
    }

    /// Membership filter
    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Filter::In {
            field: field.into(),
            values,
        }
    }

    /// Conjoin fragments
    ///
    /// Nested conjunctions are flattened. A single fragment is returned
    /// unchanged; an empty input yields an empty conjunction, which matches
    /// every document.
    pub fn and(fragments: impl IntoIterator<Item = Filter>) -> Self {
        let mut filters = Vec::new();
        for fragment in fragments {
            match fragment {
                Filter::And { filters: inner } => filters.extend(inner),
                other => filters.push(other),
            }
        }
        match filters.len() {
            1 => filters.remove(0),
            _ => Filter::And { filters },
        }
    }

    /// Whether this filter places no criteria at all
    ///
    /// True only for conjunctions whose members are all empty, including
    /// the empty conjunction itself.
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::And { filters } => filters.iter().all(Filter::is_empty),
            _ => false,
        }
    }

    /// Evaluate against a document
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::Eq { field, value } => field_equals(doc, field, value),
            Filter::Ne { field, value } => !field_equals(doc, field, value),
            Filter::Exists { field } => get_at_path(doc, field).is_some(),
            Filter::In { field, values } => values.iter().any(|v| field_equals(doc, field, v)),
            Filter::And { filters } => filters.iter().all(|f| f.matches(doc)),
        }
    }
}

fn field_equals(doc: &Document, field: &str, expected: &Value) -> bool {
    match get_at_path(doc, field) {
        None => expected.is_null(),
        Some(actual @ Value::Array(items)) => {
            values_equal(actual, expected) || items.iter().any(|item| values_equal(item, expected))
        }
        Some(actual) => values_equal(actual, expected),
    }
}
