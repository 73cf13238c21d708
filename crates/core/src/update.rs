//! Update fragments
//!
//! An [`Update`] is an ordered list of field operators. Fragments combine by
//! concatenation in call order, and operators apply in that order, so a
//! later `Set` on a field overrides an earlier one. No other conflict policy
//! is imposed.

use crate::document::{get_at_path, get_at_path_mut, remove_at_path, set_at_path, Document};
use crate::error::UpdateError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A single field operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum UpdateOp {
    /// Replace the field value
    Set {
        /// Dotted field path
        field: String,
        /// New value
        value: Value,
    },
    /// Remove the field
    Unset {
        /// Dotted field path
        field: String,
    },
    /// Add to a numeric field, creating it if missing
    Inc {
        /// Dotted field path
        field: String,
        /// Amount to add
        by: Number,
    },
    /// Append to an array field, creating it if missing
    Push {
        /// Dotted field path
        field: String,
        /// Appended element
        value: Value,
    },
}

/// Ordered combination of update operators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    /// An update with no operators
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `Set` operator
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Set {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Append an `Unset` operator
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.ops.push(UpdateOp::Unset {
            field: field.into(),
        });
        self
    }

    /// Append an `Inc` operator
    pub fn inc(mut self, field: impl Into<String>, by: impl Into<Number>) -> Self {
        self.ops.push(UpdateOp::Inc {
            field: field.into(),
            by: by.into(),
        });
        self
    }

    /// Append a `Push` operator
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Push {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Concatenate fragments, preserving order
    pub fn combine(fragments: impl IntoIterator<Item = Update>) -> Self {
        Update {
            ops: fragments.into_iter().flat_map(|u| u.ops).collect(),
        }
    }

    /// Operators in application order
    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    /// Whether there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every operator to `doc` in order
    ///
    /// On error the document may hold the effects of operators that ran
    /// before the failing one; callers that need atomicity apply to a copy.
    pub fn apply(&self, doc: &mut Document) -> Result<(), UpdateError> {
        for op in &self.ops {
            match op {
                UpdateOp::Set { field, value } => set_at_path(doc, field, value.clone()),
                UpdateOp::Unset { field } => {
                    remove_at_path(doc, field);
                }
                UpdateOp::Inc { field, by } => {
                    let next = match get_at_path(doc, field) {
                        None | Some(Value::Null) => by.clone(),
                        Some(Value::Number(current)) => add_numbers(field, current, by)?,
                        Some(_) => {
                            return Err(UpdateError::TypeMismatch {
                                op: "inc",
                                field: field.clone(),
                                expected: "number",
                            })
                        }
                    };
                    set_at_path(doc, field, Value::Number(next));
                }
                UpdateOp::Push { field, value } => match get_at_path_mut(doc, field) {
                    Some(Value::Array(items)) => items.push(value.clone()),
                    None | Some(Value::Null) => {
                        set_at_path(doc, field, Value::Array(vec![value.clone()]))
                    }
                    Some(_) => {
                        return Err(UpdateError::TypeMismatch {
                            op: "push",
                            field: field.clone(),
                            expected: "array",
                        })
                    }
                },
            }
        }
        Ok(())
    }
}

fn add_numbers(field: &str, a: &Number, b: &Number) -> Result<Number, UpdateError> {
    let overflow = || UpdateError::Overflow {
        field: field.to_string(),
    };
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x.checked_add(y).map(Number::from).ok_or_else(overflow),
        _ => {
            let sum = a.as_f64().unwrap_or(f64::NAN) + b.as_f64().unwrap_or(f64::NAN);
            Number::from_f64(sum).ok_or_else(overflow)
        }
    }
}
