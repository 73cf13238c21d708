//! The built-in contract surface.
//!
//! Every builder inherits the same terminal operations. These are never
//! bound to a convention: the dispatcher recognizes them by name and routes
//! them straight to the [`QueryExecutor`](crate::QueryExecutor).
//!
//! | Method | Arguments | Gated |
//! |--------|-----------|-------|
//! | `delete_all` | `allow?` | yes |
//! | `delete_one` | `allow?` | yes |
//! | `update_all` | `allow?` | yes, after the empty-update no-op |
//! | `update_one` | `allow?` | yes, after the empty-update no-op |
//! | `get_all` | `allow?` | yes |
//! | `get_some` | `limit, allow?` | yes (as `get_all` when `limit < 1`) |
//! | `get_one` | none | no |
//! | `queryable` | transform closure | no |
//! | `queryable_many` | transform closure | no |
//!
//! `allow` defaults to `false`.

use quarry_core::Value;

use crate::{Error, Result};

/// Names of the built-in surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinMethod {
    /// Remove every matching document
    DeleteAll,
    /// Remove at most one matching document
    DeleteOne,
    /// Apply accumulated updates to every matching document
    UpdateAll,
    /// Apply accumulated updates to the first matching document
    UpdateOne,
    /// Fetch every matching document
    GetAll,
    /// Fetch up to `limit` matching documents
    GetSome,
    /// Fetch the first matching document
    GetOne,
    /// Reduce the matching documents with a caller transform
    Queryable,
    /// Compose a lazy sequence over the matching documents
    QueryableMany,
}

impl BuiltinMethod {
    /// Every built-in, in surface order
    pub const ALL: [BuiltinMethod; 9] = [
        BuiltinMethod::DeleteAll,
        BuiltinMethod::DeleteOne,
        BuiltinMethod::UpdateAll,
        BuiltinMethod::UpdateOne,
        BuiltinMethod::GetAll,
        BuiltinMethod::GetSome,
        BuiltinMethod::GetOne,
        BuiltinMethod::Queryable,
        BuiltinMethod::QueryableMany,
    ];

    /// Method name as invoked on a builder
    pub fn name(self) -> &'static str {
        match self {
            BuiltinMethod::DeleteAll => "delete_all",
            BuiltinMethod::DeleteOne => "delete_one",
            BuiltinMethod::UpdateAll => "update_all",
            BuiltinMethod::UpdateOne => "update_one",
            BuiltinMethod::GetAll => "get_all",
            BuiltinMethod::GetSome => "get_some",
            BuiltinMethod::GetOne => "get_one",
            BuiltinMethod::Queryable => "queryable",
            BuiltinMethod::QueryableMany => "queryable_many",
        }
    }

    /// Look up a built-in by method name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Whether an unfiltered call must be explicitly allowed
    pub fn is_gated(self) -> bool {
        !matches!(
            self,
            BuiltinMethod::GetOne | BuiltinMethod::Queryable | BuiltinMethod::QueryableMany
        )
    }
}

/// A built-in call with decoded arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `delete_all(allow)`
    DeleteAll { allow: bool },
    /// `delete_one(allow)`
    DeleteOne { allow: bool },
    /// `update_all(allow)`
    UpdateAll { allow: bool },
    /// `update_one(allow)`
    UpdateOne { allow: bool },
    /// `get_all(allow)`
    GetAll { allow: bool },
    /// `get_some(limit, allow)`
    GetSome { limit: i64, allow: bool },
    /// `get_one()`
    GetOne,
}

impl Command {
    /// The built-in this command invokes
    pub fn method(&self) -> BuiltinMethod {
        match self {
            Command::DeleteAll { .. } => BuiltinMethod::DeleteAll,
            Command::DeleteOne { .. } => BuiltinMethod::DeleteOne,
            Command::UpdateAll { .. } => BuiltinMethod::UpdateAll,
            Command::UpdateOne { .. } => BuiltinMethod::UpdateOne,
            Command::GetAll { .. } => BuiltinMethod::GetAll,
            Command::GetSome { .. } => BuiltinMethod::GetSome,
            Command::GetOne => BuiltinMethod::GetOne,
        }
    }

    /// Decode dynamically supplied arguments for `method`
    pub fn parse(method: BuiltinMethod, args: &[Value]) -> Result<Command> {
        let invalid = |reason: String| Error::InvalidArguments {
            method: method.name().to_string(),
            reason,
        };

        let command = match method {
            BuiltinMethod::DeleteAll => Command::DeleteAll {
                allow: allow_at(method, args, 0)?,
            },
            BuiltinMethod::DeleteOne => Command::DeleteOne {
                allow: allow_at(method, args, 0)?,
            },
            BuiltinMethod::UpdateAll => Command::UpdateAll {
                allow: allow_at(method, args, 0)?,
            },
            BuiltinMethod::UpdateOne => Command::UpdateOne {
                allow: allow_at(method, args, 0)?,
            },
            BuiltinMethod::GetAll => Command::GetAll {
                allow: allow_at(method, args, 0)?,
            },
            BuiltinMethod::GetSome => {
                let limit = args
                    .first()
                    .ok_or_else(|| invalid("missing limit".to_string()))?;
                let limit = limit
                    .as_i64()
                    .ok_or_else(|| invalid(format!("limit must be an integer, got {}", limit)))?;
                Command::GetSome {
                    limit,
                    allow: allow_at(method, args, 1)?,
                }
            }
            BuiltinMethod::GetOne => Command::GetOne,
            BuiltinMethod::Queryable | BuiltinMethod::QueryableMany => {
                return Err(invalid(
                    "takes a transform closure; call it on the builder directly".to_string(),
                ))
            }
        };

        let accepted = match command {
            Command::GetOne => 0,
            Command::GetSome { .. } => 2,
            _ => 1,
        };
        if args.len() > accepted {
            return Err(invalid(format!(
                "expected at most {} arguments, got {}",
                accepted,
                args.len()
            )));
        }
        Ok(command)
    }
}

/// The optional `allow` flag at `index`, defaulting to `false`
fn allow_at(method: BuiltinMethod, args: &[Value], index: usize) -> Result<bool> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(allow)) => Ok(*allow),
        Some(other) => Err(Error::InvalidArguments {
            method: method.name().to_string(),
            reason: format!("allow_without_criteria must be a bool, got {}", other),
        }),
    }
}
