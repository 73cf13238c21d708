//! The QueryExecutor - terminal operations against the store.
//!
//! The executor compiles a builder's accumulated fragments and runs one
//! store operation. It holds a store handle and the repository config but
//! no per-call state; the session is passed in by the caller.
//!
//! # Ordering of checks
//!
//! 1. `update_*` with no update fragments returns immediately (`0`/`false`)
//! 2. The safety gate rejects gated operations on an empty filter unless
//!    `allow` is set
//! 3. The store call runs inside the configured [`CallWrapper`] exactly once
//!
//! Nothing reaches the store, and the wrapper is not invoked, unless steps
//! 1 and 2 pass.
//!
//! [`CallWrapper`]: crate::CallWrapper

use std::sync::Arc;

use quarry_core::{Document, Filter, Model};
use quarry_storage::{DocumentStore, FindOptions, RemoveOptions, UpdateOptions};
use tracing::{debug, warn};

use crate::command::{BuiltinMethod, Command};
use crate::output::decode;
use crate::queryable::Queryable;
use crate::session::FragmentAccumulator;
use crate::{Error, Output, RepositoryConfig, Result};

/// Runs terminal operations for one builder.
///
/// # Thread Safety
///
/// QueryExecutor is `Send + Sync`; the store and config are shared `Arc`s.
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn DocumentStore>,
    config: Arc<RepositoryConfig>,
}

impl QueryExecutor {
    /// Create an executor over `store`
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<RepositoryConfig>) -> Self {
        Self { store, config }
    }

    /// The store handle
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Execute a built-in command against `session`
    pub fn execute(&self, command: Command, session: &FragmentAccumulator) -> Result<Output> {
        match command {
            Command::DeleteAll { allow } => self.delete_all(session, allow).map(Output::Count),
            Command::DeleteOne { allow } => self.delete_one(session, allow).map(Output::Bool),
            Command::UpdateAll { allow } => self.update_all(session, allow).map(Output::Count),
            Command::UpdateOne { allow } => self.update_one(session, allow).map(Output::Bool),
            Command::GetAll { allow } => self.get_all(session, allow).map(Output::Documents),
            Command::GetSome { limit, allow } => {
                self.get_some(session, limit, allow).map(Output::Documents)
            }
            Command::GetOne => self.get_one(session).map(Output::Document),
        }
    }

    /// Remove every matching document; returns the number removed
    pub fn delete_all(&self, session: &FragmentAccumulator, allow: bool) -> Result<u64> {
        let options = RemoveOptions {
            single: false,
            write_concern: self.config.write_concern,
        };
        self.evaluate(session, BuiltinMethod::DeleteAll, allow, |store, filter| {
            Ok(store.remove(filter, options)?.affected)
        })
    }

    /// Remove at most one matching document; returns the store's acknowledgement
    pub fn delete_one(&self, session: &FragmentAccumulator, allow: bool) -> Result<bool> {
        let options = RemoveOptions {
            single: true,
            write_concern: self.config.write_concern,
        };
        self.evaluate(session, BuiltinMethod::DeleteOne, allow, |store, filter| {
            Ok(store.remove(filter, options)?.ok)
        })
    }

    /// Apply accumulated updates to every matching document
    ///
    /// Returns `0` without touching the store if no update fragments were
    /// accumulated.
    pub fn update_all(&self, session: &FragmentAccumulator, allow: bool) -> Result<u64> {
        let Some(update) = session.compiled_update() else {
            return Ok(0);
        };
        let options = UpdateOptions {
            multi: true,
            write_concern: self.config.write_concern,
        };
        self.evaluate(session, BuiltinMethod::UpdateAll, allow, |store, filter| {
            Ok(store.update(filter, &update, options)?.affected)
        })
    }

    /// Apply accumulated updates to the first matching document
    ///
    /// Returns `false` without touching the store if no update fragments
    /// were accumulated.
    pub fn update_one(&self, session: &FragmentAccumulator, allow: bool) -> Result<bool> {
        let Some(update) = session.compiled_update() else {
            return Ok(false);
        };
        let options = UpdateOptions {
            multi: false,
            write_concern: self.config.write_concern,
        };
        self.evaluate(session, BuiltinMethod::UpdateOne, allow, |store, filter| {
            Ok(store.update(filter, &update, options)?.ok)
        })
    }

    /// Fetch every matching document
    pub fn get_all(&self, session: &FragmentAccumulator, allow: bool) -> Result<Vec<Document>> {
        self.evaluate(session, BuiltinMethod::GetAll, allow, |store, filter| {
            Ok(store.find(filter, FindOptions::default())?)
        })
    }

    /// Fetch at most `limit` matching documents
    ///
    /// A `limit` below 1 behaves exactly as [`get_all`](Self::get_all).
    pub fn get_some(
        &self,
        session: &FragmentAccumulator,
        limit: i64,
        allow: bool,
    ) -> Result<Vec<Document>> {
        if limit < 1 {
            return self.get_all(session, allow);
        }
        let options = FindOptions {
            limit: Some(usize::try_from(limit).unwrap_or(usize::MAX)),
        };
        self.evaluate(session, BuiltinMethod::GetSome, allow, |store, filter| {
            Ok(store.find(filter, options)?)
        })
    }

    /// Fetch the first matching document; never gated
    pub fn get_one(&self, session: &FragmentAccumulator) -> Result<Option<Document>> {
        self.evaluate(session, BuiltinMethod::GetOne, true, |store, filter| {
            Ok(store.find_one(filter)?)
        })
    }

    /// Hand the matching models to `transform` and return its result
    ///
    /// The fetch and the transform run inside the wrapper once; never gated.
    pub fn queryable<M, T, F>(&self, session: &FragmentAccumulator, transform: F) -> Result<T>
    where
        M: Model,
        F: FnOnce(Queryable<M>) -> T,
    {
        self.evaluate(session, BuiltinMethod::Queryable, true, |store, filter| {
            let items = store
                .cursor(filter)?
                .map(decode::<M>)
                .collect::<Result<Vec<M>>>()?;
            Ok(transform(Queryable::new(items)))
        })
    }

    /// Hand the matching models to `transform` and return the sequence it builds
    ///
    /// Only the fetch and the call to `transform` are wrapped; iterating
    /// the returned sequence afterwards runs outside the wrapper.
    pub fn queryable_many<M, I, F>(&self, session: &FragmentAccumulator, transform: F) -> Result<I>
    where
        M: Model,
        I: Iterator<Item = M>,
        F: FnOnce(Queryable<M>) -> I,
    {
        self.evaluate(session, BuiltinMethod::QueryableMany, true, |store, filter| {
            let items = store
                .cursor(filter)?
                .map(decode::<M>)
                .collect::<Result<Vec<M>>>()?;
            Ok(transform(Queryable::new(items)))
        })
    }

    /// Apply the safety gate, compile the filter and run `op` in the wrapper
    fn evaluate<T, F>(
        &self,
        session: &FragmentAccumulator,
        method: BuiltinMethod,
        allow: bool,
        op: F,
    ) -> Result<T>
    where
        F: FnOnce(&dyn DocumentStore, Option<&Filter>) -> Result<T>,
    {
        if method.is_gated() && !allow && !session.has_filters() {
            warn!(
                target: "quarry::executor",
                operation = method.name(),
                collection = self.store.name(),
                "Rejected unfiltered operation"
            );
            return Err(Error::UnsafeOperation {
                operation: method.name(),
            });
        }

        let filter = session.compiled_filter();
        debug!(
            target: "quarry::executor",
            operation = method.name(),
            collection = self.store.name(),
            fragments = session.filters().len(),
            "Executing"
        );

        let store = self.store.as_ref();
        self.wrapped(method, || op(store, filter.as_ref()))
    }

    /// Run `op` inside the configured wrapper
    ///
    /// Fails with `WrapperSkipped` if the wrapper returns without calling
    /// the thunk. A second call of the thunk is a no-op.
    fn wrapped<T>(&self, method: BuiltinMethod, op: impl FnOnce() -> Result<T>) -> Result<T> {
        let mut op = Some(op);
        let mut result = None;
        self.config.wrapper.call(&mut || {
            if let Some(op) = op.take() {
                result = Some(op());
            }
        });
        result.unwrap_or(Err(Error::WrapperSkipped {
            operation: method.name(),
        }))
    }
}
