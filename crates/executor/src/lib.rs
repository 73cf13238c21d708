//! # Quarry Executor
//!
//! Convention-bound query builders over a document store.
//!
//! An application declares narrow query contracts (methods such as
//! `by_name(x)` or `child_companies_contains(y)`) and never writes filter
//! construction code. At registration every custom method is bound to one
//! pluggable [`Convention`]; at call time fluent methods accumulate filter
//! and update fragments in a per-builder session and terminal methods
//! compile them and run one store operation.
//!
//! ## Quick Start
//!
//! ```text
//! use quarry_executor::*;
//!
//! query_contract! {
//!     pub struct CompanyQuery for Company {
//!         fn by_name(name: &str);
//!         fn child_companies_contains(id: i64);
//!     }
//! }
//!
//! let registry = Arc::new(
//!     ConventionRegistry::builder()
//!         .contract::<CompanyQuery>()
//!         .convention(ByConvention)
//!         .convention(ContainsConvention)
//!         .build()?,
//! );
//!
//! let repo: Repository<CompanyQuery> = MemoryRepositoryProvider::new()
//!     .create_repository(RepositoryConfig::new("testdata", "companies"), registry)?;
//!
//! let found = repo.builder()?.by_name("Test One")?.get_all(false)?;
//! ```
//!
//! ## Terminal Operations
//!
//! | Method | Returns | Gated |
//! |--------|---------|-------|
//! | `delete_all(allow)` | removed count | yes |
//! | `delete_one(allow)` | acknowledgement | yes |
//! | `update_all(allow)` | updated count | yes |
//! | `update_one(allow)` | acknowledgement | yes |
//! | `get_all(allow)` | models | yes |
//! | `get_some(limit, allow)` | at most `limit` models | yes |
//! | `get_one()` | first model | no |
//! | `queryable(f)` / `queryable_many(f)` | `f`'s result | no |
//!
//! A gated call on a builder with no filter fragments fails with
//! [`Error::UnsafeOperation`] unless `allow` is `true`.

#![warn(missing_docs)]

mod builder;
mod command;
mod config;
mod convention;
mod conventions;
mod dispatcher;
mod error;
mod executor;
mod metadata;
mod output;
mod queryable;
mod registry;
mod repository;
mod session;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use builder::{BuilderFactory, Contract, QueryBuilder};
pub use command::{BuiltinMethod, Command};
pub use config::{CallWrapper, RepositoryConfig};
pub use convention::{Convention, ConventionError, Invocation};
pub use conventions::{ByConvention, ContainsConvention, SetConvention};
pub use dispatcher::Dispatcher;
pub use error::Error;
pub use executor::QueryExecutor;
pub use metadata::contract_metadata;
pub use output::Output;
pub use queryable::Queryable;
pub use registry::{ConventionRegistry, RegistryBuilder};
pub use repository::{MemoryRepositoryProvider, Repository, RepositoryProvider, MEMORY_SCHEME};
pub use session::FragmentAccumulator;

#[doc(hidden)]
pub use builder::__to_arg;

// Re-export the model layer so contracts need no direct dependency on it
pub use quarry_core::{
    json, ContractDescriptor, DescriptorError, Document, FieldKind, FieldType, Filter,
    MethodDescriptor, Model, ModelSchema, ReturnKind, Update, Value,
};
pub use quarry_storage::{
    CollectionRegistry, DocumentStore, MemoryStore, StoreError, WriteConcern, WriteResult,
};

/// Result type for query operations
pub type Result<T> = std::result::Result<T, Error>;
