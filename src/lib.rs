//! Quarry - convention-bound query builders for document stores
//!
//! Declare a narrow query contract, register it against a set of naming
//! conventions, and chain its methods; no filter construction code needed.
//!
//! # Quick Start
//!
//! ```ignore
//! use quarry::*;
//!
//! query_contract! {
//!     pub struct CompanyQuery for Company {
//!         fn by_name(name: &str);
//!     }
//! }
//!
//! let registry = Arc::new(
//!     ConventionRegistry::builder()
//!         .contract::<CompanyQuery>()
//!         .convention(ByConvention)
//!         .build()?,
//! );
//! let repo: Repository<CompanyQuery> = MemoryRepositoryProvider::new()
//!     .create_repository(RepositoryConfig::new("testdata", "companies"), registry)?;
//!
//! let companies = repo.builder()?.by_name("Test One")?.get_all(false)?;
//! ```
//!
//! # Architecture
//!
//! Registration binds every custom contract method to a convention through
//! the [`ConventionRegistry`]. Each builder owns a [`Dispatcher`] and a
//! private [`FragmentAccumulator`]; terminal calls run through the
//! [`QueryExecutor`], which enforces the safety gate and the call wrapper.
//!
//! Storage internals are not exposed beyond the [`DocumentStore`] trait and
//! the in-memory collections.

// Re-export the public API from quarry-executor
pub use quarry_executor::*;
