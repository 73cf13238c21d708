//! Storage layer for Quarry
//!
//! This crate defines the store collaborator the query layer executes
//! against, plus an in-process implementation:
//! - DocumentStore: find / find_one / remove / update / cursor / save
//! - WriteConcern: safe-write setting forwarded unmodified to the store
//! - MemoryStore: RwLock-guarded in-memory collection
//! - CollectionRegistry: named collections standing in for a server connection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod memory;
pub mod registry;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{to_document, MemoryStore};
pub use registry::CollectionRegistry;
pub use traits::{
    DocumentCursor, DocumentStore, FindOptions, RemoveOptions, UpdateOptions, WriteConcern,
    WriteResult,
};
