//! The store collaborator contract
//!
//! The query layer never talks to a concrete database. It compiles a filter
//! and an update and hands them to a [`DocumentStore`], which owns matching,
//! mutation and any timeout or retry policy.

use crate::error::StoreResult;
use quarry_core::{Document, Filter, Update};
use serde::{Deserialize, Serialize};

/// Lazy sequence of documents returned by [`DocumentStore::cursor`]
pub type DocumentCursor = Box<dyn Iterator<Item = Document> + Send>;

/// Acknowledgement level for writes
///
/// The query layer forwards this setting unmodified; only the store
/// interprets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteConcern {
    /// Fire and forget
    Unacknowledged,
    /// Wait for the store to apply the write
    #[default]
    Acknowledged,
    /// Wait for the write to reach the journal
    Journaled,
}

/// Outcome of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResult {
    /// Whether the store accepted the write
    pub ok: bool,
    /// Number of documents affected
    pub affected: u64,
}

impl WriteResult {
    /// Successful write touching `affected` documents
    pub fn ok(affected: u64) -> Self {
        Self { ok: true, affected }
    }
}

/// Options for [`DocumentStore::find`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Maximum number of documents to return
    pub limit: Option<usize>,
}

/// Options for [`DocumentStore::remove`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Remove at most one document
    pub single: bool,
    /// Acknowledgement level
    pub write_concern: WriteConcern,
}

/// Options for [`DocumentStore::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Update every matching document rather than the first
    pub multi: bool,
    /// Acknowledgement level
    pub write_concern: WriteConcern,
}

/// A collection of documents
///
/// A `None` filter selects the whole collection. Implementations must be
/// safe to share between builder instances on different threads.
pub trait DocumentStore: Send + Sync {
    /// Collection name, used in diagnostics
    fn name(&self) -> &str;

    /// Fetch matching documents in storage order
    fn find(&self, filter: Option<&Filter>, options: FindOptions) -> StoreResult<Vec<Document>>;

    /// Fetch the first matching document
    fn find_one(&self, filter: Option<&Filter>) -> StoreResult<Option<Document>>;

    /// Remove matching documents
    fn remove(&self, filter: Option<&Filter>, options: RemoveOptions) -> StoreResult<WriteResult>;

    /// Apply `update` to matching documents
    fn update(
        &self,
        filter: Option<&Filter>,
        update: &Update,
        options: UpdateOptions,
    ) -> StoreResult<WriteResult>;

    /// Open a lazy cursor over matching documents
    fn cursor(&self, filter: Option<&Filter>) -> StoreResult<DocumentCursor>;

    /// Insert a document, or replace the one sharing its `id`
    fn save(&self, document: Document, write_concern: WriteConcern) -> StoreResult<WriteResult>;

    /// Remove every document and the collection itself
    fn drop_collection(&self) -> StoreResult<()>;
}
