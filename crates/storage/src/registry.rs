//! Collection registry for in-memory databases
//!
//! The registry hands out shared [`MemoryStore`] handles keyed by database
//! and collection name, standing in for a server connection. Asking for the
//! same pair twice returns the same collection.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let server = CollectionRegistry::new();
//! let companies = server.collection("testdata", "companies");
//! companies.save(doc, WriteConcern::Acknowledged)?;
//!
//! // Same handle, same documents
//! assert_eq!(server.collection("testdata", "companies").len(), 1);
//! ```

use crate::memory::MemoryStore;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of in-memory collections
///
/// Safe to share across threads; concurrent first access to one collection
/// creates it exactly once.
#[derive(Debug, Default)]
pub struct CollectionRegistry {
    /// Collections by (database, collection)
    collections: DashMap<(String, String), Arc<MemoryStore>>,
}

impl CollectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a collection
    pub fn collection(&self, database: &str, collection: &str) -> Arc<MemoryStore> {
        self.collections
            .entry((database.to_string(), collection.to_string()))
            .or_insert_with(|| {
                debug!(target: "quarry::store", database, collection, "Creating collection");
                Arc::new(MemoryStore::new(collection))
            })
            .clone()
    }

    /// Check if a collection exists
    pub fn contains(&self, database: &str, collection: &str) -> bool {
        self.collections
            .contains_key(&(database.to_string(), collection.to_string()))
    }

    /// Forget a collection, returning its handle if it existed
    ///
    /// Existing handles keep working but are no longer reachable through
    /// the registry.
    pub fn remove(&self, database: &str, collection: &str) -> Option<Arc<MemoryStore>> {
        self.collections
            .remove(&(database.to_string(), collection.to_string()))
            .map(|(_, store)| store)
    }

    /// Sorted collection names in a database
    pub fn collection_names(&self, database: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .filter(|entry| entry.key().0 == database)
            .map(|entry| entry.key().1.clone())
            .collect();
        names.sort();
        names
    }

    /// Get the number of registered collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
