//! In-memory document collection
//!
//! `MemoryStore` keeps documents in insertion order behind a
//! `parking_lot::RwLock`. Reads take the shared lock; every write holds the
//! exclusive lock for its whole duration, so a multi-document update is
//! atomic with respect to concurrent readers.

use crate::error::{StoreError, StoreResult};
use crate::traits::{
    DocumentCursor, DocumentStore, FindOptions, RemoveOptions, UpdateOptions, WriteConcern,
    WriteResult,
};
use parking_lot::RwLock;
use quarry_core::document::{get_at_path, values_equal};
use quarry_core::{Document, Filter, Update, ID_FIELD};
use tracing::debug;

/// A single in-process collection
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Whether the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Copy of every stored document, in storage order
    pub fn snapshot(&self) -> Vec<Document> {
        self.documents.read().clone()
    }
}

fn selects(filter: Option<&Filter>, doc: &Document) -> bool {
    filter.map_or(true, |f| f.matches(doc))
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn find(&self, filter: Option<&Filter>, options: FindOptions) -> StoreResult<Vec<Document>> {
        let documents = self.documents.read();
        let matching = documents.iter().filter(|doc| selects(filter, doc));
        let found: Vec<Document> = match options.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        };
        debug!(target: "quarry::store", collection = %self.name, found = found.len(), "find");
        Ok(found)
    }

    fn find_one(&self, filter: Option<&Filter>) -> StoreResult<Option<Document>> {
        let documents = self.documents.read();
        Ok(documents.iter().find(|doc| selects(filter, doc)).cloned())
    }

    fn remove(&self, filter: Option<&Filter>, options: RemoveOptions) -> StoreResult<WriteResult> {
        let mut documents = self.documents.write();
        let before = documents.len();
        if options.single {
            if let Some(pos) = documents.iter().position(|doc| selects(filter, doc)) {
                documents.remove(pos);
            }
        } else {
            documents.retain(|doc| !selects(filter, doc));
        }
        let affected = (before - documents.len()) as u64;
        debug!(
            target: "quarry::store",
            collection = %self.name,
            affected,
            write_concern = ?options.write_concern,
            "remove"
        );
        Ok(WriteResult::ok(affected))
    }

    fn update(
        &self,
        filter: Option<&Filter>,
        update: &Update,
        options: UpdateOptions,
    ) -> StoreResult<WriteResult> {
        let mut documents = self.documents.write();

        // Apply to copies first so a failing operator leaves nothing half-written.
        let mut staged = Vec::new();
        for (pos, doc) in documents.iter().enumerate() {
            if !selects(filter, doc) {
                continue;
            }
            let mut next = doc.clone();
            update.apply(&mut next)?;
            staged.push((pos, next));
            if !options.multi {
                break;
            }
        }

        let affected = staged.len() as u64;
        for (pos, next) in staged {
            documents[pos] = next;
        }
        debug!(
            target: "quarry::store",
            collection = %self.name,
            affected,
            write_concern = ?options.write_concern,
            "update"
        );
        Ok(WriteResult::ok(affected))
    }

    fn cursor(&self, filter: Option<&Filter>) -> StoreResult<DocumentCursor> {
        let snapshot: Vec<Document> = self
            .documents
            .read()
            .iter()
            .filter(|doc| selects(filter, doc))
            .cloned()
            .collect();
        Ok(Box::new(snapshot.into_iter()))
    }

    fn save(&self, document: Document, write_concern: WriteConcern) -> StoreResult<WriteResult> {
        let mut documents = self.documents.write();
        let existing = document.get(ID_FIELD).and_then(|id| {
            if id.is_null() {
                return None;
            }
            documents
                .iter()
                .position(|doc| get_at_path(doc, ID_FIELD).is_some_and(|other| values_equal(other, id)))
        });
        match existing {
            Some(pos) => documents[pos] = document,
            None => documents.push(document),
        }
        debug!(target: "quarry::store", collection = %self.name, ?write_concern, "save");
        Ok(WriteResult::ok(1))
    }

    fn drop_collection(&self) -> StoreResult<()> {
        self.documents.write().clear();
        Ok(())
    }
}

/// Convert a serialized value into a storable document
pub fn to_document(value: serde_json::Value) -> StoreResult<Document> {
    match value {
        serde_json::Value::Object(obj) => Ok(obj),
        other => Err(StoreError::InvalidDocument {
            reason: format!("expected an object, got {}", other),
        }),
    }
}
