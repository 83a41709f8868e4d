//! Simple in-memory storage implementation using DashMap
//!
//! Documents live in a per-collection ordered map, so listings come back
//! in identifier order like the file backend's filename order. A
//! collection is dropped once its last document is removed, so an emptied
//! collection lists as missing. Nothing survives a restart.

use std::collections::BTreeMap;

use dashmap::DashMap;

use crate::storage::{CollectionListing, CollectionPath, DocumentStorage};
use crate::types::{Document, DocumentId, Result};

/// In-memory storage keyed by collection path
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Map of collection path to its documents
    collections: DashMap<CollectionPath, BTreeMap<DocumentId, Document>>,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collections currently holding documents
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Total number of documents across all collections
    pub fn document_count(&self) -> usize {
        self.collections.iter().map(|entry| entry.value().len()).sum()
    }
}

impl DocumentStorage for MemoryStorage {
    fn scan(&self, collection: &CollectionPath) -> Result<CollectionListing> {
        Ok(match self.collections.get(collection) {
            Some(documents) => CollectionListing::Populated(documents.values().cloned().collect()),
            None => CollectionListing::Missing,
        })
    }

    fn read(&self, collection: &CollectionPath, id: &DocumentId) -> Result<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id).cloned()))
    }

    fn write(&self, collection: &CollectionPath, id: &DocumentId, document: &Document) -> Result<()> {
        let mut stored = document.clone();
        stored.set_id(id);
        self.collections
            .entry(collection.clone())
            .or_default()
            .insert(*id, stored);
        Ok(())
    }

    fn remove(&self, collection: &CollectionPath, id: &DocumentId) -> Result<bool> {
        let Some(mut documents) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let removed = documents.remove(id).is_some();
        let emptied = documents.is_empty();
        // Release the shard lock before removing the entry
        drop(documents);

        // Emptied collections are forgotten so the map only holds live paths
        if emptied {
            self.collections.remove_if(collection, |_, documents| documents.is_empty());
        }
        Ok(removed)
    }
}
