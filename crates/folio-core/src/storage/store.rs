//! Document lifecycle over a storage backend

use crate::storage::{CollectionListing, CollectionPath, DocumentStorage};
use crate::types::{timestamp_now, Document, DocumentId, Error, Fields, PutSemantics, Result};
use crate::{log_debug, log_info};

/// Document store
///
/// Owns the translation between request bodies and persisted documents:
/// identifier and timestamp assignment, PUT/PATCH merge rules and
/// not-found detection. The backend `S` only moves bytes.
pub struct Store<S: DocumentStorage> {
    /// Persistence backend
    storage: S,
    /// How PUT combines the body with the stored document
    put_semantics: PutSemantics,
}

fn not_found(collection: &CollectionPath, id: &DocumentId) -> Error {
    if collection.is_root() {
        Error::not_found(id.to_string())
    } else {
        Error::not_found(format!("{}/{}", collection, id))
    }
}

impl<S: DocumentStorage> Store<S> {
    /// Create a store over `storage`
    pub fn new(storage: S, put_semantics: PutSemantics) -> Self {
        Self { storage, put_semantics }
    }

    /// Access the backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Configured PUT semantics
    pub fn put_semantics(&self) -> PutSemantics {
        self.put_semantics
    }

    /// Inspect and load a collection
    pub fn list_collection(&self, collection: &CollectionPath) -> Result<CollectionListing> {
        self.storage.scan(collection)
    }

    /// Fetch one document
    pub fn get_document(&self, collection: &CollectionPath, id: &DocumentId) -> Result<Document> {
        self.storage
            .read(collection, id)?
            .ok_or_else(|| not_found(collection, id))
    }

    /// Create a document under a freshly generated identifier
    pub fn create_document(&self, collection: &CollectionPath, id: &DocumentId, body: Fields) -> Result<Document> {
        let document = Document::created(id, body, &timestamp_now());
        self.storage.write(collection, id, &document)?;
        log_info!("Created document {}/{}", collection, id);
        Ok(document)
    }

    /// Replace a document according to the configured PUT semantics
    pub fn replace_document(&self, collection: &CollectionPath, id: &DocumentId, body: Fields) -> Result<Document> {
        let previous = self.get_document(collection, id)?;
        let document = previous.replaced(id, body, &timestamp_now(), self.put_semantics);
        self.storage.write(collection, id, &document)?;
        log_debug!("Replaced document {}/{} ({:?})", collection, id, self.put_semantics);
        Ok(document)
    }

    /// Merge `body` into a document
    pub fn patch_document(&self, collection: &CollectionPath, id: &DocumentId, body: Fields) -> Result<Document> {
        let previous = self.get_document(collection, id)?;
        let document = previous.patched(id, body, &timestamp_now());
        self.storage.write(collection, id, &document)?;
        log_debug!("Patched document {}/{}", collection, id);
        Ok(document)
    }

    /// Permanently remove a document
    pub fn delete_document(&self, collection: &CollectionPath, id: &DocumentId) -> Result<()> {
        if !self.storage.remove(collection, id)? {
            return Err(not_found(collection, id));
        }
        log_info!("Deleted document {}/{}", collection, id);
        Ok(())
    }
}
