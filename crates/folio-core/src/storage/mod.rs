//! Storage layer for Folio
//!
//! This module provides the storage abstraction layer that enables different
//! storage backends while keeping the document operations in one place.
//!
//! Backends implement the small [`DocumentStorage`] trait (scan, read,
//! write, remove). [`Store`] layers the document lifecycle on top of any
//! backend: identifier assignment, timestamps, merge rules and not-found
//! handling.
//!
//! There is no locking. Two writers racing on the same document both
//! succeed and the last rename wins; a PATCH or PUT that reads, merges and
//! writes can therefore lose an update made between its read and its
//! write.

use crate::types::{Document, DocumentId, Result};

/// What a collection location turned out to hold
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionListing {
    /// Nothing exists at the location
    Missing,
    /// The location is a plain file that is not a document
    NotADirectory,
    /// The location is a single persisted document
    Singleton(Document),
    /// The collection's documents, in identifier order
    Populated(Vec<Document>),
}

/// Trait for document storage implementations
///
/// Implementations only move documents in and out of persistence. Every
/// document they return carries an `id` field matching the identifier it
/// is stored under.
pub trait DocumentStorage: Send + Sync {
    /// Inspect a collection location and load its documents
    fn scan(&self, collection: &CollectionPath) -> Result<CollectionListing>;

    /// Load one document, `None` if it does not exist
    fn read(&self, collection: &CollectionPath, id: &DocumentId) -> Result<Option<Document>>;

    /// Persist a document, creating the collection if needed
    fn write(&self, collection: &CollectionPath, id: &DocumentId, document: &Document) -> Result<()>;

    /// Remove a document. Returns `false` if it did not exist
    fn remove(&self, collection: &CollectionPath, id: &DocumentId) -> Result<bool>;
}

/// Request path resolution
pub mod path;

/// File-backed storage (one JSON file per document)
pub mod file;

/// In-memory storage
pub mod memory;

/// Document lifecycle over a storage backend
pub mod store;

/// Re-export main storage types
pub use path::{resolve, CollectionPath, ResolvedPath};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use store::Store;

/// Helper trait that combines all requirements for storage implementations
/// This cleans up generic bounds throughout the codebase
pub trait StorageImpl: DocumentStorage + Send + Sync + 'static {}

/// Blanket implementation for any type that meets the requirements
impl<T> StorageImpl for T where T: DocumentStorage + Send + Sync + 'static {}
