//! # Folio Core
//!
//! Path resolution, document storage and query evaluation for the Folio
//! schema-less document server. Any request path maps to a collection
//! directory; JSON documents inside it are addressed by generated
//! identifiers.
//!
//! This crate is transport-agnostic. The HTTP binding lives in
//! `folio-server` and calls [`router::dispatch`] once per request.

#![warn(missing_docs)]

/// Ambient services: configuration, logging, application state
pub mod core;

/// System constants
pub mod constants;

/// Type definitions shared by every layer
pub mod types;

/// Path resolution and document storage backends
pub mod storage;

/// Filtering, sorting and pagination of listed documents
pub mod query;

/// Per-request orchestration
pub mod router;

// Re-export commonly used items
pub use types::{Document, DocumentId, Error, Result, StorageError};
pub use storage::{DocumentStorage, FileStorage, MemoryStorage, Store};
pub use router::{dispatch, Method, Request, Response};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
