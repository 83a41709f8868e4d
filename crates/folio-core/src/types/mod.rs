//! Type definitions for Folio
//!
//! This module contains all type definitions organized by category.

/// Identifier types
pub mod ids;
/// Document representation and merge rules
pub mod document;
/// Field values as read by filters
pub mod value;
/// System-wide error types
pub mod error;

// Re-export commonly used types for convenience
pub use ids::{DocumentId, InvalidDocumentId};
pub use document::{timestamp_now, Document, Fields, PutSemantics};
pub use value::FieldValue;
pub use error::{Error, Result, StorageError};
