//! Error types and handling for Folio
//!
//! Expected request outcomes (`NotFound`, `MissingIdentifier`,
//! `InvalidBody`, `RouteNotFound`) are ordinary variants that the transport
//! maps to 4xx responses. Storage failures carry their full detail for
//! logging; the transport never forwards that detail to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Folio
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Target document absent
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A write that needs an identifier was sent to a bare collection path
    #[error("An identifier is required for {method} requests")]
    MissingIdentifier {
        /// Method of the offending request
        method: String,
    },

    /// Request body is not a JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// No operation matches the method and path
    #[error("Route not found: {method} {path}")]
    RouteNotFound {
        /// Request method
        method: String,
        /// Request path
        path: String,
    },

    /// Persistence layer failure unrelated to simple absence
    #[error("Storage unavailable: {0}")]
    Storage(#[from] StorageError),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("I/O failed on {path:?}: {source}")]
    Io {
        /// Location being accessed
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A persisted document could not be decoded
    #[error("Data corruption detected in {path:?}: {reason}")]
    Corruption {
        /// Location of the damaged document
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// A document could not be encoded for persistence
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    /// Wrap an I/O error with the location it happened at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io { path: path.into(), source }
    }

    /// Create a corruption error
    pub fn corruption(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StorageError::Corruption { path: path.into(), reason: reason.into() }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a missing identifier error
    pub fn missing_identifier(method: impl Into<String>) -> Self {
        Self::MissingIdentifier { method: method.into() }
    }

    /// Create an invalid body error
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }

    /// Create a route not found error
    pub fn route_not_found(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::RouteNotFound { method: method.into(), path: path.into() }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::MissingIdentifier { .. }
                | Error::InvalidBody(_)
                | Error::RouteNotFound { .. }
        )
    }

    /// Check if this is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::Internal(_) | Error::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Error::not_found("items/abc").is_client_error());
        assert!(Error::missing_identifier("PUT").is_client_error());
        assert!(Error::route_not_found("OPTIONS", "/items").is_client_error());
        assert!(Error::invalid_body("array").is_client_error());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let storage: Error = StorageError::io("/data/items", io).into();
        assert!(storage.is_server_error());
        assert!(!storage.is_client_error());
    }

    #[test]
    fn test_storage_error_keeps_detail() {
        let err = StorageError::corruption("/data/items/x.json", "expected an object");
        let msg = Error::from(err).to_string();
        assert!(msg.contains("x.json"));
        assert!(msg.contains("expected an object"));
    }
}
