//! # Folio Server
//!
//! HTTP binding for the Folio document store. Every request is forwarded to
//! the core dispatcher; this crate only adds transport concerns such as
//! middleware, status mapping and shutdown.

#![warn(missing_docs)]

/// HTTP API handlers and routing
pub mod api;

/// Logging setup
pub mod telemetry;

// Re-export core functionality
pub use folio_core::*;
