//! Request path resolution
//!
//! Splits a request path into the collection it addresses and, when the
//! final segment is spelled like an identifier, the document inside it.
//! The classification is purely syntactic and never touches storage.

use std::fmt;

use crate::types::DocumentId;

/// Slash-separated location of a collection, relative to the storage root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: Vec<String>,
}

/// Result of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Collection the request addresses
    pub collection: CollectionPath,
    /// Document identifier, when the last segment is one
    pub id: Option<DocumentId>,
}

impl CollectionPath {
    /// Build a collection path from already-decoded segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }

    /// The storage root
    pub fn root() -> Self {
        Self::default()
    }

    /// Decoded path segments, outermost first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the storage root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl ResolvedPath {
    /// Text form used in log lines and not-found messages
    pub fn describe(&self) -> String {
        match &self.id {
            Some(id) if self.collection.is_root() => id.to_string(),
            Some(id) => format!("{}/{}", self.collection, id),
            None => self.collection.to_string(),
        }
    }
}

/// Percent-decode one segment. Undecodable segments, and segments that
/// would decode to a separator or NUL, are kept verbatim.
fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) if !decoded.contains(|c: char| matches!(c, '/' | '\\' | '\0')) => decoded.into_owned(),
        _ => raw.to_string(),
    }
}

/// Resolve a request path into a collection and optional identifier
pub fn resolve(request_path: &str) -> ResolvedPath {
    let mut segments: Vec<String> = request_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        // Dot segments could climb out of the storage root
        .filter(|s| s != "." && s != "..")
        .collect();

    let id = segments.last().and_then(|last| last.parse::<DocumentId>().ok());
    if id.is_some() {
        segments.pop();
    }

    ResolvedPath { collection: CollectionPath { segments }, id }
}
