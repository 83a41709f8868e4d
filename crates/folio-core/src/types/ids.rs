//! Document identifiers
//!
//! A [`DocumentId`] is a random 128-bit value rendered in the canonical
//! 8-4-4-4-12 lowercase hyphenated hexadecimal form. Parsing accepts only
//! that exact shape (hex digits in either case); the braced, URN and
//! unhyphenated forms that `uuid` would otherwise accept are rejected so a
//! path segment is classified purely by its spelling.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Length of the canonical text form
pub const ID_TEXT_LENGTH: usize = 36;

/// Byte offsets of the hyphens in the canonical text form
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Globally unique document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(Uuid);

/// Error returned when text is not a canonical identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a canonical identifier: {0:?}")]
pub struct InvalidDocumentId(pub String);

impl DocumentId {
    /// Generate a new random identifier (uniform random bits, not time based)
    pub fn generate() -> Self {
        DocumentId(Uuid::new_v4())
    }

    /// Check whether `text` has the canonical 8-4-4-4-12 hex shape
    pub fn is_canonical(text: &str) -> bool {
        let bytes = text.as_bytes();
        if bytes.len() != ID_TEXT_LENGTH {
            return false;
        }
        bytes.iter().enumerate().all(|(i, b)| {
            if HYPHEN_POSITIONS.contains(&i) {
                *b == b'-'
            } else {
                b.is_ascii_hexdigit()
            }
        })
    }

    /// Access the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Uuid's Display is already the lowercase hyphenated form
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_canonical(s) {
            return Err(InvalidDocumentId(s.to_string()));
        }
        Uuid::parse_str(s)
            .map(DocumentId)
            .map_err(|_| InvalidDocumentId(s.to_string()))
    }
}

impl From<Uuid> for DocumentId {
    fn from(uuid: Uuid) -> Self {
        DocumentId(uuid)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
