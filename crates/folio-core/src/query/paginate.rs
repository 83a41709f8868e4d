//! Offset and limit handling

use crate::types::value::parse_number;

/// Window applied after filtering and sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    /// Leading documents to skip
    pub offset: usize,
    /// Maximum documents to return, `None` for no cap
    pub limit: Option<usize>,
}

/// Parse a count parameter. Integers are taken as-is, finite decimals are
/// truncated toward zero, anything else is `None`.
pub fn parse_count(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    parse_number(trimmed).map(|n| n.trunc() as i64)
}

impl Pagination {
    /// Build from the raw `_limit` and `_offset` parameters. Returns `None`
    /// when neither is present.
    ///
    /// A limit that is unparseable or not positive means "no cap". A
    /// negative or unparseable offset is treated as zero.
    pub fn from_params(limit: Option<&str>, offset: Option<&str>) -> Option<Self> {
        if limit.is_none() && offset.is_none() {
            return None;
        }
        let limit = limit
            .and_then(parse_count)
            .filter(|n| *n > 0)
            .map(|n| n as usize);
        let offset = offset
            .and_then(parse_count)
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .unwrap_or(0);
        Some(Self { offset, limit })
    }

    /// Slice `items` to this window
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}
