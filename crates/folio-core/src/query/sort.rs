//! Sorting of listed documents
//!
//! Documents lacking the sort field always end up last, whichever
//! direction is requested. Only the comparison between present values is
//! reversed for descending order.

use std::cmp::Ordering;

use serde_json::Value;

use crate::types::value::render;
use crate::types::Document;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortOrder {
    /// `desc` (any case) is descending, anything else ascending
    pub fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("desc") {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

/// Rank used to order values of different JSON types
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Locale-style string ordering: case-insensitive first, then lowercase
/// before uppercase on ties
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Ascending comparison of two present values
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => collate(a, b),
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a)
            .cmp(&type_rank(b))
            .then_with(|| render(a).cmp(&render(b))),
    }
}

/// Stable sort of `documents` by `field`
pub fn sort_documents(documents: &mut [Document], field: &str, order: SortOrder) {
    documents.sort_by(|a, b| match (a.get(field), b.get(field)) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => compare_values(a, b),
            SortOrder::Descending => compare_values(a, b).reverse(),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
