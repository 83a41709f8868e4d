//! Field filters
//!
//! A filter pairs a field name with a condition parsed from the filter
//! expression. Operators are recognised by prefix in this order: `>=`,
//! `<=`, `>`, `<`, `!=`, then any `*` makes the expression a glob, and
//! everything else is a case-insensitive equality test.

use regex::Regex;

use crate::types::value::parse_number;
use crate::types::{Document, FieldValue};

/// Condition a field value must satisfy
#[derive(Debug, Clone)]
pub enum Condition {
    /// `>=n`; `None` when the literal is not numeric
    GreaterOrEqual(Option<f64>),
    /// `<=n`
    LessOrEqual(Option<f64>),
    /// `>n`
    Greater(Option<f64>),
    /// `<n`
    Less(Option<f64>),
    /// `!=text`, compared lowercased
    NotEqual(String),
    /// Anchored, case-insensitive glob; `None` if the pattern could not be built
    Matches(Option<Regex>),
    /// Case-insensitive equality with the lowercased text
    Equals(String),
}

/// One field filter
#[derive(Debug, Clone)]
pub struct Filter {
    /// Top-level field the filter reads
    pub field: String,
    /// Condition the field must satisfy
    pub condition: Condition,
}

impl Condition {
    /// Parse a filter expression
    pub fn parse(expression: &str) -> Self {
        if let Some(rest) = expression.strip_prefix(">=") {
            Condition::GreaterOrEqual(parse_number(rest))
        } else if let Some(rest) = expression.strip_prefix("<=") {
            Condition::LessOrEqual(parse_number(rest))
        } else if let Some(rest) = expression.strip_prefix('>') {
            Condition::Greater(parse_number(rest))
        } else if let Some(rest) = expression.strip_prefix('<') {
            Condition::Less(parse_number(rest))
        } else if let Some(rest) = expression.strip_prefix("!=") {
            Condition::NotEqual(rest.to_lowercase())
        } else if expression.contains('*') {
            Condition::Matches(glob(expression))
        } else {
            Condition::Equals(expression.to_lowercase())
        }
    }

    /// Evaluate against a field value. Missing fields never match.
    pub fn matches(&self, value: &FieldValue) -> bool {
        if value.is_missing() {
            return false;
        }
        match self {
            Condition::GreaterOrEqual(limit) => compare(*limit, value, |v, l| v >= l),
            Condition::LessOrEqual(limit) => compare(*limit, value, |v, l| v <= l),
            Condition::Greater(limit) => compare(*limit, value, |v, l| v > l),
            Condition::Less(limit) => compare(*limit, value, |v, l| v < l),
            Condition::NotEqual(text) => lowered(value).is_some_and(|v| v != *text),
            Condition::Equals(text) => lowered(value).is_some_and(|v| v == *text),
            Condition::Matches(pattern) => match (pattern, value.as_text()) {
                (Some(pattern), Some(text)) => pattern.is_match(&text),
                _ => false,
            },
        }
    }
}

impl Filter {
    /// Build a filter from a field name and expression
    pub fn new(field: impl Into<String>, expression: &str) -> Self {
        Self { field: field.into(), condition: Condition::parse(expression) }
    }

    /// Whether `document` passes this filter
    pub fn matches(&self, document: &Document) -> bool {
        self.condition.matches(&FieldValue::from_json(document.get(&self.field)))
    }
}

fn lowered(value: &FieldValue) -> Option<String> {
    value.as_text().map(|text| text.to_lowercase())
}

/// Numeric comparison; false when either side is not a number
fn compare(limit: Option<f64>, value: &FieldValue, op: impl Fn(f64, f64) -> bool) -> bool {
    match (value.as_number(), limit) {
        (Some(v), Some(l)) => op(v, l),
        _ => false,
    }
}

/// Translate a `*` glob into an anchored, case-insensitive regex
fn glob(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("(?is)^{}$", body)).ok()
}
