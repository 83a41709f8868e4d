//! Field values as seen by the query engine
//!
//! JSON values are loosely typed: a price may be stored as `10` or `"10"`.
//! [`FieldValue`] pins down how each is read by filters. Numbers stay
//! numeric; every other present value is carried as its string rendering
//! and may still be read as a number when the text parses as one.

use serde_json::Value;

/// A document field as read by a filter
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The document has no such field
    Missing,
    /// A JSON number
    Number(f64),
    /// Any other JSON value, rendered as text
    String(String),
}

impl FieldValue {
    /// Read an optional JSON value
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None => FieldValue::Missing,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => FieldValue::Number(f),
                None => FieldValue::String(n.to_string()),
            },
            Some(other) => FieldValue::String(render(other)),
        }
    }

    /// Text form, `None` when missing
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Number(n) => Some(render_number(*n)),
            FieldValue::String(s) => Some(s.clone()),
        }
    }

    /// Numeric form, `None` when missing or not numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Number(n) => Some(*n),
            FieldValue::String(s) => parse_number(s),
        }
    }

    /// Whether the field is absent
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

/// Parse text as a finite float, ignoring surrounding whitespace
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shortest text form of a number: integral values carry no fraction
pub fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Text form of any JSON value
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !(n.is_i64() || n.is_u64()) => render_number(f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        composite => composite.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_variants() {
        assert_eq!(FieldValue::from_json(None), FieldValue::Missing);
        assert_eq!(FieldValue::from_json(Some(&json!(10))), FieldValue::Number(10.0));
        assert_eq!(FieldValue::from_json(Some(&json!("abc"))), FieldValue::String("abc".into()));
        assert_eq!(FieldValue::from_json(Some(&json!(true))), FieldValue::String("true".into()));
        assert_eq!(FieldValue::from_json(Some(&json!(null))), FieldValue::String("null".into()));
    }

    #[test]
    fn test_numeric_strings_read_as_numbers() {
        assert_eq!(FieldValue::from_json(Some(&json!("12.5"))).as_number(), Some(12.5));
        assert_eq!(FieldValue::from_json(Some(&json!(" 7 "))).as_number(), Some(7.0));
        assert_eq!(FieldValue::from_json(Some(&json!("12abc"))).as_number(), None);
        assert_eq!(FieldValue::from_json(Some(&json!(true))).as_number(), None);
        assert_eq!(FieldValue::Missing.as_number(), None);
    }

    #[test]
    fn test_render_numbers_without_trailing_fraction() {
        assert_eq!(render(&json!(10)), "10");
        assert_eq!(render(&json!(10.0)), "10");
        assert_eq!(render(&json!(10.25)), "10.25");
        assert_eq!(render(&json!(-3)), "-3");
        assert_eq!(FieldValue::Number(2.0).as_text().as_deref(), Some("2"));
    }

    #[test]
    fn test_render_composites_as_compact_json() {
        assert_eq!(render(&json!([1, 2])), "[1,2]");
        assert_eq!(render(&json!({"a": 1})), "{\"a\":1}");
    }

    #[test]
    fn test_non_finite_text_is_not_numeric() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(""), None);
    }
}
