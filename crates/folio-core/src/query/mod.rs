//! Query engine for collection listings
//!
//! A listing is filtered, then sorted, then paginated. Each stage is only
//! applied when the query asks for it.

use crate::constants::{LIMIT_PARAM, OFFSET_PARAM, ORDER_PARAM, RESERVED_PARAMS, SORT_PARAM};
use crate::log_trace;
use crate::types::Document;

/// Field filters and their conditions
pub mod filter;
/// Ordering of documents by a field
pub mod sort;
/// Offset and limit windows
pub mod paginate;

pub use filter::{Condition, Filter};
pub use paginate::Pagination;
pub use sort::SortOrder;

/// Parsed query string of a listing request
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    /// Filters, all of which must match
    pub filters: Vec<Filter>,
    /// Field to sort by
    pub sort: Option<String>,
    /// Direction of the sort
    pub order: SortOrder,
    /// Window over the sorted result
    pub pagination: Option<Pagination>,
}

/// Split a decoded query pair into a filter field and expression.
///
/// Form decoding splits `price>=5` at the `=`, leaving the operator on the
/// key; it is moved back onto the expression. A pair with no `=` at all
/// (`price>5`) is split at its first comparison operator.
fn normalise(key: &str, value: &str) -> (String, String) {
    if let Some(op) = key.chars().last().filter(|c| matches!(c, '>' | '<' | '!')) {
        let field = &key[..key.len() - op.len_utf8()];
        return (field.to_string(), format!("{}={}", op, value));
    }
    if value.is_empty() {
        if let Some(at) = key.find(|c: char| c == '>' || c == '<') {
            return (key[..at].to_string(), key[at..].to_string());
        }
    }
    (key.to_string(), value.to_string())
}

impl QueryParams {
    /// Parse a raw (still percent-encoded) query string
    pub fn parse(raw_query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(raw_query.as_bytes()))
    }

    /// Build from decoded key/value pairs, in request order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = QueryParams::default();
        let mut limit: Option<String> = None;
        let mut offset: Option<String> = None;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if RESERVED_PARAMS.contains(&key) {
                // Last occurrence wins
                match key {
                    SORT_PARAM => params.sort = Some(value.to_string()).filter(|s| !s.is_empty()),
                    ORDER_PARAM => params.order = SortOrder::parse(value),
                    LIMIT_PARAM => limit = Some(value.to_string()),
                    OFFSET_PARAM => offset = Some(value.to_string()),
                    _ => {}
                }
                continue;
            }

            let (field, expression) = normalise(key, value);
            if field.is_empty() {
                continue;
            }
            params.filters.push(Filter::new(field, &expression));
        }

        params.pagination = Pagination::from_params(limit.as_deref(), offset.as_deref());
        params
    }

    /// Whether the query changes the listing at all
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.sort.is_none() && self.pagination.is_none()
    }
}

/// Filter, sort and paginate `documents`
pub fn apply(documents: Vec<Document>, params: &QueryParams) -> Vec<Document> {
    let total = documents.len();
    let mut documents: Vec<Document> = documents
        .into_iter()
        .filter(|doc| params.filters.iter().all(|f| f.matches(doc)))
        .collect();

    if let Some(field) = &params.sort {
        sort::sort_documents(&mut documents, field, params.order);
    }

    if let Some(page) = &params.pagination {
        documents = page.apply(documents);
    }

    log_trace!("Query selected {} of {} documents", documents.len(), total);
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn priced(prices: &[i64]) -> Vec<Document> {
        prices
            .iter()
            .map(|p| serde_json::from_value(json!({"name": format!("p{}", p), "price": p})).unwrap())
            .collect()
    }

    fn prices(documents: &[Document]) -> Vec<i64> {
        documents
            .iter()
            .filter_map(|d| d.get("price").and_then(Value::as_i64))
            .collect()
    }

    #[test]
    fn test_normalise_reattaches_operators() {
        assert_eq!(normalise("price>", "5"), ("price".into(), ">=5".into()));
        assert_eq!(normalise("price<", "5"), ("price".into(), "<=5".into()));
        assert_eq!(normalise("name!", "x"), ("name".into(), "!=x".into()));
        assert_eq!(normalise("price>5", ""), ("price".into(), ">5".into()));
        assert_eq!(normalise("price<5", ""), ("price".into(), "<5".into()));
        assert_eq!(normalise("name", "x*"), ("name".into(), "x*".into()));
    }

    #[test]
    fn test_range_filter_from_raw_query() {
        let params = QueryParams::parse("price>=5&price<=20");
        assert_eq!(params.filters.len(), 2);

        let out = apply(priced(&[1, 10, 25]), &params);
        assert_eq!(prices(&out), [10]);
    }

    #[test]
    fn test_strict_comparisons_from_raw_query() {
        let out = apply(priced(&[1, 10, 25]), &QueryParams::parse("price>1&price<25"));
        assert_eq!(prices(&out), [10]);
    }

    #[test]
    fn test_percent_encoded_operators() {
        let out = apply(priced(&[1, 10, 25]), &QueryParams::parse("price=%3E%3D10"));
        assert_eq!(prices(&out), [10, 25]);
    }

    #[test]
    fn test_reserved_params_are_not_filters() {
        let params = QueryParams::parse("_sort=price&_order=desc&_limit=2&_offset=1");
        assert!(params.filters.is_empty());
        assert_eq!(params.sort.as_deref(), Some("price"));
        assert_eq!(params.order, SortOrder::Descending);
        assert_eq!(params.pagination, Some(Pagination { offset: 1, limit: Some(2) }));

        let out = apply(priced(&[1, 10, 25, 40]), &params);
        assert_eq!(prices(&out), [25, 10]);
    }

    #[test]
    fn test_last_reserved_param_wins() {
        let params = QueryParams::parse("_limit=1&_limit=3&_sort=name&_sort=price");
        assert_eq!(params.pagination.and_then(|p| p.limit), Some(3));
        assert_eq!(params.sort.as_deref(), Some("price"));
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let params = QueryParams::parse("=5&>3");
        assert!(params.filters.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let out = apply(priced(&[3, 1, 2]), &QueryParams::parse(""));
        assert_eq!(prices(&out), [3, 1, 2]);
    }

    #[test]
    fn test_filters_apply_before_pagination() {
        let out = apply(
            priced(&[1, 10, 25, 40, 50]),
            &QueryParams::parse("price>=10&_sort=price&_limit=2&_offset=1"),
        );
        assert_eq!(prices(&out), [25, 40]);
    }

    #[test]
    fn test_desc_is_reverse_of_asc_for_distinct_values() {
        let asc = apply(priced(&[5, 3, 9, 1]), &QueryParams::parse("_sort=price"));
        let mut desc = apply(priced(&[5, 3, 9, 1]), &QueryParams::parse("_sort=price&_order=desc"));
        desc.reverse();
        assert_eq!(prices(&asc), prices(&desc));
    }

    proptest! {
        #[test]
        fn prop_filtering_is_idempotent(values in proptest::collection::vec(-50i64..50, 0..30), bound in -50i64..50) {
            let params = QueryParams::parse(&format!("price>={}", bound));
            let once = apply(priced(&values), &params);
            let twice = apply(once.clone(), &params);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_pagination_count(n in 0usize..40, limit in 1usize..50, offset in 0usize..50) {
            let values: Vec<i64> = (0..n as i64).collect();
            let params = QueryParams::parse(&format!("_limit={}&_offset={}", limit, offset));
            let out = apply(priced(&values), &params);
            prop_assert_eq!(out.len(), limit.min(n.saturating_sub(offset)));
        }
    }
}
