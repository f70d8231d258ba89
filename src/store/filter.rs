//! # Filters and Find Options
//!
//! Document matching for collection queries. Filters compare JSON values
//! exactly; the only fuzzy operator is `Regex`, which applies to strings.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::{Map, Value};

/// A stored document: a JSON object
pub type Document = Map<String, Value>;

/// A filter expression over documents
#[derive(Debug, Clone)]
pub enum Filter {
    /// Matches every document
    All,
    /// Field equals value (no coercion)
    Eq(String, Value),
    /// Field is present and not null
    Exists(String),
    /// String field matches the regex
    Regex(String, Regex),
    /// Every sub-filter matches
    And(Vec<Filter>),
    /// At least one sub-filter matches
    Or(Vec<Filter>),
}

impl Filter {
    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Create an existence filter
    pub fn exists(field: impl Into<String>) -> Self {
        Filter::Exists(field.into())
    }

    /// Create a regex filter
    pub fn regex(field: impl Into<String>, regex: Regex) -> Self {
        Filter::Regex(field.into(), regex)
    }

    /// Conjunction of filters
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    /// Disjunction of filters
    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    /// Check if a document matches this filter
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, expected) => match present(doc, field) {
                Some(actual) => actual == expected,
                None => false,
            },
            Filter::Exists(field) => present(doc, field).is_some(),
            Filter::Regex(field, regex) => present(doc, field)
                .and_then(Value::as_str)
                .map(|s| regex.is_match(s))
                .unwrap_or(false),
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

/// Missing and null fields are treated the same
fn present<'a>(doc: &'a Document, field: &str) -> Option<&'a Value> {
    doc.get(field).filter(|v| !v.is_null())
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// How sort keys compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collation {
    /// Strings by code point, numbers by value
    Lexical,
    /// Numbers and decimal strings by integer value
    Numeric,
}

/// Single-field sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
    pub collation: Collation,
}

impl Sort {
    /// Ascending lexical sort on a field
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
            collation: Collation::Lexical,
        }
    }

    /// Descending lexical sort on a field
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            direction: SortDirection::Descending,
            ..Self::ascending(field)
        }
    }

    /// Switch to numeric collation
    pub fn numeric(mut self) -> Self {
        self.collation = Collation::Numeric;
        self
    }

    fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let left = present(a, &self.field);
        let right = present(b, &self.field);

        let ordering = match self.collation {
            Collation::Lexical => compare_lexical(left, right),
            Collation::Numeric => numeric_key(left).cmp(&numeric_key(right)),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Unparsable values compare as `None`, which sorts before every number
fn numeric_key(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn compare_lexical(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

/// Options for `find`
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl FindOptions {
    /// Options with a sort and no limit
    pub fn sorted(sort: Sort) -> Self {
        Self {
            sort: Some(sort),
            limit: None,
        }
    }

    /// Cap the number of returned documents
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort (stable, so ties keep store order) and truncate
    pub(crate) fn apply(&self, mut docs: Vec<Document>) -> Vec<Document> {
        if let Some(sort) = &self.sort {
            docs.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_eq_is_exact() {
        let d = doc(json!({"pages": 280, "title": "Frankenstein"}));

        assert!(Filter::eq("pages", 280).matches(&d));
        assert!(!Filter::eq("pages", "280").matches(&d));
        assert!(!Filter::eq("title", "frankenstein").matches(&d));
    }

    #[test]
    fn test_missing_and_null_fields() {
        let d = doc(json!({"isbn": null}));

        assert!(!Filter::exists("isbn").matches(&d));
        assert!(!Filter::exists("title").matches(&d));
        assert!(!Filter::eq("isbn", Value::Null).matches(&d));
    }

    #[test]
    fn test_regex_only_matches_strings() {
        let re = RegexBuilder::new("poe").case_insensitive(true).build().unwrap();
        let filter = Filter::regex("author", re);

        assert!(filter.matches(&doc(json!({"author": "Edgar Allan Poe"}))));
        assert!(!filter.matches(&doc(json!({"author": 42}))));
        assert!(!filter.matches(&doc(json!({"title": "Poe"}))));
    }

    #[test]
    fn test_and_or() {
        let d = doc(json!({"a": 1, "b": 2}));

        assert!(Filter::and(vec![Filter::eq("a", 1), Filter::eq("b", 2)]).matches(&d));
        assert!(!Filter::and(vec![Filter::eq("a", 1), Filter::eq("b", 3)]).matches(&d));
        assert!(Filter::or(vec![Filter::eq("a", 9), Filter::eq("b", 2)]).matches(&d));
        assert!(!Filter::or(vec![]).matches(&d));
        assert!(Filter::and(vec![]).matches(&d));
    }

    #[test]
    fn test_numeric_collation_beats_lexical() {
        let docs = vec![
            doc(json!({"id": "999"})),
            doc(json!({"id": "1000001"})),
            doc(json!({"id": "abc"})),
            doc(json!({"id": "1000000"})),
        ];

        let lexical = FindOptions::sorted(Sort::descending("id")).apply(docs.clone());
        assert_eq!(lexical[0]["id"], "abc");

        let numeric = FindOptions::sorted(Sort::descending("id").numeric())
            .with_limit(2)
            .apply(docs);
        assert_eq!(numeric.len(), 2);
        assert_eq!(numeric[0]["id"], "1000001");
        assert_eq!(numeric[1]["id"], "1000000");
    }

    #[test]
    fn test_sort_is_stable() {
        let docs = vec![
            doc(json!({"k": 1, "n": "first"})),
            doc(json!({"k": 0, "n": "zero"})),
            doc(json!({"k": 1, "n": "second"})),
        ];

        let sorted = FindOptions::sorted(Sort::ascending("k")).apply(docs);
        let names: Vec<_> = sorted.iter().map(|d| d["n"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["zero", "first", "second"]);
    }
}
