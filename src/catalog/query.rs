//! Search and grouping over the catalog
//!
//! Search is a case-insensitive substring match across the text fields.
//! Grouping is a full scan bucketed by author or year; buckets come back
//! sorted by key and titles keep store order within a bucket.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::store::Filter;

use super::book::{fields, Book};
use super::errors::{CatalogError, CatalogResult};
use super::repository::BookRepository;

/// Fields a search query is matched against
pub const SEARCH_FIELDS: [&str; 4] = [fields::TITLE, fields::AUTHOR, fields::ISBN, fields::EDITION];

/// Compile a query into a literal, case-insensitive pattern
fn search_pattern(query: &str) -> CatalogResult<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|e| CatalogError::Internal(format!("search pattern: {}", e)))
}

/// Filter matching `query` as a substring of any searchable field.
///
/// Whitespace is part of the query; a blank query is rejected.
pub fn search_filter(query: &str) -> CatalogResult<Filter> {
    if query.trim().is_empty() {
        return Err(CatalogError::BadRequest(
            "Search query is required".to_string(),
        ));
    }

    let pattern = search_pattern(query)?;
    Ok(Filter::or(
        SEARCH_FIELDS
            .iter()
            .map(|field| Filter::regex(*field, pattern.clone()))
            .collect(),
    ))
}

/// One author and the titles filed under them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorGroup {
    pub author: String,
    pub titles: Vec<String>,
}

/// One publication year and the titles filed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearGroup {
    pub year: String,
    pub titles: Vec<String>,
}

/// Records without a title or ISBN are left out of every grouping
fn groupable(book: &Book) -> bool {
    !book.title.is_empty() && !book.isbn.is_empty()
}

pub fn group_by_author(books: &[Book]) -> Vec<AuthorGroup> {
    let mut buckets: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for book in books.iter().filter(|b| groupable(b)) {
        buckets
            .entry(book.author.as_str())
            .or_default()
            .push(book.title.clone());
    }

    buckets
        .into_iter()
        .map(|(author, titles)| AuthorGroup {
            author: author.to_string(),
            titles,
        })
        .collect()
}

/// Years are ordered numerically, then rendered as decimal strings
pub fn group_by_year(books: &[Book]) -> Vec<YearGroup> {
    let mut buckets: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    for book in books.iter().filter(|b| groupable(b)) {
        buckets.entry(book.year).or_default().push(book.title.clone());
    }

    buckets
        .into_iter()
        .map(|(year, titles)| YearGroup {
            year: year.to_string(),
            titles,
        })
        .collect()
}

impl BookRepository {
    /// Records whose title, author, ISBN, or edition contains `query`
    pub fn search(&self, query: &str) -> CatalogResult<Vec<Book>> {
        self.find_books(&search_filter(query)?)
    }

    pub fn group_by_author(&self) -> CatalogResult<Vec<AuthorGroup>> {
        Ok(group_by_author(&self.list_all()?))
    }

    pub fn group_by_year(&self) -> CatalogResult<Vec<YearGroup>> {
        Ok(group_by_year(&self.list_all()?))
    }
}
