//! Book records, wire types, and field normalization
//!
//! Numeric fields arrive as strings and are coerced permissively: anything
//! that does not parse becomes 0 instead of failing the request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::store::{Document, Filter};

use super::errors::{CatalogError, CatalogResult};

/// Stored document field names
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "bookname";
    pub const AUTHOR: &str = "bookauthor";
    pub const ISBN: &str = "bookisbn";
    /// Never written by this service; searched for documents that carry it
    pub const EDITION: &str = "bookedition";
    pub const PAGES: &str = "bookpages";
    pub const YEAR: &str = "bookyear";
}

/// Parse a leading integer the way `%d` scanning does.
///
/// Leading whitespace and an optional sign are accepted, digits are read up
/// to the first non-digit, and the rest is ignored. No digits, or a value
/// outside `i64`, yields 0.
pub fn parse_count(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return 0;
    }

    match rest[..len].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => 0,
    }
}

/// Page count: negative or oversized input becomes 0
pub fn parse_pages(input: &str) -> u32 {
    u32::try_from(parse_count(input)).unwrap_or(0)
}

/// Publication year: out-of-range input becomes 0
pub fn parse_year(input: &str) -> i32 {
    i32::try_from(parse_count(input)).unwrap_or(0)
}

/// Canonical form of a client-supplied record ID.
///
/// IDs are unsigned decimals below `i64::MAX` without leading zeros;
/// `"007"` becomes `"7"`. Anything else is `None`.
pub fn normalize_id(id: &str) -> Option<String> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match id.parse::<i64>() {
        Ok(n) if n < i64::MAX => Some(n.to_string()),
        _ => None,
    }
}

/// The mutable, comparable part of a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub pages: u32,
    pub year: i32,
}

impl BookFields {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        pages: u32,
        year: i32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            pages,
            year,
        }
    }

    /// The five fields as a `$set` document
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::TITLE.into(), Value::from(self.title.as_str()));
        doc.insert(fields::AUTHOR.into(), Value::from(self.author.as_str()));
        doc.insert(fields::ISBN.into(), Value::from(self.isbn.as_str()));
        doc.insert(fields::PAGES.into(), Value::from(self.pages));
        doc.insert(fields::YEAR.into(), Value::from(self.year));
        doc
    }

    /// Exact match on all five comparable fields
    pub fn duplicate_filter(&self) -> Filter {
        Filter::and(vec![
            Filter::eq(fields::TITLE, self.title.as_str()),
            Filter::eq(fields::AUTHOR, self.author.as_str()),
            Filter::eq(fields::YEAR, self.year),
            Filter::eq(fields::PAGES, self.pages),
            Filter::eq(fields::ISBN, self.isbn.as_str()),
        ])
    }
}

/// A stored book record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "bookname", default)]
    pub title: String,
    #[serde(rename = "bookauthor", default)]
    pub author: String,
    #[serde(rename = "bookisbn", default)]
    pub isbn: String,
    #[serde(rename = "bookpages", default, deserialize_with = "stored_pages")]
    pub pages: u32,
    #[serde(rename = "bookyear", default, deserialize_with = "stored_year")]
    pub year: i32,
}

impl Book {
    /// Assemble a record from an ID and its fields
    pub fn new(id: impl Into<String>, fields: BookFields) -> Self {
        Self {
            id: id.into(),
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
            pages: fields.pages,
            year: fields.year,
        }
    }

    /// Copy of the mutable fields
    pub fn fields(&self) -> BookFields {
        BookFields::new(
            self.title.clone(),
            self.author.clone(),
            self.isbn.clone(),
            self.pages,
            self.year,
        )
    }

    pub fn to_document(&self) -> Document {
        let mut doc = self.fields().to_document();
        doc.insert(fields::ID.into(), Value::from(self.id.as_str()));
        doc
    }

    pub fn from_document(doc: Document) -> CatalogResult<Self> {
        serde_json::from_value(Value::Object(doc))
            .map_err(|e| CatalogError::Internal(format!("malformed book document: {}", e)))
    }

    /// Filter addressing this record ID
    pub fn id_filter(id: &str) -> Filter {
        Filter::eq(fields::ID, id)
    }
}

/// Accepts a string, number, or null; the result is always text
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(f)) => f.to_string(),
        None => String::new(),
    })
}

/// Stored counts written by other clients may be negative, oversized, or
/// text; they coerce like request input instead of failing the read.
fn stored_pages<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_pages(&string_or_number(deserializer)?))
}

fn stored_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_year(&string_or_number(deserializer)?))
}

/// Create/update request body (JSON or form)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub author: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pages: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub edition: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
}

impl BookRequest {
    /// Title and author are required
    pub fn validate(&self) -> CatalogResult<()> {
        if self.title.trim().is_empty() || self.author.trim().is_empty() {
            return Err(CatalogError::BadRequest(
                "Title and author are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Coerce into stored fields; absent optional fields become 0/empty
    pub fn normalize(&self) -> BookFields {
        BookFields::new(
            self.title.clone(),
            self.author.clone(),
            self.edition.clone(),
            parse_pages(&self.pages),
            parse_year(&self.year),
        )
    }
}

/// Book as returned by the API; every field is a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: String,
    pub edition: String,
    pub year: String,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            pages: book.pages.to_string(),
            edition: book.isbn.clone(),
            year: book.year.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_count_scanf_semantics() {
        assert_eq!(parse_count("292"), 292);
        assert_eq!(parse_count("  42"), 42);
        assert_eq!(parse_count("+7"), 7);
        assert_eq!(parse_count("-12"), -12);
        assert_eq!(parse_count("12abc"), 12);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-"), 0);
        assert_eq!(parse_count("99999999999999999999"), 0);
    }

    #[test]
    fn test_pages_and_year_coercion() {
        assert_eq!(parse_pages("-5"), 0);
        assert_eq!(parse_pages("280"), 280);
        assert_eq!(parse_pages("5000000000"), 0);
        assert_eq!(parse_year("1843"), 1843);
        assert_eq!(parse_year("-300"), -300);
        assert_eq!(parse_year("nineteen"), 0);
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("1000000").as_deref(), Some("1000000"));
        assert_eq!(normalize_id("007").as_deref(), Some("7"));
        assert_eq!(normalize_id("0").as_deref(), Some("0"));
        assert_eq!(normalize_id(""), None);
        assert_eq!(normalize_id("12a"), None);
        assert_eq!(normalize_id("-1"), None);
        assert_eq!(normalize_id("+1"), None);
        assert_eq!(
            normalize_id("9223372036854775806").as_deref(),
            Some("9223372036854775806")
        );
        assert_eq!(normalize_id("9223372036854775807"), None);
        assert_eq!(normalize_id("99999999999999999999"), None);
    }

    #[test]
    fn test_document_round_trip() {
        let book = Book::new(
            "1000000",
            BookFields::new("The Vortex", "José Eustasio Rivera", "958-30-0804-4", 292, 1924),
        );
        let doc = book.to_document();

        assert_eq!(doc["bookname"], "The Vortex");
        assert_eq!(doc["bookpages"], 292);
        assert_eq!(Book::from_document(doc).unwrap(), book);
    }

    #[test]
    fn test_from_document_fills_missing_optionals() {
        let doc = match json!({"id": "5", "bookname": "T", "bookauthor": "A"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let book = Book::from_document(doc).unwrap();
        assert_eq!(book.isbn, "");
        assert_eq!(book.pages, 0);
        assert_eq!(book.year, 0);
    }

    #[test]
    fn test_from_document_coerces_foreign_counts() {
        let doc = match json!({
            "id": "6",
            "bookname": "T",
            "bookauthor": "A",
            "bookpages": -5,
            "bookyear": 99999999999i64
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let book = Book::from_document(doc).unwrap();
        assert_eq!(book.pages, 0);
        assert_eq!(book.year, 0);

        let doc = match json!({"id": "7", "bookpages": "312", "bookyear": 1851.0}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let book = Book::from_document(doc).unwrap();
        assert_eq!(book.pages, 312);
        assert_eq!(book.year, 1851);
    }

    #[test]
    fn test_request_accepts_numbers_and_strings() {
        let req: BookRequest = serde_json::from_value(json!({
            "title": "Emma",
            "author": "Jane Austen",
            "pages": 474,
            "year": "1815",
            "edition": null
        }))
        .unwrap();
        assert_eq!(req.pages, "474");
        assert_eq!(req.edition, "");
        assert_eq!(req.year, "1815");
    }

    #[test]
    fn test_request_normalize_and_validate() {
        let req = BookRequest {
            title: "Emma".into(),
            author: "Jane Austen".into(),
            pages: "lots".into(),
            edition: "1st".into(),
            ..Default::default()
        };
        req.validate().unwrap();
        assert_eq!(req.normalize(), BookFields::new("Emma", "Jane Austen", "1st", 0, 0));

        let missing = BookRequest {
            title: "Emma".into(),
            ..Default::default()
        };
        assert!(matches!(missing.validate(), Err(CatalogError::BadRequest(_))));
    }

    #[test]
    fn test_response_uses_strings() {
        let book = Book::new("7", BookFields::new("T", "A", "I", 10, 2001));
        let json = serde_json::to_value(BookResponse::from(&book)).unwrap();
        assert_eq!(
            json,
            json!({"id": "7", "title": "T", "author": "A", "pages": "10", "edition": "I", "year": "2001"})
        );
    }
}
