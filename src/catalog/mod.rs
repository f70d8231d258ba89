//! Bookstore catalog
//!
//! The data-access layer between HTTP handlers and the document store:
//!
//! - `book` - record shape, request normalization, response shape
//! - `allocator` - record ID assignment
//! - `repository` - create, read, update, delete, and seeding
//! - `query` - search and author/year grouping
//!
//! All operations are single-record and synchronous; callers on an async
//! runtime move them onto the blocking pool.

mod allocator;
mod book;
mod errors;
mod query;
mod repository;
mod seed;

pub use allocator::{IdAllocator, BASE_ID};
pub use book::{
    fields, normalize_id, parse_count, parse_pages, parse_year, Book, BookFields, BookRequest,
    BookResponse,
};
pub use errors::{CatalogError, CatalogResult};
pub use query::{group_by_author, group_by_year, search_filter, AuthorGroup, YearGroup, SEARCH_FIELDS};
pub use repository::{prepare_collection, BookRepository, SeedReport};
pub use seed::starter_books;
