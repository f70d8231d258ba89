//! Book repository
//!
//! Single-record operations over one store collection. Duplicate detection
//! and the insert are one conditional write, so concurrent creates of the
//! same book cannot both succeed.

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};
use crate::store::{Collection, Database, Filter, FindOptions, StoreError};

use super::allocator::IdAllocator;
use super::book::{normalize_id, Book, BookFields, BookRequest};
use super::errors::{CatalogError, CatalogResult};

/// Outcome of seeding the starter catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Ensure the named collection exists and return a handle to it
pub fn prepare_collection(database: &dyn Database, name: &str) -> CatalogResult<Arc<dyn Collection>> {
    let names = database.list_collection_names()?;
    if !names.iter().any(|n| n == name) {
        match database.create_collection(name) {
            Ok(()) => log_event_with_fields(
                Event::CollectionCreated,
                &[("collection", name), ("database", database.name())],
            ),
            // Lost a race with another creator
            Err(StoreError::CollectionExists(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(database.collection(name)?)
}

/// Repository of book records
#[derive(Debug, Clone)]
pub struct BookRepository {
    collection: Arc<dyn Collection>,
    allocator: Arc<IdAllocator>,
}

impl BookRepository {
    /// Repository with a fresh allocator
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self::with_allocator(collection, Arc::new(IdAllocator::new()))
    }

    pub fn with_allocator(collection: Arc<dyn Collection>, allocator: Arc<IdAllocator>) -> Self {
        Self {
            collection,
            allocator,
        }
    }

    /// Prepare the collection in `database` and wrap it
    pub fn open(database: &dyn Database, collection: &str) -> CatalogResult<Self> {
        Ok(Self::new(prepare_collection(database, collection)?))
    }

    pub fn collection(&self) -> &Arc<dyn Collection> {
        &self.collection
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// Allocate the next record ID
    pub fn next_id(&self) -> CatalogResult<String> {
        self.allocator.next_id(self.collection.as_ref())
    }

    /// True iff a record matches all five comparable fields
    pub fn exists(&self, candidate: &BookFields) -> CatalogResult<bool> {
        Ok(self
            .collection
            .find_one(&candidate.duplicate_filter())?
            .is_some())
    }

    /// Insert a record unless an equivalent record or the same ID exists
    pub fn insert(&self, book: &Book) -> CatalogResult<()> {
        let guard = Filter::or(vec![
            book.fields().duplicate_filter(),
            Book::id_filter(&book.id),
        ]);

        if self.collection.insert_unless(book.to_document(), &guard)? {
            log_event_with_fields(
                Event::BookCreated,
                &[("id", &book.id), ("title", &book.title)],
            );
            Ok(())
        } else {
            Err(CatalogError::DuplicateRecord)
        }
    }

    /// Validate, normalize, assign an ID if absent, and insert
    pub fn create(&self, request: &BookRequest) -> CatalogResult<Book> {
        request.validate()?;

        let id = request.id.trim();
        let id = if id.is_empty() {
            self.next_id()?
        } else {
            normalize_id(id).ok_or_else(|| {
                CatalogError::BadRequest(format!(
                    "Invalid book id '{}': must be a decimal number below {}",
                    id,
                    i64::MAX
                ))
            })?
        };

        let book = Book::new(id, request.normalize());
        self.insert(&book)?;
        Ok(book)
    }

    /// Replace all five mutable fields of the record with this ID
    pub fn update_by_id(&self, id: &str, fields: &BookFields) -> CatalogResult<()> {
        let outcome = self
            .collection
            .update_one(&Book::id_filter(id), &fields.to_document())?;

        if outcome.matched == 0 {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        log_event_with_fields(
            Event::BookUpdated,
            &[("id", id), ("modified", &outcome.modified.to_string())],
        );
        Ok(())
    }

    /// Validate and normalize a request, then `update_by_id`
    pub fn update_from_request(&self, id: &str, request: &BookRequest) -> CatalogResult<()> {
        request.validate()?;
        self.update_by_id(id, &request.normalize())
    }

    /// Remove the record with this ID
    pub fn delete_by_id(&self, id: &str) -> CatalogResult<()> {
        if self.collection.delete_one(&Book::id_filter(id))? == 0 {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        log_event_with_fields(Event::BookDeleted, &[("id", id)]);
        Ok(())
    }

    pub fn get_by_id(&self, id: &str) -> CatalogResult<Book> {
        match self.collection.find_one(&Book::id_filter(id))? {
            Some(doc) => Book::from_document(doc),
            None => Err(CatalogError::NotFound(id.to_string())),
        }
    }

    /// Every record, in store order
    pub fn list_all(&self) -> CatalogResult<Vec<Book>> {
        self.find_books(&Filter::All)
    }

    pub(crate) fn find_books(&self, filter: &Filter) -> CatalogResult<Vec<Book>> {
        self.collection
            .find(filter, &FindOptions::default())?
            .into_iter()
            .map(Book::from_document)
            .collect()
    }

    /// Insert each starter record that is not already present
    pub fn seed(&self, books: &[BookFields]) -> CatalogResult<SeedReport> {
        let mut report = SeedReport::default();

        for fields in books {
            if self.exists(fields)? {
                report.skipped += 1;
                log_event_with_fields(Event::SeedSkipped, &[("title", &fields.title)]);
                continue;
            }

            let book = Book::new(self.next_id()?, fields.clone());
            match self.insert(&book) {
                Ok(()) => {
                    report.inserted += 1;
                    log_event_with_fields(
                        Event::SeedInserted,
                        &[("id", &book.id), ("title", &book.title)],
                    );
                }
                Err(CatalogError::DuplicateRecord) => report.skipped += 1,
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}
