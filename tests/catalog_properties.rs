//! Catalog Property Tests
//!
//! Behavior of the catalog through its public API:
//! - Listing returns exactly what was inserted
//! - Duplicate inserts are rejected, even under concurrency
//! - Update and delete on missing IDs are NotFound
//! - Search and grouping rules
//! - ID allocation

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use bookstore::catalog::{
    Book, BookFields, BookRepository, BookRequest, CatalogError, IdAllocator,
};
use bookstore::store::{Collection, MemoryCollection};

// =============================================================================
// Helper Functions
// =============================================================================

fn repository() -> BookRepository {
    BookRepository::new(Arc::new(MemoryCollection::new("information")))
}

fn fields(title: &str, author: &str, isbn: &str) -> BookFields {
    BookFields::new(title, author, isbn, 100, 2000)
}

fn request(title: &str, author: &str, isbn: &str) -> BookRequest {
    BookRequest {
        title: title.into(),
        author: author.into(),
        edition: isbn.into(),
        pages: "100".into(),
        year: "2000".into(),
        ..Default::default()
    }
}

// =============================================================================
// Listing and Duplicates
// =============================================================================

/// Distinct inserts are listed exactly once each.
#[test]
fn test_list_returns_inserted_set() {
    let repo = repository();
    let mut expected = HashSet::new();

    for i in 0..20 {
        let book = repo
            .create(&request(&format!("Title {}", i), "Author", &format!("isbn-{}", i)))
            .unwrap();
        expected.insert(book.id);
    }

    let listed: HashSet<String> = repo.list_all().unwrap().into_iter().map(|b| b.id).collect();
    assert_eq!(listed, expected);
}

/// Identical Title/Author/Year/Pages/ISBN is a duplicate.
#[test]
fn test_identical_insert_is_duplicate() {
    let repo = repository();

    repo.create(&request("Emma", "Jane Austen", "1")).unwrap();
    let err = repo.create(&request("Emma", "Jane Austen", "1")).unwrap_err();

    assert!(matches!(err, CatalogError::DuplicateRecord));
    assert_eq!(err.status_code(), 409);
}

/// Racing creators of the same record: exactly one wins.
#[test]
fn test_concurrent_duplicate_creates_admit_one() {
    let repo = repository();
    let mut handles = vec![];

    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(thread::spawn(move || {
            repo.create(&request("Emma", "Jane Austen", "1")).is_ok()
        }));
    }

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(repo.list_all().unwrap().len(), 1);
}

/// Concurrent distinct creates all land with distinct IDs.
#[test]
fn test_concurrent_creates_get_unique_ids() {
    let repo = repository();
    let mut handles = vec![];

    for t in 0..4 {
        let repo = repo.clone();
        handles.push(thread::spawn(move || {
            (0..25)
                .map(|i| {
                    repo.create(&request(&format!("T{}-{}", t, i), "A", "x"))
                        .unwrap()
                        .id
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id));
        }
    }
    assert_eq!(ids.len(), 100);
}

// =============================================================================
// Update and Delete
// =============================================================================

/// Update on a missing ID is NotFound; on a present ID it replaces the fields.
#[test]
fn test_update_semantics() {
    let repo = repository();

    let missing = repo.update_by_id("1000000", &fields("T", "A", "I"));
    assert!(matches!(missing, Err(CatalogError::NotFound(_))));

    let book = repo.create(&request("Emma", "Jane Austen", "1")).unwrap();
    let replacement = BookFields::new("Persuasion", "Jane Austen", "2", 249, 1817);
    repo.update_by_id(&book.id, &replacement).unwrap();

    let stored = repo.get_by_id(&book.id).unwrap();
    assert_eq!(stored, Book::new(book.id.clone(), replacement));
}

/// Deleting twice: the second call is NotFound.
#[test]
fn test_delete_twice() {
    let repo = repository();
    let book = repo.create(&request("Emma", "Jane Austen", "1")).unwrap();

    repo.delete_by_id(&book.id).unwrap();
    assert!(matches!(
        repo.delete_by_id(&book.id),
        Err(CatalogError::NotFound(_))
    ));
}

/// A foreign record with a negative page count still lists and groups.
#[test]
fn test_negative_stored_pages_do_not_break_reads() {
    let coll = Arc::new(MemoryCollection::new("information"));
    let mut doc = Book::new("9", fields("Dracula", "Bram Stoker", "isbn-9")).to_document();
    doc.insert("bookpages".into(), serde_json::json!(-5));
    coll.insert_one(doc).unwrap();

    let repo = BookRepository::new(coll);
    let books = repo.list_all().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].pages, 0);
    assert_eq!(repo.group_by_author().unwrap().len(), 1);
    assert_eq!(repo.group_by_year().unwrap().len(), 1);
}

// =============================================================================
// Search and Grouping
// =============================================================================

#[test]
fn test_search_finds_author_case_insensitively() {
    let repo = repository();
    repo.create(&request("The Black Cat", "Edgar Allan Poe", "978-3-99168-238-7"))
        .unwrap();
    repo.create(&request("Frankenstein", "Mary Shelley", "978-3-649-64609-9"))
        .unwrap();

    let hits = repo.search("poe").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].author, "Edgar Allan Poe");

    assert_eq!(repo.search("CAT").unwrap().len(), 1);
    assert_eq!(repo.search("649-64609").unwrap().len(), 1);
    assert!(repo.search("dickens").unwrap().is_empty());
}

/// Empty Title or ISBN is excluded; titles keep insertion order.
#[test]
fn test_group_by_author_rules() {
    let repo = repository();
    repo.create(&request("T1", "A", "i1")).unwrap();
    repo.create(&request("No ISBN", "A", "")).unwrap();
    repo.create(&request("T2", "A", "i2")).unwrap();

    let groups = repo.group_by_author().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].author, "A");
    assert_eq!(groups[0].titles, vec!["T1", "T2"]);
}

// =============================================================================
// ID Allocation
// =============================================================================

#[test]
fn test_allocator_counts_from_base() {
    let coll = MemoryCollection::new("information");
    let allocator = IdAllocator::new();

    assert_eq!(allocator.next_id(&coll).unwrap(), "1000000");
    assert_eq!(allocator.next_id(&coll).unwrap(), "1000001");
}

/// A foreign document with a large ID pushes allocation past it.
#[test]
fn test_allocator_follows_store() {
    let coll = Arc::new(MemoryCollection::new("information"));
    coll.insert_one(Book::new("5000000", fields("T", "A", "I")).to_document())
        .unwrap();

    let repo = BookRepository::new(coll);
    let book = repo.create(&request("Emma", "Jane Austen", "1")).unwrap();
    assert_eq!(book.id, "5000001");
}

/// Client IDs at the top of the range cannot wedge automatic allocation.
#[test]
fn test_client_id_cannot_exhaust_allocation() {
    let repo = repository();

    let mut top = request("Emma", "Jane Austen", "1");
    top.id = "9223372036854775807".into();
    assert!(matches!(repo.create(&top), Err(CatalogError::BadRequest(_))));

    let first = repo.create(&request("Persuasion", "Jane Austen", "2")).unwrap();
    let second = repo.create(&request("Sanditon", "Jane Austen", "3")).unwrap();
    assert_eq!(first.id, "1000000");
    assert_eq!(second.id, "1000001");
}

/// Leading zeros name the same record as the plain number.
#[test]
fn test_leading_zero_ids_collide() {
    let repo = repository();

    let mut padded = request("Emma", "Jane Austen", "1");
    padded.id = "007".into();
    assert_eq!(repo.create(&padded).unwrap().id, "7");

    let mut plain = request("Persuasion", "Jane Austen", "2");
    plain.id = "7".into();
    assert!(matches!(repo.create(&plain), Err(CatalogError::DuplicateRecord)));
    assert_eq!(repo.list_all().unwrap().len(), 1);
}
