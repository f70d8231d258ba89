//! File Store Recovery Tests
//!
//! The catalog survives a restart of the file-backed store:
//! - Records and IDs persist across reopen
//! - Allocation resumes past the largest stored ID
//! - A tampered collection file refuses to load

use std::fs;
use std::path::Path;

use bookstore::catalog::{starter_books, BookRepository, BookRequest, CatalogError};
use bookstore::store::{connect, Database, FileDatabase, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn open(root: &Path) -> (FileDatabase, BookRepository) {
    let db = FileDatabase::open(root, "exercise-2").unwrap();
    let repo = BookRepository::open(&db, "information").unwrap();
    (db, repo)
}

fn emma() -> BookRequest {
    BookRequest {
        title: "Emma".into(),
        author: "Jane Austen".into(),
        ..Default::default()
    }
}

// =============================================================================
// Restart Tests
// =============================================================================

/// Seeded records and their IDs are present after reopen.
#[test]
fn test_records_survive_reopen() {
    let tmp = TempDir::new().unwrap();

    let before = {
        let (db, repo) = open(tmp.path());
        repo.seed(&starter_books()).unwrap();
        let books = repo.list_all().unwrap();
        db.close().unwrap();
        books
    };

    let (_db, repo) = open(tmp.path());
    assert_eq!(repo.list_all().unwrap(), before);
}

/// A fresh allocator resumes after the largest persisted ID.
#[test]
fn test_allocation_resumes_after_restart() {
    let tmp = TempDir::new().unwrap();

    {
        let (db, repo) = open(tmp.path());
        repo.seed(&starter_books()).unwrap();
        db.close().unwrap();
    }

    let (_db, repo) = open(tmp.path());
    let book = repo.create(&emma()).unwrap();
    assert_eq!(book.id, "1000003");
}

/// Seeding again after restart inserts nothing.
#[test]
fn test_reseed_after_restart_is_noop() {
    let tmp = TempDir::new().unwrap();

    {
        let (db, repo) = open(tmp.path());
        repo.seed(&starter_books()).unwrap();
        db.close().unwrap();
    }

    let (_db, repo) = open(tmp.path());
    let report = repo.seed(&starter_books()).unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.skipped, 3);
}

/// Updates and deletes are persisted too.
#[test]
fn test_writes_persist() {
    let tmp = TempDir::new().unwrap();

    let id = {
        let (db, repo) = open(tmp.path());
        let book = repo.create(&emma()).unwrap();
        let mut changed = emma();
        changed.year = "1815".into();
        repo.update_from_request(&book.id, &changed).unwrap();
        repo.create(&BookRequest {
            title: "Gone".into(),
            author: "Nobody".into(),
            ..Default::default()
        })
        .and_then(|gone| repo.delete_by_id(&gone.id))
        .unwrap();
        db.close().unwrap();
        book.id
    };

    let (_db, repo) = open(tmp.path());
    let books = repo.list_all().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, id);
    assert_eq!(books[0].year, 1815);
}

// =============================================================================
// Corruption Tests
// =============================================================================

/// Editing the documents without fixing the checksum is detected on open.
#[test]
fn test_tampered_file_is_rejected() {
    let tmp = TempDir::new().unwrap();

    {
        let (db, repo) = open(tmp.path());
        repo.seed(&starter_books()).unwrap();
        db.close().unwrap();
    }

    let path = tmp.path().join("exercise-2").join("information.json");
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("Frankenstein", "Frankenstien")).unwrap();

    let err = FileDatabase::open(tmp.path(), "exercise-2").unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));

    let uri = format!("file://{}", tmp.path().display());
    let err = connect(&uri, "exercise-2").unwrap_err();
    assert!(matches!(
        CatalogError::from(err),
        CatalogError::StoreUnavailable(_)
    ));
}
