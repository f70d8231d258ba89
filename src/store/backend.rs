//! # Store Backend Traits

use std::fmt;
use std::sync::Arc;

use super::errors::StoreResult;
use super::filter::{Document, Filter, FindOptions};

/// Result of an `update_one` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matched by the filter (0 or 1)
    pub matched: u64,
    /// Documents whose contents changed
    pub modified: u64,
}

/// A named collection of JSON documents
pub trait Collection: Send + Sync + fmt::Debug {
    /// Collection name
    fn name(&self) -> &str;

    /// All documents matching the filter, in store order unless sorted
    fn find(&self, filter: &Filter, options: &FindOptions) -> StoreResult<Vec<Document>>;

    /// First document matching the filter
    fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        let docs = self.find(filter, &FindOptions::default().with_limit(1))?;
        Ok(docs.into_iter().next())
    }

    /// Number of documents matching the filter
    fn count(&self, filter: &Filter) -> StoreResult<usize> {
        Ok(self.find(filter, &FindOptions::default())?.len())
    }

    /// Append a document
    fn insert_one(&self, document: Document) -> StoreResult<()>;

    /// Append a document unless one already matches `guard`.
    ///
    /// The check and the write happen under one lock. Returns `false` when
    /// a match blocked the insert.
    fn insert_unless(&self, document: Document, guard: &Filter) -> StoreResult<bool>;

    /// Set `fields` on the first document matching the filter
    fn update_one(&self, filter: &Filter, fields: &Document) -> StoreResult<UpdateOutcome>;

    /// Remove the first document matching the filter, returning the count removed
    fn delete_one(&self, filter: &Filter) -> StoreResult<u64>;
}

/// A database: a namespace of collections behind one connection
pub trait Database: Send + Sync + fmt::Debug {
    /// Database name
    fn name(&self) -> &str;

    /// Check the connection is usable
    fn ping(&self) -> StoreResult<()>;

    /// Names of existing collections, sorted
    fn list_collection_names(&self) -> StoreResult<Vec<String>>;

    /// Create an empty collection
    fn create_collection(&self, name: &str) -> StoreResult<()>;

    /// Handle to an existing collection
    fn collection(&self, name: &str) -> StoreResult<Arc<dyn Collection>>;

    /// Close the connection; later calls fail with `Unavailable`
    fn close(&self) -> StoreResult<()>;
}
