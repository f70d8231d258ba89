//! # In-Memory Backend
//!
//! Collections live in process memory and vanish on exit. The file backend
//! reuses `MemoryCollection` as its working set.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::backend::{Collection, Database, UpdateOutcome};
use super::errors::{StoreError, StoreResult};
use super::filter::{Document, Filter, FindOptions};
use super::validate_collection_name;

/// Fails once the owning database has been closed
pub(crate) fn ensure_open(open: &AtomicBool) -> StoreResult<()> {
    if open.load(Ordering::Acquire) {
        Ok(())
    } else {
        Err(StoreError::Unavailable("connection closed".to_string()))
    }
}

/// In-memory document collection
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
    open: Arc<AtomicBool>,
}

impl MemoryCollection {
    /// Create a standalone, empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_documents(name, Vec::new(), Arc::new(AtomicBool::new(true)))
    }

    pub(crate) fn with_documents(
        name: impl Into<String>,
        documents: Vec<Document>,
        open: Arc<AtomicBool>,
    ) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(documents),
            open,
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Document>>> {
        ensure_open(&self.open)?;
        self.documents
            .read()
            .map_err(|_| StoreError::LockPoisoned("collection documents"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Document>>> {
        ensure_open(&self.open)?;
        self.documents
            .write()
            .map_err(|_| StoreError::LockPoisoned("collection documents"))
    }

    /// Apply `op` to a staged copy and keep it only if `commit` succeeds.
    ///
    /// The write lock is held throughout; `op` reports whether it changed
    /// anything, and unchanged copies are neither committed nor swapped in.
    pub(crate) fn transact<R>(
        &self,
        op: impl FnOnce(&mut Vec<Document>) -> (R, bool),
        commit: impl FnOnce(&[Document]) -> StoreResult<()>,
    ) -> StoreResult<R> {
        let mut documents = self.write()?;
        let mut staged = documents.clone();
        let (result, changed) = op(&mut staged);
        if changed {
            commit(&staged)?;
            *documents = staged;
        }
        Ok(result)
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn find(&self, filter: &Filter, options: &FindOptions) -> StoreResult<Vec<Document>> {
        let documents = self.read()?;
        let matched: Vec<Document> = documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        Ok(options.apply(matched))
    }

    fn count(&self, filter: &Filter) -> StoreResult<usize> {
        Ok(self.read()?.iter().filter(|doc| filter.matches(doc)).count())
    }

    fn insert_one(&self, document: Document) -> StoreResult<()> {
        self.write()?.push(document);
        Ok(())
    }

    fn insert_unless(&self, document: Document, guard: &Filter) -> StoreResult<bool> {
        Ok(insert_unless(&mut *self.write()?, document, guard))
    }

    fn update_one(&self, filter: &Filter, fields: &Document) -> StoreResult<UpdateOutcome> {
        Ok(update_one(&mut self.write()?, filter, fields))
    }

    fn delete_one(&self, filter: &Filter) -> StoreResult<u64> {
        Ok(delete_one(&mut *self.write()?, filter))
    }
}

pub(crate) fn insert_unless(
    documents: &mut Vec<Document>,
    document: Document,
    guard: &Filter,
) -> bool {
    if documents.iter().any(|doc| guard.matches(doc)) {
        return false;
    }
    documents.push(document);
    true
}

pub(crate) fn update_one(
    documents: &mut [Document],
    filter: &Filter,
    fields: &Document,
) -> UpdateOutcome {
    let Some(doc) = documents.iter_mut().find(|doc| filter.matches(doc)) else {
        return UpdateOutcome::default();
    };

    let mut modified = false;
    for (key, value) in fields {
        if doc.get(key) != Some(value) {
            doc.insert(key.clone(), value.clone());
            modified = true;
        }
    }

    UpdateOutcome {
        matched: 1,
        modified: u64::from(modified),
    }
}

pub(crate) fn delete_one(documents: &mut Vec<Document>, filter: &Filter) -> u64 {
    match documents.iter().position(|doc| filter.matches(doc)) {
        Some(index) => {
            documents.remove(index);
            1
        }
        None => 0,
    }
}

/// In-memory database
#[derive(Debug)]
pub struct MemoryDatabase {
    name: String,
    collections: RwLock<BTreeMap<String, Arc<MemoryCollection>>>,
    open: Arc<AtomicBool>,
}

impl MemoryDatabase {
    /// Create an empty database
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(BTreeMap::new()),
            open: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl Database for MemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn ping(&self) -> StoreResult<()> {
        ensure_open(&self.open)
    }

    fn list_collection_names(&self) -> StoreResult<Vec<String>> {
        ensure_open(&self.open)?;
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("database collections"))?;
        Ok(collections.keys().cloned().collect())
    }

    fn create_collection(&self, name: &str) -> StoreResult<()> {
        ensure_open(&self.open)?;
        validate_collection_name(name)?;

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("database collections"))?;
        if collections.contains_key(name) {
            return Err(StoreError::CollectionExists(name.to_string()));
        }

        let collection = MemoryCollection::with_documents(name, Vec::new(), self.open.clone());
        collections.insert(name.to_string(), Arc::new(collection));
        Ok(())
    }

    fn collection(&self, name: &str) -> StoreResult<Arc<dyn Collection>> {
        ensure_open(&self.open)?;
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("database collections"))?;
        match collections.get(name) {
            Some(collection) => Ok(collection.clone() as Arc<dyn Collection>),
            None => Err(StoreError::CollectionNotFound(name.to_string())),
        }
    }

    fn close(&self) -> StoreResult<()> {
        self.open.store(false, Ordering::Release);
        Ok(())
    }
}
