//! # File Backend
//!
//! One JSON file per collection under the database directory:
//!
//! ```text
//! <root>/<database>/<collection>.json
//! {"collection": "...", "checksum": <crc32 of documents>, "documents": [...]}
//! ```
//!
//! The working set is held in memory. Every mutation rewrites the file
//! through a temp file and rename; a checksum mismatch on load fails the
//! connect.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::backend::{Collection, Database, UpdateOutcome};
use super::errors::{StoreError, StoreResult};
use super::filter::{Document, Filter, FindOptions};
use super::memory::{self, ensure_open, MemoryCollection};
use super::validate_collection_name;

const EXTENSION: &str = "json";

/// On-disk layout of a collection file
#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile {
    collection: String,
    checksum: u32,
    documents: Vec<Document>,
}

fn checksum(documents: &[Document]) -> StoreResult<u32> {
    let bytes = serde_json::to_vec(documents)
        .map_err(|e| StoreError::IoError(format!("serialize documents: {}", e)))?;
    Ok(crc32fast::hash(&bytes))
}

fn io_error(context: &str, path: &Path, e: std::io::Error) -> StoreError {
    StoreError::IoError(format!("{} {}: {}", context, path.display(), e))
}

/// File-backed document collection
#[derive(Debug)]
pub struct FileCollection {
    inner: MemoryCollection,
    path: PathBuf,
}

impl FileCollection {
    fn create(name: &str, path: PathBuf, open: Arc<AtomicBool>) -> StoreResult<Self> {
        let collection = Self {
            inner: MemoryCollection::with_documents(name, Vec::new(), open),
            path,
        };
        collection.persist(&[])?;
        Ok(collection)
    }

    fn load(path: PathBuf, open: Arc<AtomicBool>) -> StoreResult<Self> {
        let corrupt = |reason: String| StoreError::Corrupt {
            path: path.display().to_string(),
            reason,
        };

        let bytes = fs::read(&path).map_err(|e| io_error("read", &path, e))?;
        let file: CollectionFile =
            serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;

        if checksum(&file.documents)? != file.checksum {
            return Err(corrupt("checksum mismatch".to_string()));
        }

        Ok(Self {
            inner: MemoryCollection::with_documents(file.collection, file.documents, open),
            path,
        })
    }

    /// Write `documents` as the full collection file.
    ///
    /// Called with the collection write lock held, so writers never interleave.
    fn persist(&self, documents: &[Document]) -> StoreResult<()> {
        let file = CollectionFile {
            collection: self.inner.name().to_string(),
            checksum: checksum(documents)?,
            documents: documents.to_vec(),
        };
        let bytes = serde_json::to_vec(&file)
            .map_err(|e| StoreError::IoError(format!("serialize collection: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).map_err(|e| io_error("write", &tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_error("rename", &self.path, e))
    }
}

impl Collection for FileCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn find(&self, filter: &Filter, options: &FindOptions) -> StoreResult<Vec<Document>> {
        self.inner.find(filter, options)
    }

    fn count(&self, filter: &Filter) -> StoreResult<usize> {
        self.inner.count(filter)
    }

    fn insert_one(&self, document: Document) -> StoreResult<()> {
        self.inner.transact(
            |docs| {
                docs.push(document);
                ((), true)
            },
            |docs| self.persist(docs),
        )
    }

    fn insert_unless(&self, document: Document, guard: &Filter) -> StoreResult<bool> {
        self.inner.transact(
            |docs| {
                let inserted = memory::insert_unless(docs, document, guard);
                (inserted, inserted)
            },
            |docs| self.persist(docs),
        )
    }

    fn update_one(&self, filter: &Filter, fields: &Document) -> StoreResult<UpdateOutcome> {
        self.inner.transact(
            |docs| {
                let outcome = memory::update_one(docs, filter, fields);
                (outcome, outcome.modified > 0)
            },
            |docs| self.persist(docs),
        )
    }

    fn delete_one(&self, filter: &Filter) -> StoreResult<u64> {
        self.inner.transact(
            |docs| {
                let deleted = memory::delete_one(docs, filter);
                (deleted, deleted > 0)
            },
            |docs| self.persist(docs),
        )
    }
}

/// File-backed database rooted at `<root>/<name>`
#[derive(Debug)]
pub struct FileDatabase {
    name: String,
    dir: PathBuf,
    collections: RwLock<BTreeMap<String, Arc<FileCollection>>>,
    open: Arc<AtomicBool>,
}

impl FileDatabase {
    /// Open (creating if needed) the database directory and load its collections
    pub fn open(root: &Path, name: &str) -> StoreResult<Self> {
        validate_collection_name(name)?;
        let dir = root.join(name);
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot open {}: {}", dir.display(), e))
        })?;

        let open = Arc::new(AtomicBool::new(true));
        let mut collections = BTreeMap::new();

        let entries = fs::read_dir(&dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot list {}: {}", dir.display(), e))
        })?;
        for entry in entries {
            let path = entry.map_err(|e| io_error("list", &dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let collection = FileCollection::load(path, open.clone())?;
            collections.insert(collection.name().to_string(), Arc::new(collection));
        }

        Ok(Self {
            name: name.to_string(),
            dir,
            collections: RwLock::new(collections),
            open,
        })
    }

    /// Directory holding the collection files
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Database for FileDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn ping(&self) -> StoreResult<()> {
        ensure_open(&self.open)?;
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "{} is missing",
                self.dir.display()
            )))
        }
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

        let path = self.dir.join(format!("{}.{}", name, EXTENSION));
        let collection = FileCollection::create(name, path, self.open.clone())?;
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
