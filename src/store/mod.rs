//! Document store for the bookstore catalog
//!
//! A generic collection store: databases hold named collections of JSON
//! documents reached through filter-based find, insert, update, and delete.
//!
//! # Backends
//!
//! - `memory://` - in-process, lost on exit
//! - `file://<dir>` - one checksummed JSON file per collection
//!
//! # Connecting
//!
//! ```ignore
//! let db = store::connect_with_timeout("file:///var/lib/bookstore", "exercise-2", timeout).await?;
//! db.create_collection("information")?;
//! let books = db.collection("information")?;
//! ```

mod backend;
mod errors;
mod file;
mod filter;
mod memory;

pub use backend::{Collection, Database, UpdateOutcome};
pub use errors::{StoreError, StoreResult};
pub use file::{FileCollection, FileDatabase};
pub use filter::{Collation, Document, Filter, FindOptions, Sort, SortDirection};
pub use memory::{MemoryCollection, MemoryDatabase};

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Collection and database names double as file names
pub(crate) fn validate_collection_name(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Parsed store location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    /// In-process store
    Memory,
    /// Directory holding one subdirectory per database
    File(PathBuf),
}

impl FromStr for StoreUri {
    type Err = StoreError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let uri = uri.trim();
        // Anything after memory:// is a label only
        if uri.starts_with("memory://") {
            return Ok(StoreUri::Memory);
        }
        if let Some(path) = uri.strip_prefix("file://") {
            if path.is_empty() {
                return Err(StoreError::InvalidUri(format!("{} has no path", uri)));
            }
            return Ok(StoreUri::File(PathBuf::from(path)));
        }
        Err(StoreError::InvalidUri(format!(
            "unsupported scheme in '{}' (expected memory:// or file://)",
            uri
        )))
    }
}

/// Open a database and verify it answers a ping
pub fn connect(uri: &str, database: &str) -> StoreResult<Arc<dyn Database>> {
    let db: Arc<dyn Database> = match uri.parse::<StoreUri>()? {
        StoreUri::Memory => {
            validate_collection_name(database)?;
            Arc::new(MemoryDatabase::new(database))
        }
        StoreUri::File(root) => Arc::new(FileDatabase::open(&root, database)?),
    };
    db.ping()?;
    Ok(db)
}

/// `connect` on the blocking pool, bounded by `timeout`
pub async fn connect_with_timeout(
    uri: &str,
    database: &str,
    timeout: Duration,
) -> StoreResult<Arc<dyn Database>> {
    let uri = uri.to_string();
    let database = database.to_string();
    let task = tokio::task::spawn_blocking(move || connect(&uri, &database));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(StoreError::Unavailable(format!(
            "connect task failed: {}",
            join_error
        ))),
        Err(_) => Err(StoreError::Timeout(timeout.as_millis() as u64)),
    }
}
