//! Shared handler state

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalog::{BookRepository, CatalogError, CatalogResult};
use crate::observability::MetricsRegistry;
use crate::store::Database;

/// State shared across every route
#[derive(Debug)]
pub struct CatalogState {
    pub database: Arc<dyn Database>,
    pub repository: BookRepository,
    pub metrics: Arc<MetricsRegistry>,
    pub started_at: DateTime<Utc>,
}

impl CatalogState {
    pub fn new(database: Arc<dyn Database>, repository: BookRepository) -> Self {
        Self {
            database,
            repository,
            metrics: Arc::new(MetricsRegistry::new()),
            started_at: Utc::now(),
        }
    }

    /// Run a repository operation on the blocking pool
    pub async fn run<T, F>(&self, op: F) -> CatalogResult<T>
    where
        F: FnOnce(&BookRepository) -> CatalogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let repository = self.repository.clone();
        tokio::task::spawn_blocking(move || op(&repository))
            .await
            .map_err(|e| CatalogError::Internal(format!("worker task failed: {}", e)))?
    }

    /// Ping the store on the blocking pool
    pub async fn ping(&self) -> CatalogResult<()> {
        let database = Arc::clone(&self.database);
        tokio::task::spawn_blocking(move || database.ping())
            .await
            .map_err(|e| CatalogError::Internal(format!("worker task failed: {}", e)))?
            .map_err(CatalogError::from)
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
