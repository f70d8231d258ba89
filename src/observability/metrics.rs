//! Metrics registry for the catalog service
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters
///
/// Relaxed ordering is enough: counters are read for reporting only.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// HTTP requests handled
    requests: AtomicU64,
    /// Requests answered with a 4xx or 5xx status
    request_errors: AtomicU64,
    /// Records inserted (API and seed)
    books_created: AtomicU64,
    /// Records updated
    books_updated: AtomicU64,
    /// Records deleted
    books_deleted: AtomicU64,
    /// Inserts rejected as duplicates
    duplicates_rejected: AtomicU64,
    /// Searches executed
    searches: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_request_errors(&self) {
        self.request_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_books_created(&self) {
        self.books_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_books_updated(&self) {
        self.books_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_books_deleted(&self) {
        self.books_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicates_rejected(&self) {
        self.duplicates_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_searches(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            request_errors: self.request_errors.load(Ordering::Relaxed),
            books_created: self.books_created.load(Ordering::Relaxed),
            books_updated: self.books_updated.load(Ordering::Relaxed),
            books_deleted: self.books_deleted.load(Ordering::Relaxed),
            duplicates_rejected: self.duplicates_rejected.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub request_errors: u64,
    pub books_created: u64,
    pub books_updated: u64,
    pub books_deleted: u64,
    pub duplicates_rejected: u64,
    pub searches: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.requests, 0);
        assert_eq!(snapshot.books_created, 0);
        assert_eq!(snapshot.searches, 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_requests();
        registry.increment_requests();
        registry.increment_request_errors();
        registry.increment_books_created();
        registry.increment_books_updated();
        registry.increment_books_deleted();
        registry.increment_duplicates_rejected();
        registry.increment_searches();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.requests, 2);
        assert_eq!(snapshot.request_errors, 1);
        assert_eq!(snapshot.books_created, 1);
        assert_eq!(snapshot.books_updated, 1);
        assert_eq!(snapshot.books_deleted, 1);
        assert_eq!(snapshot.duplicates_rejected, 1);
        assert_eq!(snapshot.searches, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.increment_searches();

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["searches"], 1);
        assert_eq!(json["requests"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_requests();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().requests, 1000);
    }
}
