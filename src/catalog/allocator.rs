//! Record ID allocation
//!
//! IDs are decimal strings. Each allocation scans the store for the
//! numerically largest ID and folds `max + 1` into an atomic counter, then
//! takes the counter's value. The counter never moves backwards, so two
//! callers in one process never receive the same ID; a value taken and not
//! used leaves a gap. `i64::MAX` is never handed out: once the counter
//! reaches it every allocation fails.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::observability::{log_event_with_fields, Event};
use crate::store::{Collection, Filter, FindOptions, Sort};

use super::book::fields;
use super::errors::{CatalogError, CatalogResult};

/// First ID handed out by an empty store
pub const BASE_ID: i64 = 1_000_000;

/// Allocates record IDs for one collection
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicI64,
}

impl IdAllocator {
    /// Allocator seeded at `BASE_ID`
    pub fn new() -> Self {
        Self::starting_at(BASE_ID)
    }

    /// Allocator seeded at an arbitrary value
    pub fn starting_at(next: i64) -> Self {
        Self {
            next: AtomicI64::new(next),
        }
    }

    /// The value the next call returns if the store holds nothing larger
    pub fn peek(&self) -> i64 {
        self.next.load(Ordering::SeqCst)
    }

    /// Allocate the next ID.
    ///
    /// A failed or empty max-ID scan falls back to the counter alone.
    pub fn next_id(&self, collection: &dyn Collection) -> CatalogResult<String> {
        if let Some(max) = Self::max_stored_id(collection) {
            let floor = max.checked_add(1).ok_or_else(exhausted)?;
            self.next.fetch_max(floor, Ordering::SeqCst);
        }
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map(|id| id.to_string())
            .map_err(|_| exhausted())
    }

    /// Numerically largest parsable ID in the store
    fn max_stored_id(collection: &dyn Collection) -> Option<i64> {
        let options = FindOptions::sorted(Sort::descending(fields::ID).numeric()).with_limit(1);

        let docs = match collection.find(&Filter::exists(fields::ID), &options) {
            Ok(docs) => docs,
            Err(e) => {
                log_event_with_fields(Event::IdScanFailed, &[("reason", &e.to_string())]);
                return None;
            }
        };

        docs.first()?.get(fields::ID)?.as_str()?.trim().parse().ok()
    }
}

fn exhausted() -> CatalogError {
    log_event_with_fields(Event::IdSpaceExhausted, &[("max", &i64::MAX.to_string())]);
    CatalogError::Internal("record ID space exhausted".to_string())
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
