//! Observable events for the catalog service
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Store connection established
    StoreConnected,
    /// Store could not be reached (FATAL at startup)
    StoreUnavailable,
    /// Catalog collection created on first run
    CollectionCreated,
    /// Starter record inserted
    SeedInserted,
    /// Starter record already present
    SeedSkipped,
    /// Server listening
    Serving,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Requests
    /// HTTP request handled
    Request,
    /// Max-ID scan failed; allocator used its counter
    IdScanFailed,
    /// Counter reached i64::MAX; allocation refused
    IdSpaceExhausted,

    // Writes
    /// Record inserted
    BookCreated,
    /// Record updated
    BookUpdated,
    /// Record deleted
    BookDeleted,
}

impl Event {
    /// Returns the event name as used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreConnected => "STORE_CONNECTED",
            Event::StoreUnavailable => "STORE_UNAVAILABLE",
            Event::CollectionCreated => "COLLECTION_CREATED",
            Event::SeedInserted => "SEED_INSERTED",
            Event::SeedSkipped => "SEED_SKIPPED",
            Event::Serving => "SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::Request => "REQUEST",
            Event::IdScanFailed => "ID_SCAN_FAILED",
            Event::IdSpaceExhausted => "ID_SPACE_EXHAUSTED",
            Event::BookCreated => "BOOK_CREATED",
            Event::BookUpdated => "BOOK_UPDATED",
            Event::BookDeleted => "BOOK_DELETED",
        }
    }

    /// Whether the event ends the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StoreUnavailable)
    }

    /// Whether the event signals degraded operation
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::IdScanFailed | Event::IdSpaceExhausted)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
