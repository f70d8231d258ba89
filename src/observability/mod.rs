//! Observability for the catalog service
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Counters
//!
//! # Usage
//!
//! ```ignore
//! use bookstore::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::info("SEARCH", &[("query", "poe")]);
//! log_event_with_fields(Event::BookCreated, &[("id", "1000000")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = severity_for(event);
    if severity >= Severity::Error {
        Logger::log_stderr(severity, event.as_str(), fields);
    } else {
        Logger::log(severity, event.as_str(), fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity() {
        assert_eq!(severity_for(Event::StoreUnavailable), Severity::Fatal);
        assert_eq!(severity_for(Event::IdScanFailed), Severity::Warn);
        assert_eq!(severity_for(Event::BookCreated), Severity::Info);
    }

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::BootStart);
        log_event_with_fields(Event::ConfigLoaded, &[("database_uri", "memory://")]);
    }
}
