//! Crawl statistics.
//!
//! The `StatCollector` counts requests and records as they move through the
//! crawler. All counters are atomic so every task can update them without
//! coordination; a summary is logged when the crawl finishes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Thread-safe counters for one crawl.
#[derive(Debug)]
pub struct StatCollector {
    /// Requests accepted into the frontier.
    pub requests_enqueued: AtomicUsize,
    /// Requests handed to the downloader.
    pub requests_sent: AtomicUsize,
    /// Requests whose fetch succeeded.
    pub requests_succeeded: AtomicUsize,
    /// Requests whose fetch or output handling failed.
    pub requests_failed: AtomicUsize,
    /// Requests dropped by dispatch because their label had no handler.
    pub requests_unrouted: AtomicUsize,
    /// Result records appended to the dataset.
    pub records_pushed: AtomicUsize,
    started_at: Instant,
}

impl Default for StatCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatCollector {
    /// Creates a collector with all counters at zero.
    pub fn new() -> Self {
        StatCollector {
            requests_enqueued: AtomicUsize::new(0),
            requests_sent: AtomicUsize::new(0),
            requests_succeeded: AtomicUsize::new(0),
            requests_failed: AtomicUsize::new(0),
            requests_unrouted: AtomicUsize::new(0),
            records_pushed: AtomicUsize::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn increment_requests_enqueued(&self) {
        self.requests_enqueued.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_requests_sent(&self) {
        self.requests_sent.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_requests_succeeded(&self) {
        self.requests_succeeded.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_requests_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_requests_unrouted(&self) {
        self.requests_unrouted.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_records_pushed(&self) {
        self.records_pushed.fetch_add(1, Ordering::SeqCst);
    }

    /// One-line summary for the end-of-crawl log.
    pub fn summary(&self) -> String {
        format!(
            "enqueued={} sent={} succeeded={} failed={} unrouted={} records={} elapsed={:?}",
            self.requests_enqueued.load(Ordering::SeqCst),
            self.requests_sent.load(Ordering::SeqCst),
            self.requests_succeeded.load(Ordering::SeqCst),
            self.requests_failed.load(Ordering::SeqCst),
            self.requests_unrouted.load(Ordering::SeqCst),
            self.records_pushed.load(Ordering::SeqCst),
            self.started_at.elapsed(),
        )
    }
}
