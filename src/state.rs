//! Tracks the operational state of the crawler.
//!
//! `CrawlerState` holds atomic counters for work that has left the scheduler
//! but is not yet finished: requests being downloaded and handler outputs
//! being written out. Together with the scheduler's own idle check this
//! determines when the crawl can shut down.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared in-flight counters for the crawler's tasks.
#[derive(Debug, Default)]
pub struct CrawlerState {
    /// Requests currently being downloaded.
    pub in_flight_requests: AtomicUsize,
    /// Handler outputs currently being appended and enqueued.
    pub processing_outputs: AtomicUsize,
}

impl CrawlerState {
    /// Creates a new, atomically reference-counted `CrawlerState`.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Checks if no unit of work is in flight.
    pub fn is_idle(&self) -> bool {
        self.in_flight_requests.load(Ordering::SeqCst) == 0
            && self.processing_outputs.load(Ordering::SeqCst) == 0
    }
}
