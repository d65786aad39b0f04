//! The request frontier.
//!
//! The `Scheduler` owns the queue of not-yet-fetched requests and the
//! deduplication of previously seen locators. It runs as a small actor: an
//! internal message loop drains an unbounded command channel and hands
//! requests to the fetch workers over a rendezvous channel, so a request
//! leaves the scheduler only when a worker is ready to take it.
//!
//! Deduplication happens at enqueue time: a request whose fingerprint has
//! already been accepted is dropped silently. The scheduler also enforces
//! the per-crawl run limit; once `max_requests` requests have been handed
//! out it stops emitting and reports itself idle so the crawl winds down.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam::queue::SegQueue;
use kanal::{bounded_async, unbounded_async, AsyncReceiver, AsyncSender};
use moka::sync::Cache;
use tracing::{debug, error, info, trace};

use crate::error::CrawlError;
use crate::request::Request;

const SEEN_CACHE_CAPACITY: u64 = 100_000;

enum SchedulerMessage {
    Enqueue(Box<Request>),
    Shutdown,
}

/// Frontier queue with duplicate detection and a run limit.
pub struct Scheduler {
    request_queue: SegQueue<Request>,
    seen_fingerprints: Cache<String, ()>,
    tx_internal: AsyncSender<SchedulerMessage>,
    pending_requests: AtomicUsize,
    dispatched_requests: AtomicUsize,
    max_requests: usize,
    pub(crate) is_shutting_down: AtomicBool,
}

impl Scheduler {
    /// Creates a scheduler bounded to `max_requests` dispatched requests and
    /// returns it together with the receiver the fetch workers read from.
    pub fn new(max_requests: usize) -> (Arc<Self>, AsyncReceiver<Request>) {
        let (tx_internal, rx_internal) = unbounded_async();
        // Rendezvous: a request leaves the queue only when a worker takes it.
        let (tx_req_out, rx_req_out) = bounded_async(0);

        let scheduler = Arc::new(Scheduler {
            request_queue: SegQueue::new(),
            seen_fingerprints: Cache::builder().max_capacity(SEEN_CACHE_CAPACITY).build(),
            tx_internal,
            pending_requests: AtomicUsize::new(0),
            dispatched_requests: AtomicUsize::new(0),
            max_requests,
            is_shutting_down: AtomicBool::new(false),
        });

        let scheduler_clone = Arc::clone(&scheduler);
        tokio::spawn(async move {
            scheduler_clone.run_loop(rx_internal, tx_req_out).await;
        });

        (scheduler, rx_req_out)
    }

    async fn run_loop(
        &self,
        rx_internal: AsyncReceiver<SchedulerMessage>,
        tx_req_out: AsyncSender<Request>,
    ) {
        info!(max_requests = self.max_requests, "scheduler started");
        loop {
            if let Ok(Some(msg)) = rx_internal.try_recv() {
                if !self.handle_message(Ok(msg)) {
                    break;
                }
                continue;
            }

            let maybe_request = if !tx_req_out.is_closed() && !self.limit_reached() {
                self.request_queue.pop()
            } else {
                None
            };

            if let Some(request) = maybe_request {
                trace!(url = %request.url, "handing request to fetch worker");
                // The handoff is a rendezvous, so this blocks until a worker
                // takes the request. Internal messages pile up in the
                // unbounded channel meanwhile and are drained by the fast
                // path above; shutdown closes the worker side, which fails
                // this send and unblocks the loop.
                let send_res = tx_req_out.send(request).await;
                self.pending_requests.fetch_sub(1, Ordering::SeqCst);
                if send_res.is_err() {
                    error!("fetch worker receiver dropped, scheduler can no longer dispatch");
                } else {
                    self.dispatched_requests.fetch_add(1, Ordering::SeqCst);
                }
            } else if !self.handle_message(rx_internal.recv().await) {
                break;
            }
        }
        info!(
            pending = self.pending_requests.load(Ordering::SeqCst),
            dispatched = self.dispatched_requests.load(Ordering::SeqCst),
            "scheduler stopped"
        );
    }

    fn handle_message(&self, msg: Result<SchedulerMessage, kanal::ReceiveError>) -> bool {
        match msg {
            Ok(SchedulerMessage::Enqueue(request)) => {
                trace!(url = %request.url, "queueing request");
                self.request_queue.push(*request);
                self.pending_requests.fetch_add(1, Ordering::SeqCst);
                true
            }
            Ok(SchedulerMessage::Shutdown) => {
                info!("scheduler received shutdown signal");
                self.is_shutting_down.store(true, Ordering::SeqCst);
                false
            }
            Err(_) => {
                debug!("scheduler internal channel closed");
                self.is_shutting_down.store(true, Ordering::SeqCst);
                false
            }
        }
    }

    /// Submits a request to the frontier.
    ///
    /// Already-seen fingerprints are dropped silently; so are requests that
    /// arrive after the run limit is reached. Returns `true` when the
    /// request was accepted.
    pub async fn enqueue_request(&self, mut request: Request) -> Result<bool, CrawlError> {
        request.url.set_fragment(None);
        let fingerprint = request.fingerprint();

        if self.has_been_seen(&fingerprint) {
            trace!(url = %request.url, "dropping already-seen request");
            return Ok(false);
        }
        if self.limit_reached() {
            debug!(url = %request.url, "run limit reached, dropping request");
            return Ok(false);
        }

        self.seen_fingerprints.insert(fingerprint, ());
        if self
            .tx_internal
            .send(SchedulerMessage::Enqueue(Box::new(request)))
            .await
            .is_err()
        {
            if !self.is_shutting_down.load(Ordering::SeqCst) {
                error!("scheduler internal channel closed while enqueuing");
            }
            return Err(CrawlError::SchedulerClosed);
        }
        Ok(true)
    }

    /// Signals the scheduler to stop dispatching and exit its loop.
    pub async fn shutdown(&self) -> Result<(), CrawlError> {
        self.is_shutting_down.store(true, Ordering::SeqCst);
        if self.tx_internal.is_closed() {
            debug!("scheduler internal channel already closed, skipping shutdown signal");
            return Ok(());
        }
        self.tx_internal
            .send(SchedulerMessage::Shutdown)
            .await
            .map_err(|_| CrawlError::SchedulerClosed)
    }

    /// Whether a fingerprint has already been accepted into the frontier.
    pub fn has_been_seen(&self, fingerprint: &str) -> bool {
        self.seen_fingerprints.contains_key(fingerprint)
    }

    /// Whether the per-crawl request limit has been exhausted.
    pub fn limit_reached(&self) -> bool {
        self.dispatched_requests.load(Ordering::SeqCst) >= self.max_requests
    }

    /// Number of queued, not-yet-dispatched requests.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending_requests.load(Ordering::SeqCst)
    }

    /// Whether the frontier queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the scheduler has nothing left to dispatch, either because
    /// the queue drained or because the run limit was reached.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.is_empty() || self.limit_reached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> Request {
        Request::parse(url).unwrap()
    }

    #[tokio::test]
    async fn test_enqueue_accepts_new_and_drops_duplicate() {
        let (scheduler, rx) = Scheduler::new(100);
        assert!(scheduler
            .enqueue_request(request("https://example.test/a"))
            .await
            .unwrap());
        assert!(!scheduler
            .enqueue_request(request("https://example.test/a"))
            .await
            .unwrap());
        // Same page, different fragment: same fingerprint.
        assert!(!scheduler
            .enqueue_request(request("https://example.test/a#frag"))
            .await
            .unwrap());

        let dispatched = rx.recv().await.unwrap();
        assert_eq!(dispatched.url.as_str(), "https://example.test/a");
        scheduler.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_run_limit_stops_dispatch() {
        let (scheduler, rx) = Scheduler::new(1);
        scheduler
            .enqueue_request(request("https://example.test/a"))
            .await
            .unwrap();
        let first = rx.recv().await.unwrap();
        assert_eq!(first.url.as_str(), "https://example.test/a");

        // Give the run loop a moment to record the dispatch.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(scheduler.limit_reached());
        assert!(scheduler.is_idle());
        assert!(!scheduler
            .enqueue_request(request("https://example.test/b"))
            .await
            .unwrap());
        scheduler.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_idle_after_queue_drains() {
        let (scheduler, rx) = Scheduler::new(100);
        scheduler
            .enqueue_request(request("https://example.test/a"))
            .await
            .unwrap();
        let _ = rx.recv().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(scheduler.is_idle());
        scheduler.shutdown().await.unwrap();
    }
}
