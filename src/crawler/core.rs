//! The core `Crawler` implementation.
//!
//! The `Crawler` ties together the scheduler, downloader, route table, and
//! dataset to execute one crawl: it enqueues the seed requests, starts the
//! fetch workers, waits until the crawl is idle (or Ctrl-C arrives), then
//! shuts the scheduler down, drains the workers, closes the dataset, and
//! logs a final statistics summary.

use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncReceiver;
use tracing::{error, info, trace, warn};

use crate::dataset::Dataset;
use crate::downloader::Downloader;
use crate::error::CrawlError;
use crate::request::Request;
use crate::router::Router;
use crate::scheduler::Scheduler;
use crate::state::CrawlerState;
use crate::stats::StatCollector;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Orchestrates one crawl from seed requests to a closed dataset.
pub struct Crawler {
    scheduler: Arc<Scheduler>,
    req_rx: AsyncReceiver<Request>,
    downloader: Arc<dyn Downloader>,
    router: Arc<Router>,
    dataset: Arc<dyn Dataset>,
    seeds: Vec<Request>,
    stats: Arc<StatCollector>,
    max_concurrent_downloads: usize,
}

impl Crawler {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        scheduler: Arc<Scheduler>,
        req_rx: AsyncReceiver<Request>,
        downloader: Arc<dyn Downloader>,
        router: Arc<Router>,
        dataset: Arc<dyn Dataset>,
        seeds: Vec<Request>,
        stats: Arc<StatCollector>,
        max_concurrent_downloads: usize,
    ) -> Self {
        Crawler {
            scheduler,
            req_rx,
            downloader,
            router,
            dataset,
            seeds,
            stats,
            max_concurrent_downloads,
        }
    }

    /// Returns a cloned handle to the crawl's statistics.
    pub fn stats(&self) -> Arc<StatCollector> {
        Arc::clone(&self.stats)
    }

    /// Runs the crawl to completion.
    pub async fn run(self) -> Result<(), CrawlError> {
        info!(
            seeds = self.seeds.len(),
            max_concurrent_downloads = self.max_concurrent_downloads,
            "crawler starting"
        );

        let Crawler {
            scheduler,
            req_rx,
            downloader,
            router,
            dataset,
            seeds,
            stats,
            max_concurrent_downloads,
        } = self;

        let state = CrawlerState::new();

        // Seeds go in before the fetch workers start so the idle check below
        // never observes an empty frontier that is still being filled.
        for mut seed in seeds {
            seed.url.set_fragment(None);
            match scheduler.enqueue_request(seed).await {
                Ok(true) => stats.increment_requests_enqueued(),
                Ok(false) => warn!("duplicate seed request dropped"),
                Err(e) => error!(error = %e, "failed to enqueue seed request"),
            }
        }

        trace!("spawning fetch task");
        let fetch_task = super::spawn_fetch_task(
            Arc::clone(&scheduler),
            req_rx,
            downloader,
            router,
            Arc::clone(&dataset),
            Arc::clone(&state),
            Arc::clone(&stats),
            max_concurrent_downloads,
        );

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("ctrl-c received, initiating graceful shutdown");
            }
            _ = async {
                loop {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    if scheduler.is_idle() && state.is_idle() {
                        // Double-check after a pause: a request may be mid-handoff.
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        if scheduler.is_idle() && state.is_idle() {
                            break;
                        }
                    }
                }
            } => {
                info!("crawl has become idle, initiating shutdown");
            }
        }

        if let Err(e) = scheduler.shutdown().await {
            error!(error = %e, "error during scheduler shutdown");
        }

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, fetch_task).await {
            Ok(Ok(())) => trace!("fetch task completed during shutdown"),
            Ok(Err(e)) => error!(error = %e, "fetch task failed during shutdown"),
            Err(_) => warn!(
                "fetch task did not complete within {}s, continuing with shutdown",
                SHUTDOWN_TIMEOUT.as_secs()
            ),
        }

        info!("closing dataset");
        dataset.close().await?;

        info!(stats = %stats.summary(), "crawl finished");
        Ok(())
    }
}
