//! The fetch worker pool.
//!
//! `spawn_fetch_task` runs the receiving end of the scheduler's request
//! stream: it takes requests as they are dispatched, downloads them under a
//! concurrency limit, and processes each fetched page as one unit of work.
//! A failed download or a classification error aborts only its own unit;
//! the loop keeps running until the scheduler shuts down.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncReceiver;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, trace, warn};

use crate::dataset::Dataset;
use crate::downloader::Downloader;
use crate::error::CrawlError;
use crate::page::Page;
use crate::request::Request;
use crate::router::Router;
use crate::scheduler::Scheduler;
use crate::state::CrawlerState;
use crate::stats::StatCollector;

#[allow(clippy::too_many_arguments)]
pub(crate) fn spawn_fetch_task(
    scheduler: Arc<Scheduler>,
    req_rx: AsyncReceiver<Request>,
    downloader: Arc<dyn Downloader>,
    router: Arc<Router>,
    dataset: Arc<dyn Dataset>,
    state: Arc<CrawlerState>,
    stats: Arc<StatCollector>,
    max_concurrent_downloads: usize,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        trace!(max_concurrent_downloads, "fetch task started");
        let semaphore = Arc::new(Semaphore::new(max_concurrent_downloads));
        let mut tasks = JoinSet::new();

        loop {
            if scheduler.is_shutting_down.load(Ordering::SeqCst) {
                trace!("scheduler shutting down, exiting fetch task");
                break;
            }

            let request = tokio::select! {
                result = req_rx.recv() => match result {
                    Ok(req) => req,
                    Err(_) => {
                        trace!("request channel closed, exiting fetch task");
                        break;
                    }
                },
                _ = tokio::time::sleep(Duration::from_millis(100)) => continue,
            };

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("download semaphore closed, exiting fetch task");
                    break;
                }
            };

            state.in_flight_requests.fetch_add(1, Ordering::SeqCst);
            let scheduler_clone = Arc::clone(&scheduler);
            let downloader_clone = Arc::clone(&downloader);
            let router_clone = Arc::clone(&router);
            let dataset_clone = Arc::clone(&dataset);
            let state_clone = Arc::clone(&state);
            let stats_clone = Arc::clone(&stats);

            tasks.spawn(async move {
                process_request(
                    request,
                    scheduler_clone,
                    downloader_clone,
                    router_clone,
                    dataset_clone,
                    Arc::clone(&state_clone),
                    stats_clone,
                )
                .await;
                state_clone.in_flight_requests.fetch_sub(1, Ordering::SeqCst);
                drop(permit);
            });
        }

        trace!("waiting for in-flight downloads to finish");
        while let Some(res) = tasks.join_next().await {
            if let Err(e) = res {
                error!(error = %e, "a fetch worker task failed");
            }
        }
        trace!("fetch task finished");
    })
}

/// One unit of work: download, dispatch, append records, enqueue followups.
async fn process_request(
    request: Request,
    scheduler: Arc<Scheduler>,
    downloader: Arc<dyn Downloader>,
    router: Arc<Router>,
    dataset: Arc<dyn Dataset>,
    state: Arc<CrawlerState>,
    stats: Arc<StatCollector>,
) {
    stats.increment_requests_sent();
    let url = request.url.clone();

    let response = match downloader.download(request).await {
        Ok(response) => {
            stats.increment_requests_succeeded();
            response
        }
        Err(e) => {
            error!(url = %url, error = %e, "download failed");
            stats.increment_requests_failed();
            return;
        }
    };

    // The parsed document is not Send; dispatch synchronously and drop it
    // before the output side effects await.
    let dispatched = {
        let page = Page::parse(response.url.clone(), &response.body);
        router.dispatch(&page, &response.request)
    };

    let output = match dispatched {
        Ok(output) => output,
        Err(CrawlError::UnroutedLabel(label)) => {
            error!(url = %response.url, %label, "no handler for label, dropping page");
            stats.increment_requests_unrouted();
            return;
        }
        Err(e) => {
            error!(url = %response.url, error = %e, "handler failed");
            stats.increment_requests_failed();
            return;
        }
    };

    state.processing_outputs.fetch_add(1, Ordering::SeqCst);
    let (records, requests) = output.into_parts();

    for record in records {
        match dataset.push(record).await {
            Ok(()) => stats.increment_records_pushed(),
            Err(e) => {
                error!(url = %response.url, error = %e, "failed to append record");
                stats.increment_requests_failed();
            }
        }
    }

    for followup in requests {
        match scheduler.enqueue_request(followup).await {
            Ok(true) => stats.increment_requests_enqueued(),
            Ok(false) => debug!("followup request dropped as duplicate or over limit"),
            Err(e) => {
                if !scheduler.is_shutting_down.load(Ordering::SeqCst) {
                    error!(error = %e, "failed to enqueue followup request");
                }
            }
        }
    }

    state.processing_outputs.fetch_sub(1, Ordering::SeqCst);
}
