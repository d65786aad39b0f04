//! Fluent construction of `Crawler` instances.
//!
//! The builder collects the route table, seed requests, collaborators, and
//! limits, then validates everything in `build()`. Configuration mistakes
//! fail here, before any fetch happens.

use std::sync::Arc;

use crate::crawler::Crawler;
use crate::dataset::Dataset;
use crate::downloader::{Downloader, ReqwestDownloader};
use crate::error::CrawlError;
use crate::request::Request;
use crate::router::Router;
use crate::scheduler::Scheduler;
use crate::stats::StatCollector;

/// Default cap on requests processed per crawl.
pub const DEFAULT_MAX_REQUESTS_PER_CRAWL: usize = 100;

/// Assembles and validates a [`Crawler`].
pub struct CrawlerBuilder {
    router: Router,
    downloader: Option<Arc<dyn Downloader>>,
    dataset: Option<Arc<dyn Dataset>>,
    seeds: Vec<Request>,
    max_concurrent_downloads: usize,
    max_requests_per_crawl: usize,
}

impl CrawlerBuilder {
    /// Creates a builder around a finished route table.
    pub fn new(router: Router) -> Self {
        CrawlerBuilder {
            router,
            downloader: None,
            dataset: None,
            seeds: Vec::new(),
            max_concurrent_downloads: num_cpus::get().clamp(4, 16),
            max_requests_per_crawl: DEFAULT_MAX_REQUESTS_PER_CRAWL,
        }
    }

    /// Sets the seed requests the crawl starts from.
    pub fn seed_requests(mut self, seeds: Vec<Request>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Replaces the default `reqwest`-backed downloader.
    pub fn downloader(mut self, downloader: Arc<dyn Downloader>) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Sets the output sink for result records.
    pub fn dataset(mut self, dataset: Arc<dyn Dataset>) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Sets the maximum number of concurrent downloads.
    pub fn max_concurrent_downloads(mut self, limit: usize) -> Self {
        self.max_concurrent_downloads = limit;
        self
    }

    /// Bounds the total number of requests processed in this crawl.
    pub fn max_requests_per_crawl(mut self, limit: usize) -> Self {
        self.max_requests_per_crawl = limit;
        self
    }

    /// Validates the configuration and builds the crawler.
    ///
    /// Must be called from within a Tokio runtime: the scheduler's internal
    /// loop is spawned here.
    pub fn build(self) -> Result<Crawler, CrawlError> {
        if self.max_concurrent_downloads == 0 {
            return Err(CrawlError::Configuration(
                "max_concurrent_downloads must be greater than 0".to_string(),
            ));
        }
        if self.max_requests_per_crawl == 0 {
            return Err(CrawlError::Configuration(
                "max_requests_per_crawl must be greater than 0".to_string(),
            ));
        }
        if self.seeds.is_empty() {
            return Err(CrawlError::Configuration(
                "crawler needs at least one seed request".to_string(),
            ));
        }
        let dataset = self.dataset.ok_or_else(|| {
            CrawlError::Configuration("crawler needs a dataset to record into".to_string())
        })?;
        let downloader = match self.downloader {
            Some(downloader) => downloader,
            None => Arc::new(ReqwestDownloader::new()?),
        };

        let (scheduler, req_rx) = Scheduler::new(self.max_requests_per_crawl);
        let stats = Arc::new(StatCollector::new());

        Ok(Crawler::new(
            scheduler,
            req_rx,
            downloader,
            Arc::new(self.router),
            dataset,
            self.seeds,
            stats,
            self.max_concurrent_downloads,
        ))
    }
}
