//! # sitespider
//!
//! A minimal labeled-route website crawler: fetch a start page, record its
//! title, enqueue its outbound links, and record the title of each linked
//! page in an append-only dataset.
//!
//! The one reusable piece of design is the [`Router`]: an immutable table
//! mapping request labels to pure page handlers, assembled once before the
//! crawl and dispatched against for every fetched page. Everything around it
//! (scheduler/frontier, downloader, dataset sink) is thin engine plumbing.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sitespider::{CrawlerBuilder, JsonLinesDataset, Request, workflow_router};
//!
//! async fn run() -> Result<(), sitespider::CrawlError> {
//!     let dataset = Arc::new(JsonLinesDataset::create("dataset.jsonl").await?);
//!     let crawler = CrawlerBuilder::new(workflow_router()?)
//!         .seed_requests(vec![Request::parse("https://example.com/")?])
//!         .max_requests_per_crawl(100)
//!         .dataset(dataset)
//!         .build()?;
//!     crawler.run().await
//! }
//! ```

pub mod builder;
pub mod config;
pub mod crawler;
pub mod dataset;
pub mod downloader;
pub mod error;
pub mod handlers;
pub mod label;
pub mod page;
pub mod prelude;
pub mod request;
pub mod router;
pub mod scheduler;
pub mod state;
pub mod stats;

pub use builder::CrawlerBuilder;
pub use config::CrawlInput;
pub use crawler::Crawler;
pub use dataset::{Dataset, JsonLinesDataset, MemoryDataset, PageRecord};
pub use downloader::{Downloader, ReqwestDownloader, Response};
pub use error::CrawlError;
pub use handlers::workflow_router;
pub use label::Label;
pub use page::Page;
pub use request::Request;
pub use router::{HandlerOutput, PageContext, Router, RouterBuilder};
pub use scheduler::Scheduler;

pub use async_trait::async_trait;
pub use tokio;
