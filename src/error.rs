//! Error types for the crawler.
//!
//! Configuration problems (duplicate route registrations, invalid seed URLs,
//! zero concurrency) are surfaced before any fetch happens and are fatal to
//! startup. Everything else fails a single unit of work: the request is
//! counted and logged, and the crawl continues.

use crate::label::Label;
use thiserror::Error;
use url::Url;

/// Errors produced by the crawler and its components.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Invalid setup detected before the crawl starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A request carried a label with no registered handler.
    #[error("no handler registered for label {0}")]
    UnroutedLabel(Label),

    /// A locator could not be parsed as an absolute URL.
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level HTTP failure (connect, timeout, TLS, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: Url,
    },

    /// Filesystem failure while reading input or appending to the dataset.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The scheduler's internal channel closed while the crawl was running.
    #[error("scheduler channel closed")]
    SchedulerClosed,
}
