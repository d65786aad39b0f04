//! HTTP fetching.
//!
//! The [`Downloader`] trait is the crawler's seam to the network: given a
//! [`Request`] it returns the final URL, status, and body. The default
//! implementation wraps a shared `reqwest` client. Retry and proxy policy
//! deliberately live behind this trait, not in the router or handlers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::CrawlError;
use crate::request::Request;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("sitespider/", env!("CARGO_PKG_VERSION"));

/// A fetched HTTP response, paired with the request that produced it.
#[derive(Debug, Clone)]
pub struct Response {
    /// The originating request, label and metadata included.
    pub request: Request,
    /// The final URL after redirects.
    pub url: Url,
    /// HTTP status of the final response.
    pub status: StatusCode,
    /// Decoded response body.
    pub body: String,
}

/// Performs the network fetch for a single request.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Fetches the request's target. Non-success statuses are errors; the
    /// router never sees a page for a failed fetch.
    async fn download(&self, request: Request) -> Result<Response, CrawlError>;
}

/// [`Downloader`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestDownloader {
    client: reqwest::Client,
}

impl ReqwestDownloader {
    /// Builds a client with the crate's default timeouts and user agent.
    pub fn new() -> Result<Self, CrawlError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(ReqwestDownloader { client })
    }
}

#[async_trait]
impl Downloader for ReqwestDownloader {
    async fn download(&self, request: Request) -> Result<Response, CrawlError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        if !status.is_success() {
            return Err(CrawlError::Status { status, url });
        }
        let body = response.text().await?;

        Ok(Response {
            request,
            url,
            status,
            body,
        })
    }
}
