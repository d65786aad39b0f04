//! The unit of work handed to the crawler.
//!
//! A [`Request`] carries the target URL, an optional method/header override,
//! caller-supplied metadata, and the [`Label`] that selects its handler. Once
//! submitted to the scheduler the request is owned by the frontier; the
//! router never mutates it after dispatch.

use std::collections::HashMap;

use reqwest::Method;
use url::Url;

use crate::error::CrawlError;
use crate::label::Label;

/// A single page-fetch to be performed by the crawler.
#[derive(Debug, Clone)]
pub struct Request {
    /// Target locator.
    pub url: Url,
    /// HTTP method, `GET` unless overridden by the seed configuration.
    pub method: Method,
    /// Extra request headers.
    pub headers: HashMap<String, String>,
    /// Arbitrary caller-supplied metadata, carried through untouched.
    pub user_data: serde_json::Map<String, serde_json::Value>,
    /// Handler selector; `None` routes to the default handler.
    pub label: Option<Label>,
}

impl Request {
    /// Creates an unlabeled `GET` request.
    pub fn new(url: Url) -> Self {
        Request {
            url,
            method: Method::GET,
            headers: HashMap::new(),
            user_data: serde_json::Map::new(),
            label: None,
        }
    }

    /// Creates a labeled `GET` request.
    pub fn with_label(url: Url, label: Label) -> Self {
        Request {
            label: Some(label),
            ..Request::new(url)
        }
    }

    /// Parses a locator string into an unlabeled request.
    pub fn parse(url: &str) -> Result<Self, CrawlError> {
        let url = Url::parse(url).map_err(|source| CrawlError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Request::new(url))
    }

    /// Duplicate-detection key for the frontier: the URL with its fragment
    /// cleared. Two requests with the same fingerprint fetch the same page.
    pub fn fingerprint(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.to_string()
    }
}
