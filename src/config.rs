//! Process input configuration.
//!
//! Mirrors the JSON input an operator supplies at process start: a list of
//! seed locators (with optional method, headers, metadata, and label) and
//! the per-crawl request limit. Field names are camelCase to match the
//! conventional input document shape.

use std::collections::HashMap;
use std::path::Path;

use reqwest::Method;
use serde::Deserialize;
use url::Url;

use crate::builder::DEFAULT_MAX_REQUESTS_PER_CRAWL;
use crate::error::CrawlError;
use crate::label::Label;
use crate::request::Request;

/// Seed used when the input supplies no start URLs.
pub const DEFAULT_START_URL: &str = "https://tw.trip.com/flights/";

/// The crawl's input document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrawlInput {
    /// Seed requests; empty means the single default seed.
    pub start_urls: Vec<StartUrl>,
    /// Upper bound on requests processed in one crawl.
    pub max_requests_per_crawl: usize,
}

impl Default for CrawlInput {
    fn default() -> Self {
        CrawlInput {
            start_urls: Vec::new(),
            max_requests_per_crawl: DEFAULT_MAX_REQUESTS_PER_CRAWL,
        }
    }
}

/// One seed entry from the input document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartUrl {
    /// Target locator, absolute.
    pub url: String,
    /// Optional HTTP method override, e.g. `"POST"`.
    #[serde(default)]
    pub method: Option<String>,
    /// Extra request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Arbitrary metadata carried on the request.
    #[serde(default)]
    pub user_data: serde_json::Map<String, serde_json::Value>,
    /// Optional label; absent routes to the default handler.
    #[serde(default)]
    pub label: Option<Label>,
}

impl StartUrl {
    fn into_request(self) -> Result<Request, CrawlError> {
        let url = Url::parse(&self.url).map_err(|source| CrawlError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;
        let method = match self.method.as_deref() {
            Some(name) => parse_method(name)?,
            None => Method::GET,
        };
        Ok(Request {
            url,
            method,
            headers: self.headers,
            user_data: self.user_data,
            label: self.label,
        })
    }
}

/// Accepts the standard HTTP methods only; extension methods are a
/// configuration error.
fn parse_method(name: &str) -> Result<Method, CrawlError> {
    match name.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "HEAD" => Ok(Method::HEAD),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "TRACE" => Ok(Method::TRACE),
        "OPTIONS" => Ok(Method::OPTIONS),
        "CONNECT" => Ok(Method::CONNECT),
        "PATCH" => Ok(Method::PATCH),
        other => Err(CrawlError::Configuration(format!(
            "unsupported http method `{other}`"
        ))),
    }
}

impl CrawlInput {
    /// Reads and parses the input document from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let bytes = tokio::fs::read(path).await?;
        let input = serde_json::from_slice(&bytes)?;
        Ok(input)
    }

    /// Converts the configured start URLs into seed requests, substituting
    /// the default seed when none were given.
    pub fn seed_requests(&self) -> Result<Vec<Request>, CrawlError> {
        if self.start_urls.is_empty() {
            return Ok(vec![Request::parse(DEFAULT_START_URL)?]);
        }
        self.start_urls
            .iter()
            .cloned()
            .map(StartUrl::into_request)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_fields_missing() {
        let input: CrawlInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.max_requests_per_crawl, 100);
        let seeds = input.seed_requests().unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].url.as_str(), DEFAULT_START_URL);
        assert_eq!(seeds[0].label, None);
    }

    #[test]
    fn test_full_input_document_parses() {
        let input: CrawlInput = serde_json::from_str(
            r#"{
                "startUrls": [{
                    "url": "https://example.test/",
                    "method": "head",
                    "headers": {"x-probe": "1"},
                    "userData": {"depth": 0},
                    "label": "START"
                }],
                "maxRequestsPerCrawl": 5
            }"#,
        )
        .unwrap();
        assert_eq!(input.max_requests_per_crawl, 5);
        let seeds = input.seed_requests().unwrap();
        assert_eq!(seeds[0].method, Method::HEAD);
        assert_eq!(seeds[0].headers.get("x-probe").unwrap(), "1");
        assert_eq!(seeds[0].label, Some(Label::Start));
    }

    #[test]
    fn test_invalid_seed_url_is_rejected() {
        let input: CrawlInput = serde_json::from_str(
            r#"{"startUrls": [{"url": "not a url"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            input.seed_requests(),
            Err(CrawlError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_unknown_method_is_configuration_error() {
        let input: CrawlInput = serde_json::from_str(
            r#"{"startUrls": [{"url": "https://example.test/", "method": "FLY"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            input.seed_requests(),
            Err(CrawlError::Configuration(_))
        ));
    }
}
