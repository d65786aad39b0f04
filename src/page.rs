//! A fetched, parsed page.
//!
//! [`Page`] pairs the loaded (post-redirect) URL with the parsed HTML
//! document and exposes the two queries the workflow handlers need: the page
//! title and the outbound links. The document lives only for the duration of
//! one handler invocation; the router never retains it.

use scraper::{Html, Selector};
use url::Url;

/// A successfully fetched and parsed HTML page.
pub struct Page {
    loaded_url: Url,
    document: Html,
}

impl Page {
    /// Parses raw HTML into a queryable page.
    pub fn parse(loaded_url: Url, html: &str) -> Self {
        Page {
            loaded_url,
            document: Html::parse_document(html),
        }
    }

    /// The resolved URL the body was loaded from.
    pub fn loaded_url(&self) -> &Url {
        &self.loaded_url
    }

    /// Text content of the first `<title>` element, trimmed.
    ///
    /// A page without a title yields the empty string; absence is not a
    /// failure condition.
    pub fn title(&self) -> String {
        let selector = Selector::parse("title").ok();
        selector
            .as_ref()
            .and_then(|sel| self.document.select(sel).next())
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// All outbound hyperlinks, resolved against the loaded URL.
    ///
    /// Fragment-only references, `javascript:` pseudo-links, and non-HTTP
    /// schemes are skipped.
    pub fn links(&self) -> Vec<Url> {
        let Some(selector) = Selector::parse("a[href]").ok() else {
            return Vec::new();
        };
        self.document
            .select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .filter_map(|href| self.resolve(href))
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .collect()
    }

    fn resolve(&self, reference: &str) -> Option<Url> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with('#') || lower.starts_with('?') || lower.starts_with("javascript:") {
            return None;
        }
        if let Ok(url) = Url::parse(trimmed) {
            return Some(url);
        }
        self.loaded_url.join(trimmed).ok()
    }
}
