//! The template's workflow handlers.
//!
//! Two-level crawl: the default handler processes seed pages (label
//! `START`), records their titles, and enqueues every outbound link as a
//! `DETAIL` request. The detail handler records titles and follows nothing,
//! which keeps the crawl from recursing past the first hop.

use tracing::info;

use crate::dataset::PageRecord;
use crate::error::CrawlError;
use crate::label::Label;
use crate::request::Request;
use crate::router::{HandlerOutput, PageContext, Router, RouterBuilder};

/// Default handler: runs for seed pages and any request without a label.
pub fn handle_start(ctx: PageContext<'_>) -> Result<HandlerOutput, CrawlError> {
    let url = ctx.page.loaded_url();
    info!(url = %url, "processing START page");

    let mut output = HandlerOutput::new();
    for link in ctx.page.links() {
        output.enqueue(Request::with_label(link, Label::Detail));
    }

    let title = ctx.page.title();
    info!(url = %url, title = %title, "page title");

    output.push_record(PageRecord {
        url: url.to_string(),
        title,
        label: Label::Start,
    });
    Ok(output)
}

/// `DETAIL` handler: records the page title and enqueues nothing.
pub fn handle_detail(ctx: PageContext<'_>) -> Result<HandlerOutput, CrawlError> {
    let url = ctx.page.loaded_url();
    info!(url = %url, "processing DETAIL page");

    let mut output = HandlerOutput::new();
    output.push_record(PageRecord {
        url: url.to_string(),
        title: ctx.page.title(),
        label: Label::Detail,
    });
    Ok(output)
}

/// Builds the route table for the title-recording workflow.
pub fn workflow_router() -> Result<Router, CrawlError> {
    RouterBuilder::new()
        .register_default(handle_start)?
        .register(Label::Detail, handle_detail)?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use url::Url;

    fn dispatch(html: &str, url: &str, label: Option<Label>) -> HandlerOutput {
        let router = workflow_router().unwrap();
        let loaded = Url::parse(url).unwrap();
        let page = Page::parse(loaded.clone(), html);
        let mut request = Request::new(loaded);
        request.label = label;
        router.dispatch(&page, &request).unwrap()
    }

    #[test]
    fn test_start_page_records_title_and_enqueues_links_as_detail() {
        let output = dispatch(
            r#"<html><head><title>Home</title></head>
               <body><a href="/a">a</a><a href="/b">b</a></body></html>"#,
            "https://example.test/",
            None,
        );

        let (records, requests) = output.into_parts();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            PageRecord {
                url: "https://example.test/".into(),
                title: "Home".into(),
                label: Label::Start,
            }
        );

        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.label == Some(Label::Detail)));
        let urls: Vec<String> = requests.iter().map(|r| r.url.to_string()).collect();
        assert_eq!(urls, vec!["https://example.test/a", "https://example.test/b"]);
    }

    #[test]
    fn test_start_page_without_links_still_records() {
        let output = dispatch(
            "<html><head><title>Lonely</title></head><body></body></html>",
            "https://example.test/",
            None,
        );
        assert_eq!(output.records().len(), 1);
        assert!(output.requests().is_empty());
    }

    #[test]
    fn test_detail_page_records_title_and_enqueues_nothing() {
        let output = dispatch(
            r#"<html><head><title>Leaf</title></head>
               <body><a href="/deeper">deeper</a></body></html>"#,
            "https://example.test/a",
            Some(Label::Detail),
        );
        let (records, requests) = output.into_parts();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, Label::Detail);
        assert_eq!(records[0].title, "Leaf");
        assert!(requests.is_empty());
    }

    #[test]
    fn test_detail_page_without_title_records_empty_string() {
        let output = dispatch(
            "<html><body>untitled</body></html>",
            "https://example.test/a",
            Some(Label::Detail),
        );
        assert_eq!(output.records()[0].title, "");
    }
}
