//! End-to-end crawl tests against a local mock server.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitespider::{
    workflow_router, CrawlerBuilder, Label, MemoryDataset, PageRecord, Request,
};

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

async fn mount(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn run_crawl(server: &MockServer, max_requests: usize) -> Vec<PageRecord> {
    let dataset = Arc::new(MemoryDataset::new());
    let seed = Request::parse(&format!("{}/", server.uri())).unwrap();
    let crawler = CrawlerBuilder::new(workflow_router().unwrap())
        .seed_requests(vec![seed])
        .max_requests_per_crawl(max_requests)
        .max_concurrent_downloads(4)
        .dataset(Arc::clone(&dataset) as Arc<dyn sitespider::Dataset>)
        .build()
        .unwrap();
    crawler.run().await.unwrap();
    dataset.records()
}

#[tokio::test]
async fn crawl_records_start_and_detail_titles() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        r#"<html><head><title>Home</title></head>
           <body><a href="/a">a</a><a href="/b">b</a></body></html>"#,
    )
    .await;
    mount(
        &server,
        "/a",
        "<html><head><title>Alpha</title></head><body></body></html>",
    )
    .await;
    // /b deliberately has no <title> element.
    mount(&server, "/b", "<html><body>untitled</body></html>").await;

    let mut records = run_crawl(&server, 100).await;
    records.sort_by(|a, b| a.url.cmp(&b.url));

    let base = server.uri();
    assert_eq!(
        records,
        vec![
            PageRecord {
                url: format!("{base}/"),
                title: "Home".into(),
                label: Label::Start,
            },
            PageRecord {
                url: format!("{base}/a"),
                title: "Alpha".into(),
                label: Label::Detail,
            },
            PageRecord {
                url: format!("{base}/b"),
                title: "".into(),
                label: Label::Detail,
            },
        ]
    );
}

#[tokio::test]
async fn crawl_deduplicates_repeated_links() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        r#"<html><head><title>Home</title></head>
           <body>
             <a href="/a">first</a>
             <a href="/a">again</a>
             <a href="/a#section">fragment</a>
           </body></html>"#,
    )
    .await;
    mount(
        &server,
        "/a",
        "<html><head><title>Alpha</title></head><body></body></html>",
    )
    .await;

    let records = run_crawl(&server, 100).await;
    let detail_count = records
        .iter()
        .filter(|r| r.label == Label::Detail)
        .count();
    assert_eq!(detail_count, 1);
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn crawl_honors_run_limit() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        r#"<html><head><title>Home</title></head>
           <body><a href="/a">a</a><a href="/b">b</a></body></html>"#,
    )
    .await;
    mount(&server, "/a", "<html><head><title>Alpha</title></head></html>").await;
    mount(&server, "/b", "<html><head><title>Beta</title></head></html>").await;

    // Only the seed is allowed through.
    let records = run_crawl(&server, 1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].label, Label::Start);
    assert_eq!(records[0].title, "Home");
}

#[tokio::test]
async fn crawl_continues_past_failed_detail_fetch() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        r#"<html><head><title>Home</title></head>
           <body><a href="/gone">gone</a><a href="/a">a</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount(
        &server,
        "/a",
        "<html><head><title>Alpha</title></head><body></body></html>",
    )
    .await;

    let mut records = run_crawl(&server, 100).await;
    records.sort_by(|a, b| a.url.cmp(&b.url));

    // The 404 page produces no record; the healthy pages still do.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Home");
    assert_eq!(records[1].title, "Alpha");
}

#[tokio::test]
async fn crawl_records_start_page_with_no_links() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        "<html><head><title>Lonely</title></head><body></body></html>",
    )
    .await;

    let records = run_crawl(&server, 100).await;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0],
        PageRecord {
            url: format!("{}/", server.uri()),
            title: "Lonely".into(),
            label: Label::Start,
        }
    );
}
