//! Entrypoint: read the input document, build the title-recording workflow,
//! and run the crawl.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitespider::{workflow_router, CrawlInput, CrawlerBuilder, JsonLinesDataset};

const DATASET_PATH: &str = "dataset.jsonl";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Input path comes from the first argument or CRAWL_INPUT; without
    // either, the built-in defaults apply (one seed, 100 requests).
    let input_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CRAWL_INPUT").ok());
    let input = match input_path {
        Some(path) => CrawlInput::load(&path)
            .await
            .with_context(|| format!("failed to load crawl input from {path}"))?,
        None => CrawlInput::default(),
    };

    let seeds = input.seed_requests().context("invalid seed requests")?;
    info!(
        seeds = seeds.len(),
        max_requests_per_crawl = input.max_requests_per_crawl,
        dataset = DATASET_PATH,
        "starting crawl"
    );

    let dataset = Arc::new(
        JsonLinesDataset::create(DATASET_PATH)
            .await
            .context("failed to create dataset file")?,
    );

    let crawler = CrawlerBuilder::new(workflow_router()?)
        .seed_requests(seeds)
        .max_requests_per_crawl(input.max_requests_per_crawl)
        .dataset(dataset)
        .build()?;

    crawler.run().await.context("crawl failed")?;
    Ok(())
}
