//! Append-only output sink for result records.
//!
//! Handlers emit [`PageRecord`]s; the crawler appends them to a [`Dataset`]
//! after dispatch returns. Records are write-once and arrival order carries
//! no meaning. Append and close failures propagate to the caller rather than
//! being swallowed.

use std::path::Path;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::CrawlError;
use crate::label::Label;

/// One immutable output tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// The resolved URL the page was loaded from.
    pub url: String,
    /// Extracted page title; empty when the page had none.
    pub title: String,
    /// The label of the handler that produced the record.
    pub label: Label,
}

/// An append-only, durable collection of result records.
#[async_trait]
pub trait Dataset: Send + Sync {
    /// Appends a record. Safe to call from concurrent handlers.
    async fn push(&self, record: PageRecord) -> Result<(), CrawlError>;

    /// Flushes pending writes. Called once after the crawl finishes.
    async fn close(&self) -> Result<(), CrawlError>;
}

/// Dataset backed by a newline-delimited JSON file, one record per line.
pub struct JsonLinesDataset {
    file: Mutex<File>,
}

impl JsonLinesDataset {
    /// Creates (or truncates) the output file.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let file = File::create(path).await?;
        Ok(JsonLinesDataset {
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl Dataset for JsonLinesDataset {
    async fn push(&self, record: PageRecord) -> Result<(), CrawlError> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), CrawlError> {
        let mut file = self.file.lock().await;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

/// In-memory dataset, used by tests and short-lived programmatic crawls.
#[derive(Debug, Default)]
pub struct MemoryDataset {
    records: StdMutex<Vec<PageRecord>>,
}

impl MemoryDataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        MemoryDataset::default()
    }

    /// Snapshot of all records appended so far.
    pub fn records(&self) -> Vec<PageRecord> {
        self.records.lock().expect("dataset lock poisoned").clone()
    }
}

#[async_trait]
impl Dataset for MemoryDataset {
    async fn push(&self, record: PageRecord) -> Result<(), CrawlError> {
        self.records
            .lock()
            .expect("dataset lock poisoned")
            .push(record);
        Ok(())
    }

    async fn close(&self) -> Result<(), CrawlError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_lines_dataset_appends_one_record_per_line() {
        let dir = std::env::temp_dir().join("sitespider-dataset-test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("out.jsonl");

        let dataset = JsonLinesDataset::create(&path).await.unwrap();
        dataset
            .push(PageRecord {
                url: "https://example.test/".into(),
                title: "Home".into(),
                label: Label::Start,
            })
            .await
            .unwrap();
        dataset
            .push(PageRecord {
                url: "https://example.test/a".into(),
                title: "".into(),
                label: Label::Detail,
            })
            .await
            .unwrap();
        dataset.close().await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let records: Vec<PageRecord> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, Label::Start);
        assert_eq!(records[1].title, "");
    }

    #[tokio::test]
    async fn test_memory_dataset_snapshots_records() {
        let dataset = MemoryDataset::new();
        assert!(dataset.records().is_empty());
        dataset
            .push(PageRecord {
                url: "https://example.test/".into(),
                title: "Home".into(),
                label: Label::Start,
            })
            .await
            .unwrap();
        assert_eq!(dataset.records().len(), 1);
    }
}
