//! The crawling engine.
//!
//! Orchestrates the crawl: the scheduler hands requests to a pool of fetch
//! workers, each worker downloads its page, dispatches it through the route
//! table, appends the resulting records to the dataset, and submits any new
//! requests back to the scheduler. The `Crawler` itself only wires the tasks
//! together and watches for the crawl to become idle.

mod core;
mod fetch_task;

pub use core::Crawler;
pub(crate) use fetch_task::spawn_fetch_task;
