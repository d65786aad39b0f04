//! A "prelude" for users of the `sitespider` crate.
//!
//! Re-exports the most commonly used types so they can be imported in one
//! line.
//!
//! # Example
//!
//! ```
//! use sitespider::prelude::*;
//! ```

pub use crate::{
    // Core structs
    Crawler,
    CrawlerBuilder,
    Router,
    RouterBuilder,
    // Core traits
    Dataset,
    Downloader,
    // Workflow types
    CrawlError,
    HandlerOutput,
    Label,
    PageContext,
    PageRecord,
    Request,
    // Essential re-export for trait implementation
    async_trait,
};
