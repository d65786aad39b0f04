//! Label-based page dispatch.
//!
//! The [`Router`] owns the route table: a mapping from [`Label`] to handler
//! plus one distinguished default handler. The table is assembled once via
//! [`RouterBuilder`] before the crawl starts and is immutable during
//! dispatch, so `dispatch` is a pure, synchronous lookup that can be tested
//! without a fetch engine.
//!
//! Handlers are pure functions `(PageContext) -> HandlerOutput`: they read
//! the fetched page and return the records to append and the requests to
//! enqueue. All I/O (dataset appends, frontier submissions) happens in the
//! crawler after dispatch returns.

use std::collections::HashMap;

use crate::dataset::PageRecord;
use crate::error::CrawlError;
use crate::label::Label;
use crate::page::Page;
use crate::request::Request;

/// Read-only view a handler receives for one fetched page.
pub struct PageContext<'a> {
    /// The fetched and parsed page.
    pub page: &'a Page,
    /// The request that produced it, including its metadata.
    pub request: &'a Request,
}

/// What a handler produced for one page: records to append and requests to
/// enqueue. Both may be empty; record emission is independent of enqueues.
#[derive(Debug, Default)]
pub struct HandlerOutput {
    records: Vec<PageRecord>,
    requests: Vec<Request>,
}

impl HandlerOutput {
    /// Creates an empty output.
    pub fn new() -> Self {
        HandlerOutput::default()
    }

    /// Adds a result record to append to the dataset.
    pub fn push_record(&mut self, record: PageRecord) {
        self.records.push(record);
    }

    /// Adds a request to submit to the frontier. Fire-and-forget: the handler
    /// never waits for the enqueued page to be fetched.
    pub fn enqueue(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Records produced so far.
    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    /// Requests enqueued so far.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Splits the output into its parts for processing.
    pub fn into_parts(self) -> (Vec<PageRecord>, Vec<Request>) {
        (self.records, self.requests)
    }
}

/// A page handler registered for one label (or as the default).
pub type Handler =
    Box<dyn Fn(PageContext<'_>) -> Result<HandlerOutput, CrawlError> + Send + Sync>;

/// Assembles a [`Router`] before the crawl starts.
///
/// Registration mistakes (duplicate label, second default, missing default)
/// are configuration errors raised here, never mid-crawl.
#[derive(Default)]
pub struct RouterBuilder {
    routes: HashMap<Label, Handler>,
    default_handler: Option<Handler>,
}

impl RouterBuilder {
    /// Creates an empty route table.
    pub fn new() -> Self {
        RouterBuilder::default()
    }

    /// Associates a handler with a label.
    pub fn register<F>(mut self, label: Label, handler: F) -> Result<Self, CrawlError>
    where
        F: Fn(PageContext<'_>) -> Result<HandlerOutput, CrawlError> + Send + Sync + 'static,
    {
        if self.routes.contains_key(&label) {
            return Err(CrawlError::Configuration(format!(
                "a handler is already registered for label {label}"
            )));
        }
        self.routes.insert(label, Box::new(handler));
        Ok(self)
    }

    /// Sets the handler for requests that carry no label.
    pub fn register_default<F>(mut self, handler: F) -> Result<Self, CrawlError>
    where
        F: Fn(PageContext<'_>) -> Result<HandlerOutput, CrawlError> + Send + Sync + 'static,
    {
        if self.default_handler.is_some() {
            return Err(CrawlError::Configuration(
                "a default handler is already registered".to_string(),
            ));
        }
        self.default_handler = Some(Box::new(handler));
        Ok(self)
    }

    /// Finalizes the route table. A router without a default handler cannot
    /// route unlabeled requests, so its absence fails here.
    pub fn build(self) -> Result<Router, CrawlError> {
        let default_handler = self.default_handler.ok_or_else(|| {
            CrawlError::Configuration("router has no default handler".to_string())
        })?;
        Ok(Router {
            routes: self.routes,
            default_handler,
        })
    }
}

/// Immutable route table performing label-based dispatch.
pub struct Router {
    routes: HashMap<Label, Handler>,
    default_handler: Handler,
}

impl Router {
    /// Dispatches a fetched page to the handler selected by the request's
    /// label. An unlabeled request goes to the default handler. A label with
    /// no registration is a classification error that fails only this unit
    /// of work.
    pub fn dispatch(&self, page: &Page, request: &Request) -> Result<HandlerOutput, CrawlError> {
        let context = PageContext { page, request };
        match request.label {
            Some(label) => match self.routes.get(&label) {
                Some(handler) => handler(context),
                None => Err(CrawlError::UnroutedLabel(label)),
            },
            None => (self.default_handler)(context),
        }
    }
}
