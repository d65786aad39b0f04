//! Request labels.
//!
//! A [`Label`] classifies a request's role in the crawl and selects the
//! handler that processes its fetched page. The set is closed: using an enum
//! instead of string literals means seed configuration, enqueue calls, and
//! route-table keys all share one type, and a typo cannot silently route a
//! page to the wrong handler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CrawlError;

/// Role of a request in the crawl workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    /// A seed page: records its title and enqueues every outbound link.
    Start,
    /// A linked page: records its title and enqueues nothing.
    Detail,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Start => write!(f, "START"),
            Label::Detail => write!(f, "DETAIL"),
        }
    }
}

impl FromStr for Label {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(Label::Start),
            "DETAIL" => Ok(Label::Detail),
            other => Err(CrawlError::Configuration(format!(
                "unknown label `{other}`"
            ))),
        }
    }
}
