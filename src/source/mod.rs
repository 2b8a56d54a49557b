//! Content source - the headless document API the site reads posts from

mod http;
mod memory;
mod query;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::content::RawRecord;
use crate::error::Result;

pub use http::HttpSource;
pub use memory::{Fixture, MemorySource};
pub use query::{Direction, OrderField, Ordering, Predicate, Query};

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    pub results: Vec<RawRecord>,
    /// Continuation, absent on the last page
    pub next_page: Option<String>,
    pub total_results_size: Option<usize>,
}

/// Retrieves documents from the content source.
///
/// Implementations make exactly one upstream request per call and never
/// retry. A query with `after` set returns the documents that precede the
/// anchor document in the requested ordering, nearest first.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run a bounded search
    async fn query(&self, query: &Query) -> Result<ApiResponse>;

    /// Follow a continuation cursor at `content_ref`, whatever ref the cursor
    /// carries; `None` reads the published revision
    async fn query_next(&self, cursor: &str, content_ref: Option<&str>) -> Result<ApiResponse>;

    /// Fetch the single document of `doc_type` identified by `uid`
    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        content_ref: Option<&str>,
    ) -> Result<RawRecord>;
}
