//! Paginated listing with "load more" continuation

use serde::Serialize;
use std::num::NonZeroUsize;

use crate::content::RawRecord;
use crate::error::{ContentError, Result};
use crate::source::{ApiResponse, ContentSource, Query};

/// One page of results and the cursor to the next one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Opaque continuation, `None` at the end of the stream
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            results,
            next_cursor: next_cursor.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Whether this is the final page
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            results: self.results.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            results: self
                .results
                .into_iter()
                .map(f)
                .collect::<Result<_, E>>()?,
            next_cursor: self.next_cursor,
        })
    }
}

impl From<ApiResponse> for Page<RawRecord> {
    fn from(response: ApiResponse) -> Self {
        Page::new(response.results, response.next_page)
    }
}

/// Results accumulated across "load more" calls.
///
/// New pages are always appended, so the feed reads top to bottom in the
/// order the pages were fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed<T> {
    items: Vec<T>,
    next_cursor: Option<String>,
}

impl<T> Feed<T> {
    /// Add a continuation page, returning the grown feed
    pub fn append(self, page: Page<T>) -> Self {
        let mut items = self.items;
        items.extend(page.results);
        Self {
            items,
            next_cursor: page.next_cursor,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Whether a "load more" is possible
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> From<Page<T>> for Feed<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.results,
            next_cursor: page.next_cursor,
        }
    }
}

/// Issues listing queries against a content source
pub struct Paginator<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: ContentSource + ?Sized> Paginator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch the first page of `query`
    pub async fn fetch_page(
        &self,
        query: &Query,
        page_size: NonZeroUsize,
        content_ref: Option<&str>,
    ) -> Result<Page<RawRecord>> {
        let query = query.clone().page_size(page_size).content_ref(content_ref);
        tracing::debug!(
            "Fetching page of {} (size {}, ref {:?})",
            query.q_param(),
            page_size,
            content_ref
        );
        Ok(self.source.query(&query).await?.into())
    }

    /// Fetch the page following a previous page.
    ///
    /// Only valid while the previous page had a cursor; calling it at the end
    /// of the stream is a caller bug and fails with `InvalidCursor`.
    pub async fn fetch_next(
        &self,
        cursor: Option<&str>,
        content_ref: Option<&str>,
    ) -> Result<Page<RawRecord>> {
        let cursor = cursor.filter(|c| !c.trim().is_empty()).ok_or_else(|| {
            ContentError::InvalidCursor("no cursor: the previous page was the last".to_string())
        })?;

        tracing::debug!("Fetching continuation page (ref {:?})", content_ref);
        Ok(self.source.query_next(cursor, content_ref).await?.into())
    }
}
