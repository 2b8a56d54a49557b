//! spacetraveling: post listing and navigation for a headless-CMS backed blog
//!
//! This crate provides the content layer of the Spacetraveling site: paginated
//! post listings with "load more" continuation, post detail with reading time
//! and previous/next links, and preview (draft) reconciliation.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod navigation;
pub mod pagination;
pub mod preview;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;

use indexmap::IndexSet;
use serde::Serialize;
use std::num::NonZeroUsize;

use content::{map_detail, map_summary, reading_minutes, PostSummary, PostView};
use error::{ContentError, Result};
use navigation::NavigationResolver;
use pagination::{Page, Paginator};
use preview::PreviewContext;
use source::{ContentSource, Ordering, Query};

/// How paths missing from the prebuilt set are served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Fallback {
    /// Generate the page on first request and keep it afterwards
    OnDemand,
}

/// Post paths known at build time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticPaths {
    /// Post uids in upstream order
    pub uids: IndexSet<String>,
    pub fallback: Fallback,
}

impl StaticPaths {
    /// Whether `uid` is prebuilt rather than generated on demand
    pub fn is_prebuilt(&self, uid: &str) -> bool {
        self.uids.contains(uid)
    }
}

/// The Spacetraveling content pipeline
pub struct Spacetraveling<S> {
    /// Site configuration
    pub config: config::SiteConfig,
    source: S,
}

impl<S: ContentSource> Spacetraveling<S> {
    /// Create a pipeline reading from `source`
    pub fn new(config: config::SiteConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn post_type(&self) -> &str {
        &self.config.post_type
    }

    fn listing_query(&self) -> Query {
        let doc_type = self.post_type();
        let mut query = Query::of_type(doc_type).fetch(
            ["title", "subtitle", "author"]
                .iter()
                .map(|field| format!("{}.{}", doc_type, field)),
        );

        for clause in &self.config.listing_order {
            match Ordering::parse(clause, doc_type) {
                Some(ordering) => query = query.order_by(ordering),
                None => tracing::warn!("Ignoring invalid listing_order entry: {:?}", clause),
            }
        }

        query
    }

    /// First page of the home listing
    pub async fn list_posts(
        &self,
        page_size: NonZeroUsize,
        preview: &PreviewContext,
    ) -> Result<Page<PostSummary>> {
        let page = Paginator::new(&self.source)
            .fetch_page(&self.listing_query(), page_size, preview.content_ref())
            .await?;
        page.try_map(|record| map_summary(&record))
    }

    /// The listing page following `cursor` ("load more")
    pub async fn next_posts_page(
        &self,
        cursor: Option<&str>,
        preview: &PreviewContext,
    ) -> Result<Page<PostSummary>> {
        let page = Paginator::new(&self.source)
            .fetch_next(cursor, preview.content_ref())
            .await?;
        page.try_map(|record| map_summary(&record))
    }

    /// A post with its reading time and neighbors.
    ///
    /// A `NotFound` error means the post does not exist at the resolved
    /// revision; callers decide between a "still generating" placeholder and
    /// a hard 404.
    ///
    /// Navigation anchors on the upstream document id, so it only starts once
    /// the record is fetched; its two neighbor queries then run concurrently.
    pub async fn get_post_detail(&self, uid: &str, preview: &PreviewContext) -> Result<PostView> {
        let content_ref = preview.content_ref();
        let record = self
            .source
            .get_by_uid(self.post_type(), uid, content_ref)
            .await?;

        let post = map_detail(&record)?;
        let minutes = reading_minutes(&post.content);

        let navigation = NavigationResolver::new(&self.source, self.post_type())
            .resolve(&post.id, post.summary.published_at, content_ref)
            .await?;

        Ok(PostView {
            post,
            reading_minutes: minutes,
            navigation,
        })
    }

    /// Uids of the posts to prebuild.
    ///
    /// Reads one page of `paths_page_size` uids from the published revision;
    /// anything beyond it is generated on demand.
    pub async fn resolve_all_known_post_ids(&self) -> Result<StaticPaths> {
        let query = Query::of_type(self.post_type()).fetch([format!("{}.uid", self.post_type())]);
        let page = Paginator::new(&self.source)
            .fetch_page(&query, self.config.paths_page_size, None)
            .await?;

        let mut uids = IndexSet::with_capacity(page.results.len());
        for record in &page.results {
            match record.uid.as_deref().map(str::trim) {
                Some(uid) if !uid.is_empty() => {
                    uids.insert(uid.to_string());
                }
                _ => {
                    return Err(ContentError::MalformedRecord(format!(
                        "record {} has no uid",
                        record.id.as_deref().unwrap_or("<unknown id>")
                    )))
                }
            }
        }

        if !page.is_last() {
            tracing::info!(
                "More than {} posts; the rest are generated on demand",
                self.config.paths_page_size
            );
        }

        Ok(StaticPaths {
            uids,
            fallback: Fallback::OnDemand,
        })
    }
}
