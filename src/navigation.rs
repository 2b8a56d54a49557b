//! Previous/next post resolution

use chrono::{DateTime, Utc};

use crate::content::{map_nav_post, NavPost, NavigationLinks};
use crate::error::{ContentError, NavigationFailure, Result};
use crate::source::{ContentSource, OrderField, Ordering, Query};

/// Finds the chronological neighbors of a post.
///
/// The two lookups use different orderings: "previous" walks
/// ascending first-publication order, "next" walks descending
/// last-publication order. Both anchor on the subject's document id with
/// `after` and take a single result. Posts edited after publication can
/// therefore link to a different "next" than a symmetric ordering would give.
pub struct NavigationResolver<'a, S: ?Sized> {
    source: &'a S,
    doc_type: &'a str,
}

impl<'a, S: ContentSource + ?Sized> NavigationResolver<'a, S> {
    pub fn new(source: &'a S, doc_type: &'a str) -> Self {
        Self { source, doc_type }
    }

    fn previous_query(&self, subject_id: &str, content_ref: Option<&str>) -> Query {
        Query::of_type(self.doc_type)
            .fetch([format!("{}.title", self.doc_type)])
            .content_ref(content_ref)
            .order_by(Ordering::asc(OrderField::FirstPublicationDate))
            .after(subject_id)
    }

    fn next_query(&self, subject_id: &str, content_ref: Option<&str>) -> Query {
        Query::of_type(self.doc_type)
            .fetch([format!("{}.title", self.doc_type)])
            .content_ref(content_ref)
            .order_by(Ordering::desc(OrderField::LastPublicationDate))
            .after(subject_id)
    }

    async fn neighbor(&self, query: Query) -> Result<Option<NavPost>> {
        let response = self.source.query(&query).await?;
        response.results.first().map(map_nav_post).transpose()
    }

    /// Resolve both neighbors of the subject post.
    ///
    /// The two queries run concurrently. If either fails the result is a
    /// `Navigation` error holding both outcomes; an empty result on one side
    /// is a series boundary and yields `None` for that link.
    pub async fn resolve(
        &self,
        subject_id: &str,
        subject_published_at: Option<DateTime<Utc>>,
        content_ref: Option<&str>,
    ) -> Result<NavigationLinks> {
        tracing::debug!(
            "Resolving neighbors of {} (published {:?}, ref {:?})",
            subject_id,
            subject_published_at,
            content_ref
        );

        let (previous, next) = tokio::join!(
            self.neighbor(self.previous_query(subject_id, content_ref)),
            self.neighbor(self.next_query(subject_id, content_ref)),
        );

        match (previous, next) {
            (Ok(previous), Ok(next)) => Ok(NavigationLinks { previous, next }),
            (previous, next) => Err(ContentError::Navigation(NavigationFailure {
                previous: previous.err().map(Box::new),
                next: next.err().map(Box::new),
            })),
        }
    }
}
