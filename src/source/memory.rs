//! In-memory content source backed by a JSON fixture

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::query::{Direction, OrderField, Ordering, Predicate, Query};
use super::{ApiResponse, ContentSource};
use crate::content::RawRecord;
use crate::error::{ContentError, Result};

/// Documents of a content repository: the published revision plus drafts
/// keyed by preview reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub published: Vec<RawRecord>,
    pub drafts: HashMap<String, Vec<RawRecord>>,
}

/// Continuation state, serialized into the opaque cursor string
#[derive(Debug, Serialize, Deserialize)]
struct MemoryCursor {
    query: Query,
    page: usize,
}

/// Content source that answers queries from memory.
///
/// Records keep their insertion order unless a query asks for an ordering.
/// A draft revision is the published revision with the draft records
/// replacing (by uid) or added to the published ones.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    fixture: Fixture,
}

impl MemorySource {
    /// Create a source holding only published documents
    pub fn new(published: Vec<RawRecord>) -> Self {
        Self {
            fixture: Fixture {
                published,
                drafts: HashMap::new(),
            },
        }
    }

    /// Add a draft revision reachable through `reference`
    pub fn with_draft(mut self, reference: &str, records: Vec<RawRecord>) -> Self {
        self.fixture.drafts.insert(reference.to_string(), records);
        self
    }

    /// Load a fixture file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
        let fixture: Fixture = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixture: {}", path.display()))?;
        tracing::debug!(
            "Loaded fixture {:?}: {} published, {} draft refs",
            path,
            fixture.published.len(),
            fixture.drafts.len()
        );
        Ok(Self { fixture })
    }

    fn revision(&self, content_ref: Option<&str>) -> Result<Vec<RawRecord>> {
        let mut records = self.fixture.published.clone();

        if let Some(reference) = content_ref {
            let drafts = self.fixture.drafts.get(reference).ok_or_else(|| {
                ContentError::UpstreamUnavailable(format!("unknown ref '{}'", reference))
            })?;

            for draft in drafts {
                match records.iter_mut().find(|r| r.uid.is_some() && r.uid == draft.uid) {
                    Some(existing) => *existing = draft.clone(),
                    None => records.push(draft.clone()),
                }
            }
        }

        Ok(records)
    }

    fn run(&self, query: &Query, page: usize) -> Result<ApiResponse> {
        let mut records: Vec<RawRecord> = self
            .revision(query.content_ref.as_deref())?
            .into_iter()
            .filter(|r| query.predicates.iter().all(|p| matches_predicate(r, p)))
            .collect();

        // Stable sort: ties keep insertion order
        records.sort_by(|a, b| {
            query
                .orderings
                .iter()
                .map(|o| compare(a, b, o))
                .find(|c| *c != CmpOrdering::Equal)
                .unwrap_or(CmpOrdering::Equal)
        });

        if let Some(anchor) = &query.after {
            records = match records.iter().position(|r| r.id.as_ref() == Some(anchor)) {
                Some(pos) => records[..pos].iter().rev().cloned().collect(),
                None => Vec::new(),
            };
        }

        let total = records.len();
        let size = query.page_size.get();
        let start = page.saturating_sub(1).saturating_mul(size);
        let end = start.saturating_add(size).min(total);

        let results = records
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|r| project(r, &query.fetch))
            .collect();

        let next_page = if end < total {
            let cursor = MemoryCursor {
                query: query.clone(),
                page: page + 1,
            };
            Some(serde_json::to_string(&cursor).map_err(|e| {
                ContentError::UpstreamUnavailable(format!("failed to encode cursor: {}", e))
            })?)
        } else {
            None
        };

        tracing::debug!(
            "Memory query page {} returned {} of {} records",
            page,
            end.saturating_sub(start),
            total
        );

        Ok(ApiResponse {
            results,
            next_page,
            total_results_size: Some(total),
        })
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn query(&self, query: &Query) -> Result<ApiResponse> {
        self.run(query, 1)
    }

    async fn query_next(&self, cursor: &str, content_ref: Option<&str>) -> Result<ApiResponse> {
        let mut cursor: MemoryCursor = serde_json::from_str(cursor)
            .map_err(|e| ContentError::InvalidCursor(format!("unrecognized cursor: {}", e)))?;

        // The caller's revision wins over the one the cursor was minted on
        cursor.query.content_ref = content_ref.map(str::to_string);

        self.run(&cursor.query, cursor.page)
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        content_ref: Option<&str>,
    ) -> Result<RawRecord> {
        let mut query = Query::of_type(doc_type).content_ref(content_ref);
        query.predicates.push(Predicate::uid(doc_type, uid));

        self.run(&query, 1)?
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}

fn matches_predicate(record: &RawRecord, predicate: &Predicate) -> bool {
    let Predicate::At { path, value } = predicate;

    match path.as_str() {
        "document.type" => record.doc_type.as_deref() == Some(value.as_str()),
        "document.id" => record.id.as_deref() == Some(value.as_str()),
        _ => {
            let Some(rest) = path.strip_prefix("my.") else {
                return false;
            };
            let Some((doc_type, field)) = rest.split_once('.') else {
                return false;
            };
            if record.doc_type.as_deref() != Some(doc_type) {
                return false;
            }
            if field == "uid" {
                record.uid.as_deref() == Some(value.as_str())
            } else {
                record.field(field).and_then(Value::as_str) == Some(value.as_str())
            }
        }
    }
}

fn compare(a: &RawRecord, b: &RawRecord, ordering: &Ordering) -> CmpOrdering {
    let cmp = match &ordering.field {
        OrderField::FirstPublicationDate => a.first_published_at().cmp(&b.first_published_at()),
        OrderField::LastPublicationDate => a.last_published_at().cmp(&b.last_published_at()),
        OrderField::Field(path) => {
            let name = path.rsplit('.').next().unwrap_or(path);
            let key = |r: &RawRecord| r.field(name).map(|v| v.to_string());
            key(a).cmp(&key(b))
        }
    };

    match ordering.direction {
        Direction::Asc => cmp,
        Direction::Desc => cmp.reverse(),
    }
}

/// Keep only the requested `type.field` data fields
fn project(record: &RawRecord, fetch: &[String]) -> RawRecord {
    if fetch.is_empty() {
        return record.clone();
    }

    let doc_type = record.doc_type.as_deref().unwrap_or_default();
    let data = match &record.data {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(name, _)| fetch.iter().any(|f| *f == format!("{}.{}", doc_type, name)))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    };

    RawRecord {
        data,
        ..record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::five_posts;
    use serde_json::json;
    use std::num::NonZeroUsize;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn uids(response: &ApiResponse) -> Vec<&str> {
        response
            .results
            .iter()
            .filter_map(|r| r.uid.as_deref())
            .collect()
    }

    #[tokio::test]
    async fn test_pages_in_insertion_order() {
        let source = MemorySource::new(five_posts());
        let query = Query::of_type("posts").page_size(size(2));

        let first = source.query(&query).await.unwrap();
        assert_eq!(uids(&first), vec!["p1", "p2"]);
        assert_eq!(first.total_results_size, Some(5));

        let cursor = first.next_page.unwrap();
        let second = source.query_next(&cursor, None).await.unwrap();
        assert_eq!(uids(&second), vec!["p3", "p4"]);

        let third = source
            .query_next(&second.next_page.unwrap(), None)
            .await
            .unwrap();
        assert_eq!(uids(&third), vec!["p5"]);
        assert!(third.next_page.is_none());
    }

    #[tokio::test]
    async fn test_orderings() {
        let source = MemorySource::new(five_posts());
        let query = Query::of_type("posts")
            .page_size(size(3))
            .order_by(Ordering::desc(OrderField::FirstPublicationDate));

        let response = source.query(&query).await.unwrap();
        assert_eq!(uids(&response), vec!["p5", "p4", "p3"]);
    }

    #[tokio::test]
    async fn test_after_returns_preceding_documents_nearest_first() {
        let source = MemorySource::new(five_posts());
        let query = Query::of_type("posts")
            .page_size(size(10))
            .order_by(Ordering::asc(OrderField::FirstPublicationDate))
            .after("doc-4");

        let response = source.query(&query).await.unwrap();
        assert_eq!(uids(&response), vec!["p3", "p2", "p1"]);

        let unknown = Query::of_type("posts").after("missing");
        assert!(source.query(&unknown).await.unwrap().results.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_projection() {
        let source = MemorySource::new(five_posts());
        let query = Query::of_type("posts").fetch(["posts.title"]);

        let response = source.query(&query).await.unwrap();
        let record = &response.results[0];
        assert!(record.field("title").is_some());
        assert!(record.field("subtitle").is_none());
        assert_eq!(record.uid.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn test_get_by_uid() {
        let source = MemorySource::new(five_posts());
        let record = source.get_by_uid("posts", "p3", None).await.unwrap();
        assert_eq!(record.id.as_deref(), Some("doc-3"));

        let err = source.get_by_uid("posts", "nope", None).await.unwrap_err();
        assert!(err.is_not_found());

        let err = source.get_by_uid("pages", "p3", None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_draft_revision_overlays_published() {
        let mut draft = five_posts().remove(1);
        draft.data["title"] = json!("Post 2 (draft)");
        let source = MemorySource::new(five_posts()).with_draft("preview-ref", vec![draft]);

        let published = source.get_by_uid("posts", "p2", None).await.unwrap();
        assert_eq!(published.data["title"], "Post 2");

        let previewed = source
            .get_by_uid("posts", "p2", Some("preview-ref"))
            .await
            .unwrap();
        assert_eq!(previewed.data["title"], "Post 2 (draft)");

        let err = source
            .get_by_uid("posts", "p2", Some("stale-ref"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_cursor_follows_the_callers_revision() {
        let mut drafts = five_posts();
        for record in &mut drafts {
            record.data["title"] = json!("DRAFT");
        }
        let source = MemorySource::new(five_posts()).with_draft("draft-ref", drafts);
        let query = Query::of_type("posts")
            .page_size(size(2))
            .content_ref(Some("draft-ref"));

        let first = source.query(&query).await.unwrap();
        assert!(first.results.iter().all(|r| r.data["title"] == "DRAFT"));

        let published = source
            .query_next(first.next_page.as_deref().unwrap(), None)
            .await
            .unwrap();
        assert_eq!(uids(&published), vec!["p3", "p4"]);
        assert!(published.results.iter().all(|r| r.data["title"] != "DRAFT"));
    }

    #[tokio::test]
    async fn test_garbage_cursor() {
        let source = MemorySource::new(five_posts());
        let err = source.query_next("not-a-cursor", None).await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidCursor(_)));
    }

    #[test]
    fn test_load_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        let fixture = Fixture {
            published: five_posts(),
            drafts: HashMap::new(),
        };
        std::fs::write(&path, serde_json::to_string(&fixture).unwrap()).unwrap();

        let source = MemorySource::load(&path).unwrap();
        assert_eq!(source.fixture.published.len(), 5);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(MemorySource::load(&path).is_err());
    }

    #[tokio::test]
    async fn test_bundled_fixture() {
        let source =
            MemorySource::load(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/posts.json")).unwrap();

        let record = source
            .get_by_uid("posts", "como-utilizar-hooks", Some("preview-ref"))
            .await
            .unwrap();
        assert_eq!(record.data["title"], "Como utilizar Hooks (rascunho)");
        assert_eq!(source.query(&Query::of_type("posts").page_size(size(10))).await.unwrap().results.len(), 3);
    }
}
