//! HTTP client for a Prismic-style document API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::query::{Predicate, Query};
use super::{ApiResponse, ContentSource};
use crate::content::RawRecord;
use crate::error::{ContentError, Result};

/// API root document, only the refs matter here
#[derive(Debug, Deserialize)]
struct ApiRoot {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// Content source talking to the remote document API
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    endpoint: Url,
    search_url: Url,
    access_token: Option<String>,
    master_ref: String,
}

impl HttpSource {
    /// Read the API root once and remember its master ref
    pub async fn connect(endpoint: &str, access_token: Option<&str>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            ContentError::UpstreamUnavailable(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;
        let search_url = Url::parse(&format!(
            "{}/documents/search",
            endpoint.as_str().trim_end_matches('/')
        ))
        .map_err(|e| ContentError::UpstreamUnavailable(format!("invalid endpoint: {}", e)))?;

        let client = reqwest::Client::new();

        let mut root_url = endpoint.clone();
        if let Some(token) = access_token {
            root_url.query_pairs_mut().append_pair("access_token", token);
        }

        tracing::debug!("Connecting to content source at {}", endpoint);
        let response = client.get(root_url).send().await?;
        let root: ApiRoot = decode(response).await?;

        let master_ref = root
            .refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| {
                ContentError::UpstreamUnavailable("API root lists no master ref".to_string())
            })?;

        Ok(Self {
            client,
            endpoint,
            search_url,
            access_token: access_token.map(str::to_string),
            master_ref,
        })
    }

    /// Ref of the published revision at connect time
    pub fn master_ref(&self) -> &str {
        &self.master_ref
    }

    fn search_url_for(&self, query: &Query) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "ref",
                query.content_ref.as_deref().unwrap_or(&self.master_ref),
            );
            pairs.append_pair("q", &query.q_param());
            pairs.append_pair("pageSize", &query.page_size.to_string());
            if let Some(orderings) = query.orderings_param() {
                pairs.append_pair("orderings", &orderings);
            }
            if let Some(after) = &query.after {
                pairs.append_pair("after", after);
            }
            if let Some(fetch) = query.fetch_param() {
                pairs.append_pair("fetch", &fetch);
            }
            if let Some(token) = &self.access_token {
                pairs.append_pair("access_token", token);
            }
        }
        url
    }

    /// Turn a `next_page` URL into the request to send
    fn continuation_url(&self, cursor: &str, content_ref: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(cursor)
            .map_err(|e| ContentError::InvalidCursor(format!("'{}': {}", cursor, e)))?;

        if url.origin() != self.endpoint.origin() {
            return Err(ContentError::InvalidCursor(format!(
                "cursor points outside the content source: {}",
                url.origin().ascii_serialization()
            )));
        }

        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        pairs.retain(|(k, _)| k != "ref");
        pairs.push((
            "ref".to_string(),
            content_ref.unwrap_or(&self.master_ref).to_string(),
        ));
        if let Some(token) = &self.access_token {
            if !pairs.iter().any(|(k, _)| k == "access_token") {
                pairs.push(("access_token".to_string(), token.clone()));
            }
        }

        url.query_pairs_mut().clear().extend_pairs(pairs);
        Ok(url)
    }

    async fn search(&self, url: Url) -> Result<ApiResponse> {
        tracing::debug!(
            "GET {} ref={}",
            url.path(),
            url.query_pairs()
                .find(|(k, _)| k == "ref")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default()
        );
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ContentError::UpstreamUnavailable(format!(
            "request failed: {} - {}",
            status, error_text
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ContentError::UpstreamUnavailable(format!("invalid response body: {}", e)))
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn query(&self, query: &Query) -> Result<ApiResponse> {
        self.search(self.search_url_for(query)).await
    }

    async fn query_next(&self, cursor: &str, content_ref: Option<&str>) -> Result<ApiResponse> {
        let url = self.continuation_url(cursor, content_ref)?;
        self.search(url).await
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        content_ref: Option<&str>,
    ) -> Result<RawRecord> {
        let mut query = Query::of_type(doc_type).content_ref(content_ref);
        query.predicates.push(Predicate::uid(doc_type, uid));

        self.query(&query)
            .await?
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::num::NonZeroUsize;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    async fn mount_root(server: &MockServer) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/api/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "refs": [
                    { "id": "preview", "ref": "draft-ref", "isMasterRef": false },
                    { "id": "master", "ref": "master-ref", "isMasterRef": true }
                ]
            })))
            .mount(server)
            .await;
    }

    async fn connect(server: &MockServer) -> HttpSource {
        HttpSource::connect(&format!("{}/api/v2", server.uri()), None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_reads_master_ref() {
        let server = MockServer::start().await;
        mount_root(&server).await;

        let source = connect(&server).await;
        assert_eq!(source.master_ref(), "master-ref");
    }

    #[tokio::test]
    async fn test_connect_without_master_ref() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/api/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "refs": [] })))
            .mount(&server)
            .await;

        let err = HttpSource::connect(&format!("{}/api/v2", server.uri()), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no master ref"));
    }

    #[tokio::test]
    async fn test_query_sends_parameters() {
        let server = MockServer::start().await;
        mount_root(&server).await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/api/v2/documents/search"))
            .and(matchers::query_param("ref", "master-ref"))
            .and(matchers::query_param("q", r#"[[at(document.type,"posts")]]"#))
            .and(matchers::query_param("pageSize", "2"))
            .and(matchers::query_param("fetch", "posts.title,posts.subtitle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results_size": 1,
                "total_results_size": 3,
                "next_page": format!("{}/api/v2/documents/search?page=2&ref=master-ref", server.uri()),
                "results": [
                    { "id": "YF1", "uid": "first", "type": "posts", "data": { "title": "First" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = connect(&server).await;
        let query = Query::of_type("posts")
            .page_size(NonZeroUsize::new(2).unwrap())
            .fetch(["posts.title", "posts.subtitle"]);

        let response = source.query(&query).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].uid.as_deref(), Some("first"));
        assert_eq!(response.total_results_size, Some(3));
        assert!(response.next_page.is_some());
    }

    #[tokio::test]
    async fn test_query_next_pins_content_ref() {
        let server = MockServer::start().await;
        mount_root(&server).await;

        Mock::given(matchers::path("/api/v2/documents/search"))
            .and(matchers::query_param("page", "2"))
            .and(matchers::query_param("ref", "draft-ref"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next_page": null,
                "results": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = connect(&server).await;
        let cursor = format!(
            "{}/api/v2/documents/search?page=2&ref=master-ref",
            server.uri()
        );

        let response = source.query_next(&cursor, Some("draft-ref")).await.unwrap();
        assert!(response.next_page.is_none());
    }

    #[tokio::test]
    async fn test_query_next_without_ref_reads_master() {
        let server = MockServer::start().await;
        mount_root(&server).await;

        Mock::given(matchers::path("/api/v2/documents/search"))
            .and(matchers::query_param("page", "2"))
            .and(matchers::query_param("ref", "master-ref"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let source = connect(&server).await;
        let cursor = format!(
            "{}/api/v2/documents/search?page=2&ref=draft-ref",
            server.uri()
        );

        let url = source.continuation_url(&cursor, None).unwrap();
        let refs: Vec<_> = url
            .query_pairs()
            .filter(|(k, _)| k == "ref")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(refs, vec!["master-ref"]);

        source.query_next(&cursor, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_next_rejects_foreign_cursor() {
        let server = MockServer::start().await;
        mount_root(&server).await;
        let source = connect(&server).await;

        let err = source
            .query_next("https://elsewhere.example/api?page=2", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidCursor(_)));

        let err = source.query_next("not a url", None).await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidCursor(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_unavailable() {
        let server = MockServer::start().await;
        mount_root(&server).await;

        Mock::given(matchers::path("/api/v2/documents/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let source = connect(&server).await;
        let err = source.query(&Query::of_type("posts")).await.unwrap_err();
        assert!(matches!(err, ContentError::UpstreamUnavailable(_)));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn test_get_by_uid_not_found() {
        let server = MockServer::start().await;
        mount_root(&server).await;

        Mock::given(matchers::path("/api/v2/documents/search"))
            .and(matchers::query_param(
                "q",
                r#"[[at(document.type,"posts")][at(my.posts.uid,"ghost")]]"#,
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let source = connect(&server).await;
        let err = source.get_by_uid("posts", "ghost", None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_access_token_is_forwarded() {
        let server = MockServer::start().await;

        Mock::given(matchers::path("/api/v2"))
            .and(matchers::query_param("access_token", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "refs": [{ "ref": "master-ref", "isMasterRef": true }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(matchers::path("/api/v2/documents/search"))
            .and(matchers::query_param("access_token", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpSource::connect(&format!("{}/api/v2", server.uri()), Some("secret"))
            .await
            .unwrap();
        source.query(&Query::of_type("posts")).await.unwrap();
    }
}
