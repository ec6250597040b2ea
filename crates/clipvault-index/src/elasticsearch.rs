use async_trait::async_trait;
use clipvault_core::{ElasticsearchConfig, MetadataBackend, VideoMetadata};
use futures::{stream, TryStreamExt};
use std::time::Duration;

use crate::traits::{IndexError, IndexResult, MetadataIndex, MetadataStream};

/// Hits fetched per search request while draining a result stream.
const SEARCH_PAGE_SIZE: usize = 50;
/// Elasticsearch's default `index.max_result_window`; `from + size` may not exceed it.
const MAX_RESULT_WINDOW: usize = 10_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Elasticsearch-backed metadata index using the REST API via `reqwest`.
///
/// Each record is one document whose `_id` is the file ID, so `put` is a natural upsert.
/// Writes ask for `refresh=wait_for` and return only once the record is searchable.
#[derive(Clone)]
pub struct ElasticsearchMetadataIndex {
    client: reqwest::Client,
    base_url: reqwest::Url,
    index: String,
    username: Option<String>,
    password: Option<String>,
}

impl ElasticsearchMetadataIndex {
    /// Build the HTTP client. No request is made until `ensure_schema` or a data call.
    pub fn new(config: &ElasticsearchConfig) -> IndexResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| IndexError::Config(e.to_string()))?;

        let base_url = reqwest::Url::parse(config.url.trim_end_matches('/')).map_err(|e| {
            IndexError::Config(format!("invalid ELASTICSEARCH_URL '{}': {e}", config.url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(IndexError::Config(format!(
                "invalid ELASTICSEARCH_URL '{}'",
                config.url
            )));
        }

        Ok(Self {
            client,
            base_url,
            index: config.index.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// Build a [`reqwest::RequestBuilder`] for `segments` under the index, applying basic
    /// authentication when credentials are configured. Segments are percent-encoded, so a
    /// caller-supplied file ID cannot change the request path.
    fn request(&self, method: reqwest::Method, segments: &[&str]) -> reqwest::RequestBuilder {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(&self.index).extend(segments);
        }

        let mut req = self.client.request(method, url);
        if let Some(ref user) = self.username {
            req = req.basic_auth(user, self.password.as_deref());
        }
        req
    }

    /// Fetch one page of title matches starting at `from`.
    async fn search_page(&self, query: &str, from: usize) -> IndexResult<Vec<VideoMetadata>> {
        let body = serde_json::json!({
            "query": build_title_query(query),
            "from": from,
            "size": SEARCH_PAGE_SIZE
        });

        let resp = self
            .request(reqwest::Method::POST, &["_search"])
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Query(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(IndexError::Query(format!(
                "search failed with {status}: {text}"
            )));
        }

        let search: SearchResponse = resp
            .json()
            .await
            .map_err(|e| IndexError::Query(format!("unexpected search response: {e}")))?;

        Ok(search.hits.hits.into_iter().map(|h| h.source).collect())
    }
}

/// Whether `file_id` survives as its own path segment. URL path building drops `.` and `..`
/// segments, which would turn a document request into a request on the index itself.
fn is_document_id(file_id: &str) -> bool {
    !matches!(file_id, "" | "." | "..")
}

// ---------------------------------------------------------------------------
// Elasticsearch response types (internal)
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct GetResponse {
    #[serde(rename = "_source")]
    source: Option<VideoMetadata>,
    found: bool,
}

#[derive(serde::Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(serde::Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(serde::Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: VideoMetadata,
}

// ---------------------------------------------------------------------------
// MetadataIndex implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl MetadataIndex for ElasticsearchMetadataIndex {
    async fn ensure_schema(&self) -> IndexResult<()> {
        let exists = self
            .request(reqwest::Method::HEAD, &[])
            .send()
            .await
            .map_err(|e| IndexError::Schema(e.to_string()))?;

        if exists.status().is_success() {
            tracing::debug!(index = %self.index, "elasticsearch index already exists");
            return Ok(());
        }
        if exists.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(IndexError::Schema(format!(
                "unexpected status {} checking index '{}'",
                exists.status(),
                self.index
            )));
        }

        let mapping = serde_json::json!({
            "settings": {
                "number_of_shards": 1,
                "number_of_replicas": 0
            },
            "mappings": {
                "properties": {
                    "title": {
                        "type": "text",
                        "fields": { "keyword": { "type": "keyword" } }
                    },
                    "fileId": { "type": "keyword" }
                }
            }
        });

        let resp = self
            .request(reqwest::Method::PUT, &[])
            .json(&mapping)
            .send()
            .await
            .map_err(|e| IndexError::Schema(e.to_string()))?;

        if resp.status().is_success() {
            tracing::info!(index = %self.index, "elasticsearch index created");
            return Ok(());
        }

        // Another process may have created it between the check and the create.
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::BAD_REQUEST
            && body.contains("resource_already_exists_exception")
        {
            tracing::debug!(index = %self.index, "elasticsearch index ensured");
            Ok(())
        } else {
            Err(IndexError::Schema(format!(
                "failed to create index '{}': {body}",
                self.index
            )))
        }
    }

    async fn put(&self, file_id: &str, title: &str) -> IndexResult<()> {
        if !is_document_id(file_id) {
            return Err(IndexError::Write(format!(
                "'{file_id}' cannot be used as a document id"
            )));
        }
        let start = std::time::Instant::now();
        let record = VideoMetadata::new(file_id, title);

        let resp = self
            .request(reqwest::Method::PUT, &["_doc", file_id])
            .query(&[("refresh", "wait_for")])
            .json(&record)
            .send()
            .await
            .map_err(|e| IndexError::Write(e.to_string()))?;

        if resp.status().is_success() {
            tracing::debug!(
                file_id = %file_id,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "video metadata indexed"
            );
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(IndexError::Write(format!(
                "failed to index metadata ({status}): {body}"
            )))
        }
    }

    async fn get_by_file_id(&self, file_id: &str) -> IndexResult<Option<VideoMetadata>> {
        if !is_document_id(file_id) {
            return Ok(None);
        }

        let resp = self
            .request(reqwest::Method::GET, &["_doc", file_id])
            .send()
            .await
            .map_err(|e| IndexError::Query(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(IndexError::Query(format!("get by file id failed: {text}")));
        }

        let get_resp: GetResponse = resp
            .json()
            .await
            .map_err(|e| IndexError::Query(format!("unexpected get response: {e}")))?;

        if get_resp.found {
            Ok(get_resp.source)
        } else {
            Ok(None)
        }
    }

    async fn search_by_title(&self, query: &str) -> IndexResult<MetadataStream> {
        let index = self.clone();
        let query = query.to_string();

        let pages = stream::try_unfold(Some(0usize), move |from| {
            let index = index.clone();
            let query = query.clone();
            async move {
                let Some(from) = from else {
                    return Ok(None);
                };

                let hits = index.search_page(&query, from).await?;
                if hits.is_empty() {
                    return Ok(None);
                }

                let fetched = from + hits.len();
                let next = if hits.len() < SEARCH_PAGE_SIZE
                    || fetched + SEARCH_PAGE_SIZE > MAX_RESULT_WINDOW
                {
                    None
                } else {
                    Some(fetched)
                };

                let page = stream::iter(hits.into_iter().map(Ok::<_, IndexError>));
                Ok(Some((page, next)))
            }
        });

        Ok(Box::pin(pages.try_flatten()))
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::Elasticsearch
    }
}

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Match `query` as analysed text on `title` or as a case-insensitive substring of the
/// whole title.
fn build_title_query(query: &str) -> serde_json::Value {
    serde_json::json!({
        "bool": {
            "should": [
                { "match": { "title": query } },
                {
                    "wildcard": {
                        "title.keyword": {
                            "value": format!("*{}*", escape_wildcard(query)),
                            "case_insensitive": true
                        }
                    }
                }
            ],
            "minimum_should_match": 1
        }
    })
}

fn escape_wildcard(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
