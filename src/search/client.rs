//! Scoped HTTP client for the search engine.
//!
//! An `EngineClient` is acquired at the start of one logical operation (a
//! search, or a recreate-and-load job) and released on every exit path when
//! it drops. Every request carries basic auth and the configured per-call
//! timeout; transient failures are retried a bounded number of times with a
//! linear backoff. Anything non-transient surfaces unmodified.

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::models::Post;
use crate::search::error::{SearchError, SearchResult};
use crate::search::index::CreateIndexBody;
use crate::search::query::SearchRequest;

/// Reduced-response filter for bulk writes: the aggregate flag plus enough
/// per-item detail to enumerate failures.
const BULK_FILTER_PATH: &str =
    "took,errors,items.index._id,items.index.status,items.index.error";

const RETRYABLE_STATUS: [u16; 4] = [429, 502, 503, 504];

/// Handle for one logical operation against the engine.
pub struct EngineClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    index: String,
    max_retries: u32,
    retry_backoff_secs: u64,
}

impl EngineClient {
    /// Build a client for the configured engine and target index.
    pub fn connect(config: &EngineConfig, index: &str) -> SearchResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Connect(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.host.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            index: index.to_string(),
            max_retries: config.max_retries,
            retry_backoff_secs: config.retry_backoff_secs,
        })
    }

    /// Name of the index this client targets.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// `HEAD /{index}` — true when the index is present.
    pub async fn index_exists(&self) -> SearchResult<bool> {
        let response = self
            .send_with_retry(|| self.http.head(self.index_url("")))
            .await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(engine_error(response).await),
        }
    }

    /// `DELETE /{index}` — deleting an absent index is a no-op.
    pub async fn delete_index(&self) -> SearchResult<()> {
        let response = self
            .send_with_retry(|| self.http.delete(self.index_url("")))
            .await?;
        if response.status() == StatusCode::NOT_FOUND || response.status().is_success() {
            return Ok(());
        }
        Err(engine_error(response).await)
    }

    /// `PUT /{index}` with the settings + mappings body.
    pub async fn create_index(&self, body: &CreateIndexBody) -> SearchResult<()> {
        let response = self
            .send_with_retry(|| self.http.put(self.index_url("")).json(body))
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    /// `POST /{index}/_bulk` with a newline-delimited action/body sequence.
    pub async fn bulk(&self, body: String) -> SearchResult<BulkSummary> {
        let response = self
            .send_with_retry(|| {
                self.http
                    .post(self.index_url("/_bulk"))
                    .query(&[("filter_path", BULK_FILTER_PATH)])
                    .header(header::CONTENT_TYPE, "application/x-ndjson")
                    .body(body.clone())
            })
            .await?;
        let response = expect_success(response).await?;
        Ok(response.json().await?)
    }

    /// `POST /{index}/_search` — read-only.
    pub async fn search(&self, request: &SearchRequest) -> SearchResult<SearchResponseBody> {
        let response = self
            .send_with_retry(|| self.http.post(self.index_url("/_search")).json(request))
            .await?;
        let response = expect_success(response).await?;
        Ok(response.json().await?)
    }

    fn index_url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, self.index, suffix)
    }

    /// Send a request, retrying transient failures (connect/timeout errors
    /// and 429/502/503/504) up to `max_retries` times with linear backoff.
    async fn send_with_retry<F>(&self, build: F) -> SearchResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            let request = build().basic_auth(&self.username, Some(&self.password));
            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt >= self.max_retries || !RETRYABLE_STATUS.contains(&status) {
                        return Ok(response);
                    }
                    warn!(status, attempt, "Transient engine response, retrying");
                }
                Err(err) => {
                    let transient = err.is_connect() || err.is_timeout();
                    if attempt >= self.max_retries || !transient {
                        return Err(SearchError::Transport(err));
                    }
                    warn!(error = %err, attempt, "Transient engine failure, retrying");
                }
            }
            attempt += 1;
            let backoff = Duration::from_secs(self.retry_backoff_secs * u64::from(attempt));
            debug!(backoff_secs = backoff.as_secs(), "Backing off before retry");
            tokio::time::sleep(backoff).await;
        }
    }
}

async fn expect_success(response: Response) -> SearchResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(engine_error(response).await)
    }
}

async fn engine_error(response: Response) -> SearchError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    SearchError::Engine { status, body }
}

/// Reduced bulk response, per `BULK_FILTER_PATH`.
#[derive(Debug, Deserialize)]
pub struct BulkSummary {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItem {
    pub index: BulkItemStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkItemStatus {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub status: Option<u16>,
    pub error: Option<serde_json::Value>,
}

/// Hits envelope of a `_search` response.
#[derive(Debug, Deserialize)]
pub struct SearchResponseBody {
    pub hits: SearchHits,
}

#[derive(Debug, Deserialize)]
pub struct SearchHits {
    pub hits: Vec<SearchHit>,
}

/// A single hit; `_source` carries the stored document.
#[derive(Debug, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Post,
}
