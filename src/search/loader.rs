//! Bulk corpus loading.
//!
//! The corpus is a JSON array of raw records whose identifier arrives as
//! `_id`. Loading renames it into the document's `id` field so the
//! identifier used for index addressing and the one stored in the body are
//! the same value, validates every record against the document invariants,
//! and writes the whole collection in one batch: for each document an
//! action line followed by its body, in strict alternation.
//!
//! The bulk response's aggregate `errors` flag is checked; when set, the
//! rejected items are enumerated and the load fails loudly. Partial
//! failure is never silent.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use validator::Validate;

use crate::models::Post;
use crate::search::client::{BulkSummary, EngineClient};
use crate::search::error::{BulkFailure, SearchError, SearchResult};

/// Raw corpus record; identical to [`Post`] except the identifier is keyed
/// `_id` in the source data.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub display_tag: String,
    pub image_url: String,
    pub published_at: NaiveDate,
    pub reading_time: f64,
    pub url: String,
}

impl PostRecord {
    /// Rename `_id` into the document body's `id`.
    pub fn into_post(self) -> Post {
        Post {
            id: self.id,
            title: self.title,
            subtitle: self.subtitle,
            tags: self.tags,
            display_tag: self.display_tag,
            image_url: self.image_url,
            published_at: self.published_at,
            reading_time: self.reading_time,
            url: self.url,
        }
    }
}

/// Outcome of a successful bulk load.
#[derive(Debug, Clone, Copy)]
pub struct LoadReport {
    /// Documents submitted and accepted by the engine
    pub submitted: usize,
    /// Engine-reported batch duration
    pub took_ms: u64,
}

/// Read a corpus file into raw records.
pub fn read_corpus(path: &Path) -> SearchResult<Vec<PostRecord>> {
    let data = fs::read_to_string(path)
        .map_err(|e| SearchError::Corpus(format!("{}: {}", path.display(), e)))?;
    parse_corpus(&data)
}

fn parse_corpus(data: &str) -> SearchResult<Vec<PostRecord>> {
    serde_json::from_str(data).map_err(|e| SearchError::Corpus(e.to_string()))
}

/// Writes a document collection into the index in one batch call.
pub struct BulkLoader<'a> {
    client: &'a EngineClient,
}

impl<'a> BulkLoader<'a> {
    pub fn new(client: &'a EngineClient) -> Self {
        Self { client }
    }

    /// Validate, normalize and submit all records in a single bulk write.
    pub async fn load(&self, records: Vec<PostRecord>) -> SearchResult<LoadReport> {
        let mut posts = Vec::with_capacity(records.len());
        for record in records {
            let post = record.into_post();
            post.validate().map_err(|e| SearchError::InvalidDocument {
                id: post.id.clone(),
                reason: e.to_string(),
            })?;
            posts.push(post);
        }

        let submitted = posts.len();
        let body = build_bulk_body(self.client.index(), &posts)?;
        let summary = self.client.bulk(body).await?;

        if summary.errors {
            let failures = collect_failures(&summary);
            for failure in &failures {
                error!(id = %failure.id, reason = %failure.reason, "Bulk item rejected");
            }
            return Err(SearchError::BulkRejected { failures });
        }

        info!(submitted, took_ms = summary.took, "Posts have been indexed");
        Ok(LoadReport {
            submitted,
            took_ms: summary.took,
        })
    }
}

#[derive(Serialize)]
struct BulkAction<'a> {
    index: BulkTarget<'a>,
}

#[derive(Serialize)]
struct BulkTarget<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id")]
    id: &'a str,
}

/// Build the newline-delimited bulk body: one action descriptor per
/// document, immediately followed by the document body.
fn build_bulk_body(index: &str, posts: &[Post]) -> SearchResult<String> {
    let mut body = String::new();
    for post in posts {
        let action = BulkAction {
            index: BulkTarget {
                index,
                id: &post.id,
            },
        };
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(post)?);
        body.push('\n');
    }
    Ok(body)
}

fn collect_failures(summary: &BulkSummary) -> Vec<BulkFailure> {
    summary
        .items
        .iter()
        .filter_map(|item| {
            item.index.error.as_ref().map(|error| BulkFailure {
                id: item.index.id.clone().unwrap_or_default(),
                reason: error.to_string(),
            })
        })
        .collect()
}
