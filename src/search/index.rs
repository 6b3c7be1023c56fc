//! Index lifecycle management.
//!
//! The index transitions absent -> ready (create) or ready -> absent ->
//! ready (recreate). Schema and analyzers are versioned only by full
//! recreation; there is no partial schema migration. Recreate-and-load is
//! an exclusive maintenance operation and must not run concurrently with
//! itself against the same index.

use serde::Serialize;
use tracing::info;

use crate::config::SearchConfig;
use crate::search::analysis::IndexSettings;
use crate::search::client::EngineClient;
use crate::search::error::SearchResult;
use crate::search::schema::IndexMappings;

/// Complete index-creation body: custom analyzers plus field mappings.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIndexBody {
    pub settings: IndexSettings,
    pub mappings: IndexMappings,
}

impl CreateIndexBody {
    pub fn for_posts(synonyms: &[String]) -> Self {
        Self {
            settings: IndexSettings::for_posts(synonyms),
            mappings: IndexMappings::for_posts(),
        }
    }
}

/// Creates and recreates the posts index on a borrowed engine handle.
pub struct IndexManager<'a> {
    client: &'a EngineClient,
    synonyms: &'a [String],
}

impl<'a> IndexManager<'a> {
    pub fn new(client: &'a EngineClient, config: &'a SearchConfig) -> Self {
        Self {
            client,
            synonyms: &config.synonyms,
        }
    }

    /// Delete the index if present ("not found" is success, not a fault),
    /// then create it fresh. Idempotent: two consecutive calls end in the
    /// same state.
    pub async fn recreate(&self) -> SearchResult<()> {
        self.client.delete_index().await?;
        info!(index = self.client.index(), "Index deleted if existing");

        self.client
            .create_index(&CreateIndexBody::for_posts(self.synonyms))
            .await?;
        info!(index = self.client.index(), "Index (re-)created");
        Ok(())
    }

    /// Create the index only if it is currently absent. Returns whether a
    /// create was performed.
    pub async fn ensure_exists(&self) -> SearchResult<bool> {
        if self.client.index_exists().await? {
            info!(index = self.client.index(), "Index already exists");
            return Ok(false);
        }
        self.client
            .create_index(&CreateIndexBody::for_posts(self.synonyms))
            .await?;
        info!(index = self.client.index(), "Index created");
        Ok(true)
    }
}
