//! Search service: free-text query in, ranked posts out.

use tracing::debug;

use crate::config::{EngineConfig, SearchConfig};
use crate::models::Post;
use crate::search::client::EngineClient;
use crate::search::error::{SearchError, SearchResult};
use crate::search::query::SearchRequest;

/// Executes boosted multi-field queries against the posts index.
///
/// Read-only; never mutates index state. Holds configuration only — the
/// engine connection is scoped to each call and released on every path.
pub struct SearchService {
    engine: EngineConfig,
    index: String,
}

impl SearchService {
    pub fn new(engine: EngineConfig, search: &SearchConfig) -> Self {
        Self {
            engine,
            index: search.index.clone(),
        }
    }

    /// Run a free-text query and return posts in the engine's native
    /// relevance-descending order.
    ///
    /// A query that is empty after trimming fails with
    /// [`SearchError::EmptyQuery`] before any engine call is made.
    pub async fn search(&self, raw_query: &str) -> SearchResult<Vec<Post>> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let client = EngineClient::connect(&self.engine, &self.index)?;
        let request = SearchRequest::posts(query);
        let response = client.search(&request).await?;

        let posts: Vec<Post> = response
            .hits
            .hits
            .into_iter()
            .map(|hit| hit.source)
            .collect();

        debug!(query, hits = posts.len(), "Search completed");
        Ok(posts)
    }
}
