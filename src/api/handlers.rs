use crate::api::AppState;
use crate::error::Result;
use crate::models::Post;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Search posts by free-text query.
///
/// A missing, empty or whitespace-only `q` fails with 400 before any
/// engine call is made.
pub async fn search_posts(
    State(state): State<AppState>,
    Query(params): Query<SearchPostsQuery>,
) -> Result<Json<Vec<Post>>> {
    let query = params.q.unwrap_or_default();
    let posts = state.search.search(&query).await?;
    Ok(Json(posts))
}

#[derive(Debug, Deserialize)]
pub struct SearchPostsQuery {
    pub q: Option<String>,
}
