//! Relevance-tuned full-text search service over a corpus of blog posts.
//!
//! Storage, sharding, replication and BM25 scoring are delegated to an
//! external Elasticsearch-compatible engine; this crate owns the relevance
//! design around it — the index schema, the two-stage analyzer pipeline
//! (index-time prefix expansion, search-time synonym expansion), the bulk
//! ingestion protocol, and the boosted multi-field query construction —
//! plus the HTTP surface and the batch load job.
//!
//! Binaries:
//! - `post-search` — the HTTP search service (`GET /posts?q=...`).
//! - `post-search-loader` — rebuilds the index and loads the corpus.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
