//! Relevance-tuned full-text search over the posts index.
//!
//! The engine does the storing, sharding and BM25 scoring; this module owns
//! every relevance decision around it:
//!
//! - **Schema**: field types and per-field analyzer bindings ([`schema`]).
//! - **Analyzer pipeline**: index-time prefix expansion vs. search-time
//!   synonym expansion ([`analysis`]).
//! - **Index lifecycle**: create / recreate with no partial-schema states
//!   ([`index`]).
//! - **Bulk ingestion**: one-shot batch loading with explicit per-item
//!   failure surfacing ([`loader`]).
//! - **Query construction**: the boosted conjunctive multi-field match that
//!   determines ranking ([`query`], [`service`]).

mod analysis;
mod client;
mod error;
mod index;
mod loader;
mod query;
mod schema;
mod service;

pub use analysis::{AnalysisSettings, AnalyzerDef, IndexSettings, TokenFilterDef};
pub use analysis::{INDEX_ANALYZER, SEARCH_ANALYZER};
pub use client::{BulkItem, BulkItemStatus, BulkSummary, EngineClient};
pub use client::{SearchHit, SearchHits, SearchResponseBody};
pub use error::{BulkFailure, SearchError, SearchResult};
pub use index::{CreateIndexBody, IndexManager};
pub use loader::{read_corpus, BulkLoader, LoadReport, PostRecord};
pub use query::{MultiMatch, QueryClause, SearchRequest, SEARCH_FIELDS};
pub use schema::{FieldMapping, IndexMappings};
pub use service::SearchService;
