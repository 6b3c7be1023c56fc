//! Error types for search and index operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while talking to the search engine or preparing
/// data for it.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Query was empty or whitespace-only; never reaches the engine
    #[error("Please provide a valid query")]
    EmptyQuery,

    /// HTTP client could not be constructed
    #[error("Failed to set up engine connection: {0}")]
    Connect(String),

    /// Transport-level failure talking to the engine
    #[error("Engine request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Engine answered with an unexpected status
    #[error("Engine returned status {status}: {body}")]
    Engine { status: u16, body: String },

    /// Corpus file could not be read or parsed
    #[error("Failed to read corpus: {0}")]
    Corpus(String),

    /// A corpus record violates the document invariants
    #[error("Invalid document `{id}`: {reason}")]
    InvalidDocument { id: String, reason: String },

    /// The bulk write reported per-item failures
    #[error("Bulk write rejected {} document(s)", .failures.len())]
    BulkRejected { failures: Vec<BulkFailure> },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One rejected document from a bulk write response.
#[derive(Debug, Clone)]
pub struct BulkFailure {
    pub id: String,
    pub reason: String,
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::EmptyQuery | SearchError::InvalidDocument { .. } => {
                AppError::Validation(err.to_string())
            }
            SearchError::Connect(_) | SearchError::Transport(_) | SearchError::Engine { .. } => {
                AppError::Network(err.to_string())
            }
            SearchError::Serialization(e) => AppError::Serialization(e.to_string()),
            SearchError::Corpus(_) | SearchError::BulkRejected { .. } => {
                AppError::Internal(err.to_string())
            }
        }
    }
}
