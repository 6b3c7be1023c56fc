//! Boosted multi-field query construction.
//!
//! A single conjunctive `multi_match` clause over title and subtitle plus
//! their `.ngrams` sub-fields. `most_fields` scoring sums per-field scores,
//! so a document matching both title and subtitle outranks one matching only
//! the title. The boosts encode editorial priority: a title match is worth
//! 3x a baseline field, a subtitle match 2x; the `.ngrams` sub-fields stay
//! at the default weight and only contribute partial-prefix and
//! synonym-normalized matches the plain fields would miss.

use serde::Serialize;

/// Field-boost list, in engine syntax.
pub const SEARCH_FIELDS: [&str; 4] = [
    "title^3",
    "title.ngrams",
    "subtitle^2",
    "subtitle.ngrams",
];

/// The `_search` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: QueryClause,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryClause {
    pub multi_match: MultiMatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiMatch {
    pub query: String,
    #[serde(rename = "type")]
    pub match_type: &'static str,
    pub operator: &'static str,
    pub fields: Vec<&'static str>,
}

impl SearchRequest {
    /// Build the posts query for an already-trimmed, non-empty query string.
    pub fn posts(query: impl Into<String>) -> Self {
        Self {
            query: QueryClause {
                multi_match: MultiMatch {
                    query: query.into(),
                    match_type: "most_fields",
                    operator: "and",
                    fields: SEARCH_FIELDS.to_vec(),
                },
            },
        }
    }
}
