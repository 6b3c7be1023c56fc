//! Index-time and search-time analyzer definitions.
//!
//! Two custom analysis chains are bound by the schema:
//!
//! - `post_index_analyzer` runs only when a document is indexed: standard
//!   tokenizer, lowercase, then edge n-gram expansion of each token into all
//!   of its prefixes of length 1..20. Applying it to a query string would
//!   explode the query into prefixes and destroy precision, so it is bound
//!   only to the index slot of the `.ngrams` sub-fields.
//! - `post_search_analyzer` runs only when a query is evaluated: standard
//!   tokenizer, lowercase, then graph-aware synonym expansion. Expanding
//!   synonyms at index time would require a full reindex on every synonym
//!   table change; expanding at search time lets one query match any variant
//!   already present in indexed text.
//!
//! The synonym filter is symmetric (`expand: true`) and drops malformed
//! rules instead of failing index creation (`lenient: true`).

use std::collections::BTreeMap;

use serde::Serialize;

/// Analyzer applied to `.ngrams` sub-fields at index time.
pub const INDEX_ANALYZER: &str = "post_index_analyzer";

/// Analyzer applied to `title`/`subtitle` (and their sub-fields) at search time.
pub const SEARCH_ANALYZER: &str = "post_search_analyzer";

const AUTOCOMPLETE_FILTER: &str = "autocomplete_filter";
const SYNONYM_FILTER: &str = "synonym_filter";

// Front-anchored prefix expansion bounds.
const MIN_PREFIX_GRAM: u32 = 1;
const MAX_PREFIX_GRAM: u32 = 20;

/// The `settings` half of the index-creation body.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSettings {
    pub analysis: AnalysisSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSettings {
    pub analyzer: BTreeMap<&'static str, AnalyzerDef>,
    pub filter: BTreeMap<&'static str, TokenFilterDef>,
}

/// A named, ordered chain of tokenizer and token filters.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerDef {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub tokenizer: &'static str,
    pub filter: Vec<&'static str>,
}

impl AnalyzerDef {
    fn custom(filter: Vec<&'static str>) -> Self {
        Self {
            kind: "custom",
            tokenizer: "standard",
            filter,
        }
    }
}

/// Token filter definitions; one variant per engine filter type so a
/// malformed filter body cannot be expressed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum TokenFilterDef {
    #[serde(rename = "edge_ngram")]
    EdgeNgram { min_gram: u32, max_gram: u32 },
    #[serde(rename = "synonym_graph")]
    SynonymGraph {
        expand: bool,
        lenient: bool,
        synonyms: Vec<String>,
    },
}

impl IndexSettings {
    /// Build the posts analysis settings around the configured synonym
    /// groups (comma-joined equivalence sets, e.g. `"k8s, k9s, Kubernetes"`).
    pub fn for_posts(synonyms: &[String]) -> Self {
        let mut analyzer = BTreeMap::new();
        analyzer.insert(
            INDEX_ANALYZER,
            AnalyzerDef::custom(vec!["lowercase", AUTOCOMPLETE_FILTER]),
        );
        analyzer.insert(
            SEARCH_ANALYZER,
            AnalyzerDef::custom(vec!["lowercase", SYNONYM_FILTER]),
        );

        let mut filter = BTreeMap::new();
        filter.insert(
            AUTOCOMPLETE_FILTER,
            TokenFilterDef::EdgeNgram {
                min_gram: MIN_PREFIX_GRAM,
                max_gram: MAX_PREFIX_GRAM,
            },
        );
        filter.insert(
            SYNONYM_FILTER,
            TokenFilterDef::SynonymGraph {
                expand: true,
                lenient: true,
                synonyms: synonyms.to_vec(),
            },
        );

        Self {
            analysis: AnalysisSettings { analyzer, filter },
        }
    }
}
