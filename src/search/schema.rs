//! Field mappings for the posts index.
//!
//! `title` and `subtitle` are free text searched through the synonym
//! analyzer, each with a `.ngrams` sub-field indexed through the prefix
//! expansion analyzer. The sub-field exists so prefix matches and
//! whole-word/synonym matches can be scored and boosted independently.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::search::analysis::{INDEX_ANALYZER, SEARCH_ANALYZER};

/// The `mappings` half of the index-creation body.
#[derive(Debug, Clone, Serialize)]
pub struct IndexMappings {
    pub properties: BTreeMap<&'static str, FieldMapping>,
}

/// Field mapping shapes; one variant per engine field type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldMapping {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        search_analyzer: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fields: Option<TextSubFields>,
    },
    Keyword,
    Date { format: &'static str },
    Float,
}

impl FieldMapping {
    fn text() -> Self {
        FieldMapping::Text {
            search_analyzer: None,
            fields: None,
        }
    }

    /// Text searched through the synonym analyzer, with an `.ngrams`
    /// sub-field for prefix matching.
    fn searchable_text() -> Self {
        FieldMapping::Text {
            search_analyzer: Some(SEARCH_ANALYZER),
            fields: Some(TextSubFields {
                ngrams: NgramSubField {
                    kind: "text",
                    analyzer: INDEX_ANALYZER,
                    search_analyzer: SEARCH_ANALYZER,
                },
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TextSubFields {
    pub ngrams: NgramSubField,
}

#[derive(Debug, Clone, Serialize)]
pub struct NgramSubField {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub analyzer: &'static str,
    pub search_analyzer: &'static str,
}

impl IndexMappings {
    pub fn for_posts() -> Self {
        let mut properties = BTreeMap::new();
        properties.insert("display_tag", FieldMapping::text());
        properties.insert("id", FieldMapping::Keyword);
        properties.insert("image_url", FieldMapping::Keyword);
        properties.insert("published_at", FieldMapping::Date { format: "yyyy-MM-dd" });
        properties.insert("reading_time", FieldMapping::Float);
        properties.insert("subtitle", FieldMapping::searchable_text());
        properties.insert("tags", FieldMapping::text());
        properties.insert("title", FieldMapping::searchable_text());
        properties.insert("url", FieldMapping::Keyword);
        Self { properties }
    }
}
