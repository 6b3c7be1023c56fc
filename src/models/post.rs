//! Post document model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A blog post summary, the unit of indexing and retrieval.
///
/// `id` is unique across the corpus and immutable once assigned. Documents
/// are written once by the bulk loader and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Post {
    /// Unique opaque identifier; also the engine-side document id
    #[validate(length(min = 1))]
    pub id: String,

    /// Post title
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    /// Post subtitle
    #[validate(custom(function = "not_blank"))]
    pub subtitle: String,

    /// Free-form tags, may be empty
    #[serde(default)]
    pub tags: Vec<String>,

    /// Human-facing category label
    pub display_tag: String,

    /// Cover image URI
    pub image_url: String,

    /// Publication date, wire format `yyyy-MM-dd`
    pub published_at: NaiveDate,

    /// Estimated reading time in minutes
    #[validate(range(min = 0.0))]
    pub reading_time: f64,

    /// Canonical source link
    #[validate(length(min = 1))]
    pub url: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
