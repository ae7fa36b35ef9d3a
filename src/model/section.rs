//! Section types used by the ranking pipeline.

use serde::{Deserialize, Serialize};

/// A titled slice of a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section title
    pub title: String,
    /// Section body, never empty once emitted by the segmenter
    pub content: String,
    /// Page the section starts on (1-indexed)
    pub page: u32,
}

impl Section {
    /// Create a new section.
    pub fn new(title: impl Into<String>, content: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            page,
        }
    }
}

/// A section with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSection {
    /// The scored section
    pub section: Section,
    /// Relevance score (higher is more relevant)
    pub score: f64,
    /// Document the section came from
    pub document: String,
}
