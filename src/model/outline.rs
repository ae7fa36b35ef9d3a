//! Outline result types.

use serde::{Deserialize, Serialize};

/// Outline heading level, H1 (top) through H5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
}

impl HeadingLevel {
    /// All levels, top first.
    pub const ALL: [HeadingLevel; 5] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
    ];

    /// Level for a 1-based depth, clamped to H1..=H5.
    pub fn from_depth(depth: usize) -> Self {
        Self::ALL[depth.clamp(1, Self::ALL.len()) - 1]
    }

    /// 1-based depth of the level.
    pub fn depth(self) -> usize {
        self as usize + 1
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// A single heading in the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title plus ordered outline of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Document title, never empty
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineEntry>,
}

impl OutlineResult {
    /// Result for a document that could not be analysed.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_depth() {
        assert_eq!(HeadingLevel::from_depth(1), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_depth(3), HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_depth(9), HeadingLevel::H5);
        assert_eq!(HeadingLevel::from_depth(0), HeadingLevel::H1);
        assert_eq!(HeadingLevel::H4.depth(), 4);
        assert_eq!(HeadingLevel::H2.to_string(), "H2");
    }

    #[test]
    fn test_outline_serialization() {
        let result = OutlineResult {
            title: "Project Plan".to_string(),
            outline: vec![OutlineEntry::new(HeadingLevel::H1, "1. Goals", 2)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Project Plan",
                "outline": [{"level": "H1", "text": "1. Goals", "page": 2}]
            })
        );
    }
}
