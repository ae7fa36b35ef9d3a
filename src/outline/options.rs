//! Outline extraction options.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable thresholds for outline extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// Fraction of the page height treated as the header zone
    pub header_zone: f32,
    /// Fraction of the page height treated as the footer zone
    pub footer_zone: f32,
    /// Header/footer candidates must have fewer words than this
    pub boilerplate_max_words: usize,
    /// Distinct pages a candidate must appear on to count as boilerplate
    pub boilerplate_min_pages: usize,
    /// Multi-line blocks on the first N pages are classified line by line
    pub toc_page_limit: u32,
    /// Units with more words than this are never headings
    pub max_heading_words: usize,
    /// Non-bold text ending in a period with more words than this is a sentence
    pub sentence_min_words: usize,
    /// Number of prominent styles mapped to heading levels
    pub max_levels: usize,
    /// First-page blocks within this many points of the largest size form the title
    pub title_size_tolerance: f32,
    /// Additional noise patterns (case-insensitive regexes)
    pub extra_noise_patterns: Vec<String>,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            header_zone: 0.15,
            footer_zone: 0.15,
            boilerplate_max_words: 10,
            boilerplate_min_pages: 2,
            toc_page_limit: 5,
            max_heading_words: 15,
            sentence_min_words: 5,
            max_levels: 5,
            title_size_tolerance: 1.0,
            extra_noise_patterns: Vec::new(),
        }
    }
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header and footer zone fractions.
    pub fn with_zones(mut self, header: f32, footer: f32) -> Self {
        self.header_zone = header;
        self.footer_zone = footer;
        self
    }

    /// Set the number of leading pages whose multi-line blocks are split into lines.
    pub fn with_toc_page_limit(mut self, pages: u32) -> Self {
        self.toc_page_limit = pages;
        self
    }

    /// Set the word limit for headings.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Add a noise pattern. Fails if the pattern does not compile.
    pub fn with_noise_pattern(mut self, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        compile_noise_pattern(&pattern)?;
        self.extra_noise_patterns.push(pattern);
        Ok(self)
    }

    /// Compile the extra noise patterns.
    pub(crate) fn compiled_noise_patterns(&self) -> Result<Vec<Regex>> {
        self.extra_noise_patterns
            .iter()
            .map(|p| compile_noise_pattern(p))
            .collect()
    }
}

fn compile_noise_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){}", pattern)).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
