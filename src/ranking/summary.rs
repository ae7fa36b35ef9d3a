//! Extractive section summaries.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::model::{normalize_whitespace, Section};

use super::keywords::{KeywordSet, TermCounts};
use super::RankingOptions;

static RE_CHUNK_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid chunk break regex"));
static RE_LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:[•●▪◦\-*]|\d+[.)])\s+").expect("valid list marker regex")
});

/// How the summary passage is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStrategy {
    /// Chunk with the highest weighted keyword density
    #[default]
    KeywordDensity,
    /// Longest chunk
    Longest,
}

/// Picks one passage of a section as its summary.
#[derive(Debug, Clone)]
pub struct Summarizer {
    strategy: SummaryStrategy,
    min_chunk_chars: usize,
    fallback_chars: usize,
    list_boost: f64,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::from_options(&RankingOptions::default())
    }
}

impl Summarizer {
    pub fn from_options(options: &RankingOptions) -> Self {
        Self {
            strategy: options.summary,
            min_chunk_chars: options.min_chunk_chars,
            fallback_chars: options.fallback_chars,
            list_boost: options.list_boost,
        }
    }

    /// `"<title>: <excerpt>"`, cleaned for output.
    pub fn summarize(&self, section: &Section, keywords: &KeywordSet) -> String {
        let excerpt = self
            .best_chunk(&section.content, keywords)
            .unwrap_or_else(|| truncate_chars(section.content.trim(), self.fallback_chars));
        clean_text(&format!("{}: {}", section.title, excerpt))
    }

    /// The chosen chunk, or `None` when no chunk is long enough.
    pub fn best_chunk<'a>(&self, content: &'a str, keywords: &KeywordSet) -> Option<&'a str> {
        let chunks = RE_CHUNK_BREAK
            .split(content)
            .map(str::trim)
            .filter(|c| c.chars().count() >= self.min_chunk_chars);

        let mut best: Option<(&str, f64)> = None;
        for chunk in chunks {
            let value = match self.strategy {
                SummaryStrategy::KeywordDensity => self.density(chunk, keywords),
                SummaryStrategy::Longest => chunk.chars().count() as f64,
            };
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((chunk, value));
            }
        }
        best.map(|(chunk, _)| chunk)
    }

    fn density(&self, chunk: &str, keywords: &KeywordSet) -> f64 {
        let counts = TermCounts::from_text(chunk);
        let words = chunk.split_whitespace().count().max(1);
        let density = keywords.weighted_hits(&counts) / words as f64;
        if RE_LIST_MARKER.is_match(chunk) {
            density * self.list_boost
        } else {
            density
        }
    }
}

/// First `max` characters of a string.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Drop control characters and backslashes, fold compatibility forms and
/// collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let cleaned: String = text
        .nfkc()
        .filter(|c| *c != '\\')
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    normalize_whitespace(&cleaned)
}
