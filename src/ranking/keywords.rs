//! Keyword generation and term counting.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::RankingOptions;

static RE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));
static RE_CAPITALISED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("valid capitalised word regex"));

/// Stop words excluded from keyword sets.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "i", "you", "my", "your",
    "me",
    // sentence starters that show up capitalised in running text
    "this", "these", "those", "there", "their", "they", "then", "than", "when", "where", "what",
    "which", "while", "here", "have", "also", "each", "some", "such", "into", "about", "after",
    "before", "other", "only", "more", "most", "would", "should", "could", "must", "been", "does",
];

/// Term to weight mapping.
///
/// Terms are lowercase single tokens. Entries are never overwritten by
/// [`augment`](KeywordSet::augment).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordSet {
    terms: BTreeMap<String, f64>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term, keeping any existing weight.
    pub fn insert(&mut self, term: impl Into<String>, weight: f64) {
        self.terms.entry(term.into()).or_insert(weight);
    }

    /// Add every entry of `other` whose term is not present yet.
    pub fn augment(&mut self, other: &KeywordSet) {
        for (term, weight) in &other.terms {
            self.insert(term.clone(), *weight);
        }
    }

    pub fn weight(&self, term: &str) -> Option<f64> {
        self.terms.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms and weights in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.terms.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// Sum of `count(term) * weight` over the set.
    pub fn weighted_hits(&self, counts: &TermCounts) -> f64 {
        self.iter()
            .map(|(term, weight)| counts.get(term) as f64 * weight)
            .sum()
    }
}

/// Whole-word, case-insensitive token counts of a text.
#[derive(Debug, Clone, Default)]
pub struct TermCounts {
    counts: HashMap<String, usize>,
    words: usize,
}

impl TermCounts {
    pub fn from_text(text: &str) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut words = 0;
        for m in RE_WORD.find_iter(text) {
            *counts.entry(m.as_str().to_lowercase()).or_default() += 1;
            words += 1;
        }
        Self { counts, words }
    }

    /// Occurrences of a lowercase term.
    pub fn get(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Total number of tokens.
    pub fn words(&self) -> usize {
        self.words
    }
}

/// Builds keyword sets from free text.
#[derive(Debug, Clone)]
pub struct KeywordGenerator {
    stop_words: HashSet<String>,
    min_token_len: usize,
    primary_weight: f64,
    contextual_weight: f64,
    contextual_min_occurrences: usize,
}

impl Default for KeywordGenerator {
    fn default() -> Self {
        Self::from_options(&RankingOptions::default())
    }
}

impl KeywordGenerator {
    pub fn from_options(options: &RankingOptions) -> Self {
        let stop_words = DEFAULT_STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(options.extra_stop_words.iter().map(|w| w.to_lowercase()))
            .collect();

        Self {
            stop_words,
            min_token_len: options.min_token_len,
            primary_weight: options.primary_weight,
            contextual_weight: options.contextual_weight,
            contextual_min_occurrences: options.contextual_min_occurrences,
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    fn keeps(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_len && !self.is_stop_word(token)
    }

    /// Primary keywords of a text: every kept token at the primary weight.
    pub fn generate(&self, text: &str) -> KeywordSet {
        let mut set = KeywordSet::new();
        for m in RE_WORD.find_iter(text) {
            let token = m.as_str().to_lowercase();
            if self.keeps(&token) {
                set.insert(token, self.primary_weight);
            }
        }
        set
    }

    /// Primary keywords of a persona and task.
    pub fn primary(&self, persona: &str, task: &str) -> KeywordSet {
        self.generate(&format!("{} {}", persona, task))
    }

    /// Contextual keywords mined from an anchor document: capitalised words
    /// occurring often enough, at the contextual weight.
    pub fn contextual(&self, anchor_text: &str) -> KeywordSet {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for m in RE_CAPITALISED.find_iter(anchor_text) {
            *counts.entry(m.as_str()).or_default() += 1;
        }

        let mut set = KeywordSet::new();
        for (word, count) in counts {
            let term = word.to_lowercase();
            if count >= self.contextual_min_occurrences && self.keeps(&term) {
                set.insert(term, self.contextual_weight);
            }
        }
        set
    }
}

/// Index of the document with the most keyword occurrences.
///
/// Ties go to the earlier document. Returns `None` when no document contains
/// any keyword.
pub fn select_anchor<'a, I>(texts: I, keywords: &KeywordSet) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, usize)> = None;
    for (i, text) in texts.into_iter().enumerate() {
        let counts = TermCounts::from_text(text);
        let hits: usize = keywords.iter().map(|(term, _)| counts.get(term)).sum();
        if hits > 0 && best.map_or(true, |(_, h)| hits > h) {
            best = Some((i, hits));
        }
    }
    best.map(|(i, _)| i)
}
