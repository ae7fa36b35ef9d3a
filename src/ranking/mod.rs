//! Persona-driven section ranking across a document collection.
//!
//! Keywords come from the persona and task. By default a second pass picks
//! an anchor document (the one matching the task best) and mines contextual
//! keywords from it. Every document is then split into sections, sections
//! are scored and filtered per document, and the survivors are ranked
//! globally and summarised.

pub mod keywords;
mod score;
mod segment;
mod summary;

use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::{
    ExtractedSection, PageText, RankingMetadata, RankingRequest, RankingResult, ScoredSection,
    SubsectionAnalysis,
};

pub use keywords::{select_anchor, KeywordGenerator, KeywordSet, TermCounts};
pub use score::{rank_document, rank_globally, score_section};
pub use segment::{Segmenter, LEADING_SECTION_TITLE};
pub use summary::{clean_text, Summarizer, SummaryStrategy};

/// Tunable thresholds for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingOptions {
    /// Mine contextual keywords from an anchor document
    pub two_pass: bool,
    /// Weight of persona and task keywords
    pub primary_weight: f64,
    /// Weight of keywords mined from the anchor document
    pub contextual_weight: f64,
    /// Tokens shorter than this are never keywords
    pub min_token_len: usize,
    /// A capitalised word must occur this often in the anchor to become a keyword
    pub contextual_min_occurrences: usize,
    /// Words added to the built-in stop-word list
    pub extra_stop_words: Vec<String>,
    /// Multiplier for keyword hits in a section title
    pub title_weight: f64,
    /// Section titles that get discounted (compared lowercase, trimmed)
    pub generic_titles: Vec<String>,
    /// Discount applied to generic titles
    pub generic_penalty: f64,
    /// Sections must score strictly above this to be kept
    pub min_score: f64,
    /// Sections kept per document
    pub top_k: usize,
    /// Cap on the global ranking (None = unlimited)
    pub max_sections: Option<usize>,
    /// Title lines must have fewer words than this
    pub max_title_words: usize,
    /// Summary passage selection
    pub summary: SummaryStrategy,
    /// Chunks shorter than this are not summary candidates
    pub min_chunk_chars: usize,
    /// Length of the fallback summary
    pub fallback_chars: usize,
    /// Density multiplier for chunks containing list items
    pub list_boost: f64,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            two_pass: true,
            primary_weight: 10.0,
            contextual_weight: 5.0,
            min_token_len: 4,
            contextual_min_occurrences: 3,
            extra_stop_words: Vec::new(),
            title_weight: 5.0,
            generic_titles: ["introduction", "conclusion", "references", "appendix", "overview"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            generic_penalty: 0.5,
            min_score: 0.05,
            top_k: 2,
            max_sections: Some(5),
            max_title_words: 13,
            summary: SummaryStrategy::KeywordDensity,
            min_chunk_chars: 50,
            fallback_chars: 300,
            list_boost: 1.5,
        }
    }
}

impl RankingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use persona and task keywords only.
    pub fn single_pass(mut self) -> Self {
        self.two_pass = false;
        self
    }

    /// Set the number of sections kept per document.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set the per-document score threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Set the global ranking cap.
    pub fn with_max_sections(mut self, max: Option<usize>) -> Self {
        self.max_sections = max;
        self
    }

    /// Set the summary strategy.
    pub fn with_summary(mut self, strategy: SummaryStrategy) -> Self {
        self.summary = strategy;
        self
    }

    /// Whether a section title is one of the generic labels.
    pub fn is_generic_title(&self, title: &str) -> bool {
        let title = title.trim().to_lowercase();
        self.generic_titles.iter().any(|g| *g == title)
    }
}

/// Page text of one document, as handed to the ranker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    /// Identifier reported in results (the request's file name)
    pub name: String,
    /// Pages in order
    pub pages: Vec<PageText>,
}

impl DocumentText {
    pub fn new(name: impl Into<String>, pages: Vec<PageText>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// All page text joined with newlines.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Ranks sections of a document collection for a persona and task.
#[derive(Debug, Clone)]
pub struct Ranker {
    options: RankingOptions,
    generator: KeywordGenerator,
    segmenter: Segmenter,
    summarizer: Summarizer,
    parallel: bool,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_options(RankingOptions::default())
    }
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RankingOptions) -> Self {
        Self {
            generator: KeywordGenerator::from_options(&options),
            segmenter: Segmenter::new(options.max_title_words),
            summarizer: Summarizer::from_options(&options),
            options,
            parallel: true,
        }
    }

    /// Enable or disable per-document parallelism.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn options(&self) -> &RankingOptions {
        &self.options
    }

    /// Final keyword set for a persona and task over the given documents.
    pub fn keywords(&self, persona: &str, task: &str, documents: &[DocumentText]) -> KeywordSet {
        let mut keywords = self.generator.primary(persona, task);
        if !self.options.two_pass {
            return keywords;
        }

        let task_keywords = self.generator.generate(task);
        let texts: Vec<String> = documents.iter().map(DocumentText::full_text).collect();
        match select_anchor(texts.iter().map(String::as_str), &task_keywords) {
            Some(i) => {
                let contextual = self.generator.contextual(&texts[i]);
                log::debug!(
                    "anchor document {}, {} contextual keywords",
                    documents[i].name,
                    contextual.len()
                );
                keywords.augment(&contextual);
            }
            None => log::debug!("no anchor document, using primary keywords only"),
        }
        keywords
    }

    /// Score and rank sections; the best come first.
    pub fn ranked_sections(
        &self,
        documents: &[DocumentText],
        keywords: &KeywordSet,
    ) -> Vec<ScoredSection> {
        let per_document = |doc: &DocumentText| {
            let sections = self.segmenter.segment(&doc.pages);
            log::debug!("{}: {} sections", doc.name, sections.len());
            rank_document(&doc.name, sections, keywords, &self.options)
        };

        let scored: Vec<Vec<ScoredSection>> = if self.parallel {
            documents.par_iter().map(per_document).collect()
        } else {
            documents.iter().map(per_document).collect()
        };

        rank_globally(scored, self.options.max_sections)
    }

    /// Rank a request, stamping the result with the current local time.
    pub fn rank(&self, request: &RankingRequest, documents: &[DocumentText]) -> RankingResult {
        self.rank_at(request, documents, Local::now())
    }

    /// Rank a request with an explicit processing timestamp.
    pub fn rank_at<Tz>(
        &self,
        request: &RankingRequest,
        documents: &[DocumentText],
        timestamp: DateTime<Tz>,
    ) -> RankingResult
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let persona = request.persona.role.as_str();
        let task = request.job_to_be_done.task.as_str();
        let keywords = self.keywords(persona, task, documents);
        if keywords.is_empty() {
            log::warn!("no keywords extracted from persona and task");
        }

        let ranked = self.ranked_sections(documents, &keywords);
        log::info!("ranked {} sections", ranked.len());

        let extracted_sections = ranked
            .iter()
            .zip(1u32..)
            .map(|(s, rank)| ExtractedSection {
                document: s.document.clone(),
                section_title: s.section.title.clone(),
                importance_rank: rank,
                page_number: s.section.page,
            })
            .collect();

        let subsection_analysis = ranked
            .iter()
            .map(|s| SubsectionAnalysis {
                document: s.document.clone(),
                refined_text: self.summarizer.summarize(&s.section, &keywords),
                page_number: s.section.page,
            })
            .collect();

        RankingResult {
            metadata: RankingMetadata {
                input_documents: request.filenames(),
                persona: persona.to_string(),
                job_to_be_done: task.to_string(),
                processing_timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, false),
            },
            extracted_sections,
            subsection_analysis,
        }
    }
}
