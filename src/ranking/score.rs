//! Section relevance scoring and ranking.

use crate::model::{ScoredSection, Section};

use super::keywords::{KeywordSet, TermCounts};
use super::RankingOptions;

/// Keyword relevance of a section, normalised by content length.
///
/// Title occurrences weigh `title_weight` times content occurrences. Generic
/// titles ("Introduction", "References", ...) are discounted.
pub fn score_section(section: &Section, keywords: &KeywordSet, options: &RankingOptions) -> f64 {
    let content = TermCounts::from_text(&section.content);
    let title = TermCounts::from_text(&section.title);

    let raw = keywords.weighted_hits(&content)
        + keywords.weighted_hits(&title) * options.title_weight;
    let words = section.content.split_whitespace().count().max(1);
    let score = raw / words as f64;

    if options.is_generic_title(&section.title) {
        score * options.generic_penalty
    } else {
        score
    }
}

/// Score a document's sections and keep its best ones.
///
/// Sections scoring at or below `min_score` are dropped; of the rest the
/// `top_k` highest are kept, returned in section order.
pub fn rank_document(
    document: &str,
    sections: Vec<Section>,
    keywords: &KeywordSet,
    options: &RankingOptions,
) -> Vec<ScoredSection> {
    let mut scored: Vec<(usize, ScoredSection)> = sections
        .into_iter()
        .map(|section| {
            let score = score_section(&section, keywords, options);
            ScoredSection {
                section,
                score,
                document: document.to_string(),
            }
        })
        .filter(|s| s.score > options.min_score)
        .enumerate()
        .collect();

    scored.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));
    scored.truncate(options.top_k);
    scored.sort_by_key(|(i, _)| *i);

    scored.into_iter().map(|(_, s)| s).collect()
}

/// Merge per-document results into one ranking, best first.
///
/// The sort is stable: equal scores keep document order, then section order.
pub fn rank_globally(per_document: Vec<Vec<ScoredSection>>, max_sections: Option<usize>) -> Vec<ScoredSection> {
    let mut all: Vec<ScoredSection> = per_document.into_iter().flatten().collect();
    all.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(max) = max_sections {
        all.truncate(max);
    }
    all
}
