//! Splitting page text into titled sections.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{PageText, Section};

static RE_TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z0-9 ,&'()/:\-–]{2,89}$").expect("valid title line regex")
});

/// Title of the section holding text before the first title line.
pub const LEADING_SECTION_TITLE: &str = "Introduction";

/// Splits documents into sections at title lines.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    max_title_words: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(13)
    }
}

impl Segmenter {
    /// Title lines must have fewer than `max_title_words` words.
    pub fn new(max_title_words: usize) -> Self {
        Self { max_title_words }
    }

    /// Whether a (trimmed) line looks like a section title.
    pub fn is_title_line(&self, line: &str) -> bool {
        RE_TITLE_LINE.is_match(line)
            && !line.ends_with('.')
            && line.split_whitespace().count() < self.max_title_words
            && !line.contains("  ")
    }

    /// Split pages into sections. Sections with blank content are dropped.
    pub fn segment(&self, pages: &[PageText]) -> Vec<Section> {
        let first_page = pages.first().map_or(1, |p| p.page);
        let mut sections = Vec::new();
        let mut current = Section::new(LEADING_SECTION_TITLE, String::new(), first_page);

        for page in pages {
            for line in page.text.lines() {
                let trimmed = line.trim();
                if self.is_title_line(trimmed) {
                    let next = Section::new(trimmed, String::new(), page.page);
                    push_section(&mut sections, std::mem::replace(&mut current, next));
                } else {
                    current.content.push_str(line);
                    current.content.push('\n');
                }
            }
        }
        push_section(&mut sections, current);

        sections
    }
}

fn push_section(sections: &mut Vec<Section>, mut section: Section) {
    let content = section.content.trim();
    if !content.is_empty() {
        section.content = content.to_string();
        sections.push(section);
    }
}
