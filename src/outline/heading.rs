//! Heading classification.
//!
//! Each text unit runs through an ordered list of rules; the first rule that
//! reaches a decision wins. Rejections come first, then pattern matches, then
//! the style fallback.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{normalize_whitespace, HeadingLevel, LayoutDocument, Style};

use super::{Boilerplate, OutlineOptions, StyleProfile};

static RE_TOC_PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[. ]{3,}\s*\d+\s*$|\s+\d+\s*$").expect("valid toc page number regex")
});
static RE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)copyright ©|version \d|\d{4}|page \d+ of \d+").expect("valid noise regex")
});
static RE_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[•●▪◦\-–—*]|:\s*$").expect("valid bullet regex")
});
static RE_LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\d+\.\s|[a-z]\))").expect("valid list marker regex")
});
static RE_NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:\d+(?:\.\d+)*|(?:[A-Z]|[IVXLC]+)(?:\.\d+)+)\.?|(?:[A-Z]|[IVXLC]+)\.)\s+\S")
        .expect("valid numbering regex")
});
static RE_STRUCTURAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(chapter\s+\d+:.*|appendix\s+[a-z]:?.*)|(?:summary|introduction|background|conclusions?|references|abstract|results|discussion|acknowledge?ments)\b|mission\s+statement:|goals:|timeline:)",
    )
    .expect("valid structural keyword regex")
});

/// A line or block considered for heading classification.
#[derive(Debug, Clone, PartialEq)]
pub struct TextUnit {
    /// Unit text, trimmed
    pub text: String,
    /// Style of the first span
    pub style: Style,
    /// Whether the first span is bold
    pub bold: bool,
    /// Number of lines in the unit
    pub line_count: usize,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Split a document into classification units in reading order.
///
/// Multi-line blocks on the first `toc_page_limit` pages yield one unit per
/// line, every other block yields a single unit. Boilerplate blocks are
/// skipped.
pub fn text_units(
    doc: &LayoutDocument,
    boilerplate: &Boilerplate,
    toc_page_limit: u32,
) -> Vec<TextUnit> {
    let mut units = Vec::new();

    for (index, page) in doc.pages.iter().enumerate() {
        let toc_like_page = (index as u32) < toc_page_limit;

        for block in &page.blocks {
            if boilerplate.is_boilerplate_block(block) {
                continue;
            }

            if toc_like_page && block.lines.len() > 1 {
                for line in &block.lines {
                    if let Some(span) = line.spans.first() {
                        units.push(TextUnit {
                            text: normalize_whitespace(&line.text()),
                            style: span.style(),
                            bold: span.bold,
                            line_count: 1,
                            page: page.number,
                        });
                    }
                }
            } else if let Some(span) = block.first_span() {
                let text = block
                    .lines
                    .iter()
                    .map(|l| l.text())
                    .collect::<Vec<_>>()
                    .join(" ");
                units.push(TextUnit {
                    text: normalize_whitespace(&text),
                    style: span.style(),
                    bold: span.bold,
                    line_count: block.lines.len(),
                    page: page.number,
                });
            }
        }
    }

    units
}

/// Outcome of classifying a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The unit is a heading at this level
    Heading(HeadingLevel),
    /// The unit is not a heading; the name of the deciding rule
    Reject(&'static str),
}

/// Per-document state shared by the rules.
pub struct Context<'a> {
    pub title: &'a str,
    pub boilerplate: &'a Boilerplate,
    pub profile: &'a StyleProfile,
    pub options: &'a OutlineOptions,
    pub noise: &'a [Regex],
}

/// A unit with its normalised text.
pub struct Candidate<'a> {
    pub unit: &'a TextUnit,
    /// Text with any trailing table-of-contents page number removed
    pub text: String,
    pub words: usize,
}

impl<'a> Candidate<'a> {
    pub fn new(unit: &'a TextUnit) -> Self {
        let text = strip_toc_page_number(&unit.text);
        let words = text.split_whitespace().count();
        Self { unit, text, words }
    }

    fn emphasised(&self, ctx: &Context) -> bool {
        self.unit.bold || ctx.profile.is_prominent(self.unit.style)
    }
}

type Rule = fn(&Candidate, &Context) -> Option<Decision>;

/// Classification rules, in priority order.
pub const RULES: &[(&str, Rule)] = &[
    ("empty", reject_empty),
    ("title", reject_title),
    ("boilerplate", reject_boilerplate),
    ("noise", reject_noise),
    ("list-item", reject_list_item),
    ("paragraph", reject_paragraph),
    ("sentence", reject_sentence),
    ("too-long", reject_too_long),
    ("numbering", numbered_heading),
    ("structural-keyword", structural_heading),
    ("style", style_heading),
];

/// Run the rule list over a unit.
pub fn classify(candidate: &Candidate, ctx: &Context) -> Decision {
    for (name, rule) in RULES {
        if let Some(decision) = rule(candidate, ctx) {
            log::trace!("{:?}: {:?} by rule {}", candidate.text, decision, name);
            return decision;
        }
    }
    Decision::Reject("no-match")
}

/// Remove a trailing table-of-contents page number ("Goals ....... 4").
pub fn strip_toc_page_number(text: &str) -> String {
    RE_TOC_PAGE_NUMBER.replace(text, "").trim().to_string()
}

/// Heading level implied by a leading numbering token ("2.3.1 Results" is H3).
pub fn numbering_level(text: &str) -> Option<HeadingLevel> {
    let token = RE_NUMBERED.captures(text)?.get(1)?.as_str();
    let dots = token.trim_end_matches('.').matches('.').count();
    Some(HeadingLevel::from_depth(dots + 1))
}

/// Heading level for structural keywords such as "Introduction" or "Chapter 2:".
pub fn structural_level(text: &str) -> Option<HeadingLevel> {
    let caps = RE_STRUCTURAL.captures(text)?;
    Some(if caps.get(1).is_some() {
        HeadingLevel::H2
    } else {
        HeadingLevel::H1
    })
}

fn reject_empty(c: &Candidate, _: &Context) -> Option<Decision> {
    c.text.is_empty().then_some(Decision::Reject("empty"))
}

fn reject_title(c: &Candidate, ctx: &Context) -> Option<Decision> {
    (c.text == ctx.title).then_some(Decision::Reject("title"))
}

fn reject_boilerplate(c: &Candidate, ctx: &Context) -> Option<Decision> {
    (ctx.boilerplate.contains(&c.text) || ctx.boilerplate.contains(&c.unit.text))
        .then_some(Decision::Reject("boilerplate"))
}

fn reject_noise(c: &Candidate, ctx: &Context) -> Option<Decision> {
    let noisy = RE_NOISE.is_match(&c.text) || ctx.noise.iter().any(|re| re.is_match(&c.text));
    noisy.then_some(Decision::Reject("noise"))
}

fn reject_list_item(c: &Candidate, ctx: &Context) -> Option<Decision> {
    let list = RE_BULLET.is_match(&c.text)
        || (RE_LIST_MARKER.is_match(&c.text) && !c.emphasised(ctx));
    list.then_some(Decision::Reject("list-item"))
}

fn reject_paragraph(c: &Candidate, _: &Context) -> Option<Decision> {
    (c.unit.line_count > 1 && !c.unit.bold).then_some(Decision::Reject("paragraph"))
}

fn reject_sentence(c: &Candidate, ctx: &Context) -> Option<Decision> {
    let sentence =
        c.text.ends_with('.') && !c.unit.bold && c.words > ctx.options.sentence_min_words;
    sentence.then_some(Decision::Reject("sentence"))
}

fn reject_too_long(c: &Candidate, ctx: &Context) -> Option<Decision> {
    (c.words > ctx.options.max_heading_words).then_some(Decision::Reject("too-long"))
}

fn numbered_heading(c: &Candidate, _: &Context) -> Option<Decision> {
    numbering_level(&c.text).map(Decision::Heading)
}

fn structural_heading(c: &Candidate, _: &Context) -> Option<Decision> {
    structural_level(&c.text).map(Decision::Heading)
}

fn style_heading(c: &Candidate, ctx: &Context) -> Option<Decision> {
    ctx.profile.level_of(c.unit.style).map(Decision::Heading)
}
