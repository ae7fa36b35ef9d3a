//! Outline extraction: title plus H1-H5 headings of a single document.
//!
//! The pipeline runs in four passes over a [`LayoutDocument`]:
//!
//! 1. [`Boilerplate`] finds running headers and footers.
//! 2. [`StyleProfile`] finds the body style and ranks the prominent styles.
//! 3. The title is read from the largest text on the first page.
//! 4. Every text unit runs through the heading rules in [`heading`].

mod boilerplate;
pub mod heading;
mod options;
mod style;
mod title;

use std::path::Path;

use regex::Regex;

use crate::error::Result;
use crate::model::{LayoutDocument, OutlineEntry, OutlineResult};
use crate::parser::{file_name, ErrorMode, LayoutSource, ParseOptions, PdfLayoutSource};

pub use boilerplate::Boilerplate;
pub use heading::{Decision, TextUnit};
pub use options::OutlineOptions;
pub use style::StyleProfile;
pub use title::{fallback_name, first_page_title, resolve_title};

use heading::{Candidate, Context};

/// Extracts a title and outline from layout documents.
#[derive(Debug, Clone)]
pub struct OutlineExtractor {
    options: OutlineOptions,
    noise: Vec<Regex>,
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self {
            options: OutlineOptions::default(),
            noise: Vec::new(),
        }
    }
}

impl OutlineExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    ///
    /// Fails if one of the extra noise patterns does not compile.
    pub fn with_options(options: OutlineOptions) -> Result<Self> {
        let noise = options.compiled_noise_patterns()?;
        Ok(Self { options, noise })
    }

    /// Options in effect.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of a document.
    pub fn extract(&self, doc: &LayoutDocument) -> OutlineResult {
        if doc.is_empty() {
            return OutlineResult::empty(fallback_name(&doc.name));
        }

        let boilerplate = Boilerplate::detect(doc, &self.options);
        let profile = StyleProfile::build(doc, &boilerplate, self.options.max_levels);
        let detected_title = first_page_title(doc, self.options.title_size_tolerance);

        let ctx = Context {
            title: detected_title.as_deref().unwrap_or(""),
            boilerplate: &boilerplate,
            profile: &profile,
            options: &self.options,
            noise: &self.noise,
        };

        let outline: Vec<OutlineEntry> =
            heading::text_units(doc, &boilerplate, self.options.toc_page_limit)
                .iter()
                .filter_map(|unit| {
                    let candidate = Candidate::new(unit);
                    match heading::classify(&candidate, &ctx) {
                        Decision::Heading(level) => {
                            Some(OutlineEntry::new(level, candidate.text, unit.page))
                        }
                        Decision::Reject(_) => None,
                    }
                })
                .collect();

        let title = resolve_title(detected_title, &outline, &doc.name);
        log::debug!("{}: title {:?}, {} headings", doc.name, title, outline.len());

        OutlineResult { title, outline }
    }

    /// Read a document through `source` and extract its outline.
    ///
    /// Never fails: a document that cannot be read yields an empty outline
    /// titled with its file name.
    pub fn extract_from<S: LayoutSource + ?Sized>(&self, source: &S, path: &Path) -> OutlineResult {
        match source.layout(path) {
            Ok(doc) if doc.is_empty() => {
                log::warn!("{}: document has no pages", path.display());
                OutlineResult::empty(fallback_name(&file_name(path)))
            }
            Ok(doc) => self.extract(&doc),
            Err(e) => {
                if e.is_document_local() {
                    log::warn!("{}: {}", path.display(), e);
                } else {
                    log::error!("{}: {}", path.display(), e);
                }
                OutlineResult::empty(fallback_name(&file_name(path)))
            }
        }
    }
}

/// Extract the outline of a PDF file with default options.
///
/// Pages that fail to decode are skipped. Never fails; see
/// [`OutlineExtractor::extract_from`].
pub fn extract_outline_file<P: AsRef<Path>>(path: P) -> OutlineResult {
    let source =
        PdfLayoutSource::with_options(ParseOptions::new().with_error_mode(ErrorMode::Lenient));
    OutlineExtractor::new().extract_from(&source, path.as_ref())
}
