//! # docsift
//!
//! Structure extraction and persona-driven section ranking for PDF documents.
//!
//! Two pipelines share one layout adapter:
//!
//! - **Outline**: title plus H1-H5 headings with page numbers, from font
//!   statistics, running header/footer detection and heading patterns.
//! - **Ranking**: sections of a document collection ranked against a persona
//!   and task, each with an extractive summary.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsift::{extract_outline_file, render, JsonFormat};
//!
//! fn main() -> docsift::Result<()> {
//!     let outline = extract_outline_file("document.pdf");
//!     println!("{}", render::to_json(&outline, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout analysis**: spans, lines and blocks from PDF content streams
//! - **Heading detection**: ordered rule list with numbering and style fallbacks
//! - **Two-pass keywords**: contextual terms mined from an anchor document
//! - **Parallel processing**: Uses Rayon across documents

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod ranking;
pub mod render;

// Re-export commonly used types
pub use detect::{has_pdf_extension, is_pdf, read_header, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    Block, HeadingLevel, LayoutDocument, LayoutPage, Line, OutlineEntry, OutlineResult, PageText,
    RankingRequest, RankingResult, ScoredSection, Section, Span, Style,
};
pub use outline::{extract_outline_file, OutlineExtractor, OutlineOptions};
pub use parser::{ErrorMode, LayoutSource, ParseOptions, PdfLayoutSource};
pub use ranking::{DocumentText, KeywordSet, Ranker, RankingOptions, SummaryStrategy};
pub use render::JsonFormat;

use std::path::Path;

/// Read a PDF into a layout document.
///
/// # Example
///
/// ```no_run
/// let doc = docsift::parse_layout("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_layout<P: AsRef<Path>>(path: P) -> Result<LayoutDocument> {
    PdfLayoutSource::new().layout(path.as_ref())
}

/// Read a PDF into a layout document with custom options.
pub fn parse_layout_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<LayoutDocument> {
    PdfLayoutSource::with_options(options).layout(path.as_ref())
}

/// Read the plain text of every page of a PDF.
pub fn page_texts<P: AsRef<Path>>(path: P) -> Result<Vec<PageText>> {
    PdfLayoutSource::new().page_texts(path.as_ref())
}

/// Run a ranking request file with default options.
///
/// Documents are resolved against the request file's directory.
///
/// # Example
///
/// ```no_run
/// let result = docsift::rank_request_file("collection/request.json").unwrap();
/// println!("{} sections", result.extracted_sections.len());
/// ```
pub fn rank_request_file<P: AsRef<Path>>(path: P) -> Result<RankingResult> {
    batch::rank_request(
        path.as_ref(),
        None,
        &Ranker::new(),
        &PdfLayoutSource::new(),
        true,
    )
}
