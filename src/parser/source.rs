//! Document sources for the outline and ranking pipelines.

use std::path::Path;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{LayoutDocument, PageText};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ParseOptions};

/// Anything that can turn a document path into layout or page text.
///
/// The outline pipeline uses [`layout`](LayoutSource::layout), the ranking
/// pipeline uses [`page_texts`](LayoutSource::page_texts).
pub trait LayoutSource: Sync {
    /// Geometry-aware view of the document.
    fn layout(&self, path: &Path) -> Result<LayoutDocument>;

    /// Plain text per page, 1-indexed, in page order.
    fn page_texts(&self, path: &Path) -> Result<Vec<PageText>>;
}

/// [`LayoutSource`] reading PDF files through lopdf.
#[derive(Debug, Clone, Default)]
pub struct PdfLayoutSource {
    options: ParseOptions,
}

impl PdfLayoutSource {
    /// Create a source with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn open(&self, path: &Path) -> Result<LopdfBackend> {
        let open_error = |e: Error| Error::DocumentOpen {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let header = detect::read_header(path).map_err(open_error)?;
        let backend = LopdfBackend::load_file(path).map_err(open_error)?;
        log::debug!("{}: {}", path.display(), header);

        if backend.page_count() == 0 {
            return Err(Error::EmptyDocument(path.display().to_string()));
        }
        Ok(backend)
    }

    /// Apply the error mode to a page-level failure.
    fn page_failure<T>(&self, page_num: u32, err: Error) -> Result<Option<T>> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(err),
            ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", page_num, err);
                Ok(None)
            }
        }
    }
}

impl LayoutSource for PdfLayoutSource {
    fn layout(&self, path: &Path) -> Result<LayoutDocument> {
        let backend = self.open(path)?;
        let analyzer = LayoutAnalyzer::new(&backend);
        let mut document = LayoutDocument::new(file_name(path));

        for (page_num, page_id) in backend.pages() {
            if !self.options.includes_page(page_num) {
                continue;
            }
            let page = match analyzer.analyze_page(page_num, page_id) {
                Ok(page) => Some(page),
                Err(e) => self.page_failure(page_num, e)?,
            };
            document.pages.extend(page);
        }

        Ok(document)
    }

    fn page_texts(&self, path: &Path) -> Result<Vec<PageText>> {
        let backend = self.open(path)?;
        let mut texts = Vec::new();

        for page_num in backend.pages().into_keys() {
            if !self.options.includes_page(page_num) {
                continue;
            }
            let text = match backend.page_text(page_num) {
                Ok(text) => Some(PageText::new(page_num, text)),
                Err(e) => self.page_failure(page_num, e)?,
            };
            texts.extend(text);
        }

        Ok(texts)
    }
}

/// Final path component, or the whole path when there is none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
