//! Layout adapter: reads PDF files into layout documents and page text.

mod backend;
mod layout;
mod options;
mod source;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
    DEFAULT_PAGE_SIZE,
};
pub use layout::{LayoutAnalyzer, PositionedSpan};
pub use options::{ErrorMode, ParseOptions};
pub use source::{file_name, LayoutSource, PdfLayoutSource};
