//! Layout types produced by the layout adapter.
//!
//! Coordinates are top-down: `y0` is the distance of an element's top edge
//! from the top of the page, in points.

use serde::{Deserialize, Serialize};

/// A font style key: rounded font size plus weight.
///
/// Ordering is by size first, then boldness (regular < bold), which is the
/// order used to rank prominent styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Style {
    /// Font size rounded to the nearest point (ties to even)
    pub size: i32,
    /// Whether the font is bold
    pub bold: bool,
}

impl Style {
    /// Create a style key.
    pub fn new(size: i32, bold: bool) -> Self {
        Self { size, bold }
    }

    /// Build a style key from a raw font size.
    pub fn from_size(size: f32, bold: bool) -> Self {
        Self {
            size: size.round_ties_even() as i32,
            bold,
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}pt{}", self.size, if self.bold { " bold" } else { "" })
    }
}

/// An atomic run of styled text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Whether the font appears to be bold
    pub bold: bool,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, size: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            size,
            bold,
        }
    }

    /// Style key of this span.
    pub fn style(&self) -> Style {
        Style::from_size(self.size, self.bold)
    }
}

/// A line of spans sharing a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Spans in reading order
    pub spans: Vec<Span>,
    /// Top edge of the line
    pub y0: f32,
}

impl Line {
    /// Create a new line.
    pub fn new(y0: f32, spans: Vec<Span>) -> Self {
        Self { spans, y0 }
    }

    /// Span text joined without separators.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A block of lines, as grouped by the layout adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Lines in reading order
    pub lines: Vec<Line>,
    /// Top edge of the block
    pub y0: f32,
}

impl Block {
    /// Create a new block.
    pub fn new(y0: f32, lines: Vec<Line>) -> Self {
        Self { lines, y0 }
    }

    /// A block holding a single one-span line.
    pub fn single(y0: f32, span: Span) -> Self {
        Self::new(y0, vec![Line::new(y0, vec![span])])
    }

    /// All spans of the block in reading order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }

    /// First span of the first line, if any.
    pub fn first_span(&self) -> Option<&Span> {
        self.lines.first().and_then(|l| l.spans.first())
    }

    /// Span texts joined with single spaces, whitespace-normalised.
    pub fn text(&self) -> String {
        normalize_whitespace(
            &self
                .spans()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// Check if the block carries no text.
    pub fn is_empty(&self) -> bool {
        self.spans().all(|s| s.text.trim().is_empty())
    }
}

/// A page of layout blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Text blocks in reading order
    pub blocks: Vec<Block>,
}

impl LayoutPage {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Create an empty US Letter page (612 x 792 points).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a block (builder style).
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

/// A document as seen by the outline pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// File name or other identifier, used as the last-resort title
    pub name: String,
    /// Pages in order
    pub pages: Vec<LayoutPage>,
}

impl LayoutDocument {
    /// Create an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    /// Add a page (builder style).
    pub fn with_page(mut self, page: LayoutPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Plain text of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page: u32,
    /// Extracted text, lines separated by `\n`
    pub text: String,
}

impl PageText {
    /// Create a page text entry.
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
