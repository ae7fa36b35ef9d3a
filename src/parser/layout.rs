//! Layout analysis for PDF pages.
//!
//! Interprets the text operators of a page's content stream into positioned
//! spans, groups spans sharing a baseline into lines, and groups lines into
//! blocks by vertical spacing, font size changes and indentation. The result
//! is converted to top-down coordinates for the outline pipeline.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::{Block, LayoutPage, Line, Span};

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// A text span in PDF user space (origin bottom-left).
#[derive(Debug, Clone)]
pub struct PositionedSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl PositionedSpan {
    /// Create a new span; boldness is inferred from the font name.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let width = text.chars().count() as f32 * font_size * 0.5;

        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
            is_bold,
        }
    }

    /// Top Y coordinate (approximate ascender).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }
}

/// A line of positioned spans on the same baseline.
#[derive(Debug, Clone)]
struct PositionedLine {
    spans: Vec<PositionedSpan>,
    y: f32,
    x: f32,
    font_size: f32,
}

impl PositionedLine {
    fn from_spans(mut spans: Vec<PositionedSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = match (total_chars, spans.first()) {
            (0, Some(first)) => first.font_size,
            (n, _) if n > 0 => weighted / n as f32,
            _ => 0.0,
        };

        let (x, y) = spans.first().map(|s| (s.x, s.y)).unwrap_or((0.0, 0.0));
        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    fn top(&self) -> f32 {
        self.spans
            .iter()
            .map(PositionedSpan::top)
            .fold(self.y, f32::max)
    }
}

/// Layout analyzer for one document.
pub struct LayoutAnalyzer<'a, B: PdfBackend> {
    backend: &'a B,
}

impl<'a, B: PdfBackend> LayoutAnalyzer<'a, B> {
    /// Create a new layout analyzer.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Analyse a page into top-down blocks.
    pub fn analyze_page(&self, page_num: u32, page_id: PageId) -> Result<LayoutPage> {
        let (width, height) = self.backend.page_size(page_id);
        let spans = self.extract_page_spans(page_id)?;
        let lines = group_spans_into_lines(spans);
        let blocks = group_lines_into_blocks(lines);

        log::debug!("page {}: {} blocks", page_num, blocks.len());

        Ok(LayoutPage {
            number: page_num,
            width,
            height,
            blocks: blocks
                .into_iter()
                .map(|lines| to_model_block(lines, height))
                .collect(),
        })
    }

    /// Extract positioned spans from a page's content stream.
    pub fn extract_page_spans(&self, page_id: PageId) -> Result<Vec<PositionedSpan>> {
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();

        let content = self.backend.page_content(page_id)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;
        Ok(self.interpret(page_id, &ops, &fonts))
    }

    fn interpret(
        &self,
        page_id: PageId,
        ops: &[ContentOp],
        fonts: &HashMap<Vec<u8>, String>,
    ) -> Vec<PositionedSpan> {
        let mut spans = Vec::new();
        let mut state = TextState::default();
        let mut in_text_block = false;

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        state.font_resource = name.clone();
                        state.font_name = fonts
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    }
                    state.font_size = op.number(1, 12.0);
                }
                "TL" => state.leading = op.number(0, state.leading),
                "Td" => state.matrix.translate(op.number(0, 0.0), op.number(1, 0.0)),
                "TD" => {
                    let ty = op.number(1, 0.0);
                    state.leading = -ty;
                    state.matrix.translate(op.number(0, 0.0), ty);
                }
                "Tm" => state.matrix.set([
                    op.number(0, 1.0),
                    op.number(1, 0.0),
                    op.number(2, 0.0),
                    op.number(3, 1.0),
                    op.number(4, 0.0),
                    op.number(5, 0.0),
                ]),
                "T*" => state.matrix.next_line(state.leading),
                "Tj" | "TJ" | "'" | "\"" if in_text_block => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        state.matrix.next_line(state.leading);
                    }
                    let text = match op.operator.as_str() {
                        "TJ" => self.decode_array(page_id, &state, op.operands.first()),
                        "\"" => self.decode_string(page_id, &state, op.operands.get(2)),
                        _ => self.decode_string(page_id, &state, op.operands.first()),
                    };
                    let text: String = text.nfkc().collect();
                    if !text.trim().is_empty() {
                        let (x, y) = state.matrix.position();
                        spans.push(PositionedSpan::new(
                            text,
                            x,
                            y,
                            state.font_size * state.matrix.scale(),
                            state.font_name.clone(),
                        ));
                    }
                }
                _ => {}
            }
        }

        spans
    }

    fn decode_string(&self, page_id: PageId, state: &TextState, value: Option<&PdfValue>) -> String {
        match value {
            Some(PdfValue::Str(bytes)) => {
                self.backend
                    .decode_text(page_id, &state.font_resource, bytes)
            }
            _ => String::new(),
        }
    }

    /// Decode a TJ array. Large negative kerning (in 1/1000 text space units)
    /// marks a word break.
    fn decode_array(&self, page_id: PageId, state: &TextState, value: Option<&PdfValue>) -> String {
        const SPACE_THRESHOLD: f32 = 200.0;

        let Some(PdfValue::Array(items)) = value else {
            return String::new();
        };

        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&self.backend.decode_text(
                        page_id,
                        &state.font_resource,
                        bytes,
                    ));
                }
                other => {
                    let adjustment = other.as_number().map(|n| -n).unwrap_or(0.0);
                    let ends_open = combined
                        .chars()
                        .last()
                        .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c));
                    if adjustment > SPACE_THRESHOLD && ends_open {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }
}

/// Font and matrix state while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: 12.0,
            matrix: TextMatrix::default(),
        }
    }
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    m: [f32; 6],
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }
}

impl TextMatrix {
    fn set(&mut self, m: [f32; 6]) {
        self.m = m;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, ..] = self.m;
        self.m[4] += tx * a + ty * c;
        self.m[5] += tx * b + ty * d;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.m[4], self.m[5])
    }

    fn scale(&self) -> f32 {
        let [a, _, c, ..] = self.m;
        (a * a + c * c).sqrt()
    }
}

/// Group spans into lines by baseline, top of page first.
fn group_spans_into_lines(mut spans: Vec<PositionedSpan>) -> Vec<PositionedLine> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<PositionedLine> = Vec::new();
    let mut current: Vec<PositionedSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(PositionedLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(PositionedLine::from_spans(current));
    }

    lines
}

/// Group lines into blocks based on spacing.
fn group_lines_into_blocks(lines: Vec<PositionedLine>) -> Vec<Vec<PositionedLine>> {
    let avg_spacing = average_line_spacing(&lines);
    let mut blocks: Vec<Vec<PositionedLine>> = Vec::new();
    let mut current: Vec<PositionedLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn average_line_spacing(lines: &[PositionedLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &PositionedLine, curr: &PositionedLine, avg_spacing: f32) -> bool {
    // Paragraph gap
    if (prev.y - curr.y).abs() > avg_spacing * 1.5 {
        return true;
    }

    // Font size change
    if (prev.font_size - curr.font_size).abs() > 1.0 {
        return true;
    }

    // Indentation change
    (prev.x - curr.x).abs() > 20.0
}

/// Convert a group of lines to a model block with top-down coordinates.
fn to_model_block(lines: Vec<PositionedLine>, page_height: f32) -> Block {
    let lines: Vec<Line> = lines
        .into_iter()
        .map(|line| Line::new(page_height - line.top(), join_spans(line.spans)))
        .collect();
    let y0 = lines.iter().map(|l| l.y0).fold(f32::INFINITY, f32::min);
    Block::new(if y0.is_finite() { y0 } else { 0.0 }, lines)
}

/// Convert positioned spans to model spans, inserting a space where the
/// horizontal gap between neighbours indicates a word break.
fn join_spans(spans: Vec<PositionedSpan>) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::with_capacity(spans.len());
    let mut prev: Option<&PositionedSpan> = None;

    for span in &spans {
        if let (Some(p), Some(last)) = (prev, out.last_mut()) {
            if needs_space(p, span) {
                last.text.push(' ');
            }
        }
        out.push(Span::new(span.text.clone(), span.font_size, span.is_bold));
        prev = Some(span);
    }

    out
}

fn needs_space(prev: &PositionedSpan, curr: &PositionedSpan) -> bool {
    let gap = curr.x - (prev.x + prev.width);
    let chars = curr.text.chars().count().max(1) as f32;
    let threshold = curr.width / chars * 0.2;

    let spaced = prev.text.ends_with([' ', '\u{00A0}']) || curr.text.starts_with([' ', '\u{00A0}']);
    let cjk = prev.text.chars().last().is_some_and(is_spaceless_script_char)
        && curr.text.chars().next().is_some_and(is_spaceless_script_char);

    gap > threshold && !spaced && !cjk
}

/// Check if a character is from a script that does not use word spaces
/// (Chinese and Japanese; Korean does use spaces).
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF        // CJK Unified Ideographs
        | 0x3400..=0x4DBF      // Extension A
        | 0x20000..=0x2EBEF    // Extensions B-F
        | 0x3040..=0x30FF      // Hiragana, Katakana
        | 0x3000..=0x303F)     // CJK Symbols and Punctuation
}
