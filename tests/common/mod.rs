//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use docsift::model::{Block, LayoutDocument, LayoutPage, Line, PageText, Span};
use docsift::parser::file_name;
use docsift::{Error, LayoutSource, Result};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text to place on a generated PDF page.
pub struct TextLine {
    pub text: &'static str,
    pub size: f32,
    pub bold: bool,
    pub y: f32,
}

pub fn text(text: &'static str, size: f32, bold: bool, y: f32) -> TextLine {
    TextLine { text, size, bold, y }
}

/// Build a US Letter PDF with Helvetica / Helvetica-Bold text lines.
pub fn build_pdf(pages: &[Vec<TextLine>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for line in lines {
            let font = if line.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), line.size.into()]));
            operations.push(Operation::new("Td", vec![72.into(), line.y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(line.text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// The three-page project plan: 24pt bold title, 16pt bold "1. Goals" on
/// page 2, 11pt body text and a 9pt footer on every page.
pub fn project_plan_pdf() -> Vec<u8> {
    let footer = || text("Acme Corp Confidential", 9.0, false, 30.0);
    build_pdf(&[
        vec![
            text("Project Plan", 24.0, true, 700.0),
            text("This plan describes the work for the coming quarter.", 11.0, false, 640.0),
            footer(),
        ],
        vec![
            text("1. Goals", 16.0, true, 700.0),
            text("We want to ship the product on time and on budget.", 11.0, false, 670.0),
            text("and keep every customer happy", 11.0, false, 656.0),
            footer(),
        ],
        vec![
            text("Milestones", 16.0, true, 700.0),
            text("Design is done in June and the build follows in July.", 11.0, false, 670.0),
            footer(),
        ],
    ])
}

/// Drop the `/Contents` entry of a 1-indexed page, leaving it blank.
pub fn without_contents(pdf: &[u8], page: u32) -> Vec<u8> {
    let mut doc = Document::load_mem(pdf).unwrap();
    let page_id = doc.get_pages()[&page];
    doc.get_dictionary_mut(page_id).unwrap().remove(b"Contents");
    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Layout-level fixture builders.
pub fn span_block(y0: f32, text: &str, size: f32, bold: bool) -> Block {
    Block::single(y0, Span::new(text, size, bold))
}

pub fn lines_block(y0: f32, lines: &[&str], size: f32, bold: bool) -> Block {
    Block::new(
        y0,
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| Line::new(y0 + i as f32 * 14.0, vec![Span::new(*l, size, bold)]))
            .collect(),
    )
}

pub fn page(number: u32, blocks: Vec<Block>) -> LayoutPage {
    blocks
        .into_iter()
        .fold(LayoutPage::letter(number), |p, b| p.with_block(b))
}

/// In-memory [`LayoutSource`] keyed by file name.
#[derive(Default)]
pub struct MemorySource {
    layouts: HashMap<String, LayoutDocument>,
    texts: HashMap<String, Vec<PageText>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, doc: LayoutDocument) -> Self {
        self.layouts.insert(doc.name.clone(), doc);
        self
    }

    pub fn with_text(mut self, name: &str, pages: &[&str]) -> Self {
        let pages = pages
            .iter()
            .enumerate()
            .map(|(i, t)| PageText::new(i as u32 + 1, *t))
            .collect();
        self.texts.insert(name.to_string(), pages);
        self
    }

    fn missing(path: &Path) -> Error {
        Error::DocumentOpen {
            path: path.display().to_string(),
            reason: "not in memory source".to_string(),
        }
    }
}

impl LayoutSource for MemorySource {
    fn layout(&self, path: &Path) -> Result<LayoutDocument> {
        self.layouts
            .get(&file_name(path))
            .cloned()
            .ok_or_else(|| Self::missing(path))
    }

    fn page_texts(&self, path: &Path) -> Result<Vec<PageText>> {
        self.texts
            .get(&file_name(path))
            .cloned()
            .ok_or_else(|| Self::missing(path))
    }
}

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
