//! Document title detection.

use crate::model::{Block, LayoutDocument, OutlineEntry};

/// Title from the largest text on the first page.
///
/// Every first-page block whose first span is within `tolerance` points of
/// the largest first-span size is a candidate; candidates are read top to
/// bottom and joined with single spaces.
pub fn first_page_title(doc: &LayoutDocument, tolerance: f32) -> Option<String> {
    let page = doc.pages.first()?;
    let sized: Vec<(f32, &Block)> = page
        .blocks
        .iter()
        .filter_map(|b| b.first_span().map(|s| (s.size, b)))
        .collect();

    let max_size = sized.iter().map(|(size, _)| *size).fold(0.0_f32, f32::max);
    if max_size <= 0.0 {
        return None;
    }

    let mut candidates: Vec<(f32, String)> = sized
        .into_iter()
        .filter(|(size, _)| (size - max_size).abs() < tolerance)
        .map(|(_, b)| (b.y0, b.text()))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let title = candidates
        .into_iter()
        .map(|(_, text)| text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!title.is_empty()).then_some(title)
}

/// Pick the final title: detected title, else first heading, else the file name.
pub fn resolve_title(detected: Option<String>, outline: &[OutlineEntry], name: &str) -> String {
    detected
        .or_else(|| outline.first().map(|e| e.text.clone()))
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| fallback_name(name))
}

/// Never-empty stand-in title for a document.
pub fn fallback_name(name: &str) -> String {
    if name.trim().is_empty() {
        "untitled".to_string()
    } else {
        name.to_string()
    }
}
