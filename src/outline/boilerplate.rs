//! Running header and footer detection.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::model::{Block, LayoutDocument, LayoutPage};

use super::OutlineOptions;

/// Text recurring in the header or footer zone of several pages.
#[derive(Debug, Clone, Default)]
pub struct Boilerplate {
    texts: HashSet<String>,
}

impl Boilerplate {
    /// Collect short header/footer texts and keep those seen on enough distinct pages.
    pub fn detect(doc: &LayoutDocument, options: &OutlineOptions) -> Self {
        let mut candidates: HashMap<String, BTreeSet<u32>> = HashMap::new();

        for page in &doc.pages {
            for block in page.blocks.iter().filter(|b| in_margin(b, page, options)) {
                let text = block.text();
                if text.is_empty() || text.split_whitespace().count() >= options.boilerplate_max_words
                {
                    continue;
                }
                candidates.entry(text).or_default().insert(page.number);
            }
        }

        let texts: HashSet<String> = candidates
            .into_iter()
            .filter(|(_, pages)| pages.len() >= options.boilerplate_min_pages)
            .map(|(text, _)| text)
            .collect();

        if !texts.is_empty() {
            log::debug!("{}: {} boilerplate texts", doc.name, texts.len());
        }
        Self { texts }
    }

    /// Whether the (whitespace-normalised) text is boilerplate.
    pub fn contains(&self, text: &str) -> bool {
        self.texts.contains(text)
    }

    /// Whether a whole block is boilerplate.
    pub fn is_boilerplate_block(&self, block: &Block) -> bool {
        !self.texts.is_empty() && self.texts.contains(&block.text())
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

fn in_margin(block: &Block, page: &LayoutPage, options: &OutlineOptions) -> bool {
    block.y0 < page.height * options.header_zone
        || block.y0 > page.height * (1.0 - options.footer_zone)
}
