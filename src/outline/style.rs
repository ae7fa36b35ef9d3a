//! Font style statistics.

use std::collections::HashMap;

use crate::model::{HeadingLevel, LayoutDocument, Style};

use super::Boilerplate;

/// Body style and heading-level mapping of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleProfile {
    /// Most frequent style; `0pt regular` when the document has no text
    pub body: Style,
    /// Styles more emphatic than the body, most prominent first
    pub prominent: Vec<Style>,
    /// Number of prominent styles mapped to levels
    max_levels: usize,
}

impl StyleProfile {
    /// Build the profile from every span outside boilerplate blocks.
    pub fn build(doc: &LayoutDocument, boilerplate: &Boilerplate, max_levels: usize) -> Self {
        // (style, count) in first-seen order
        let mut histogram: Vec<(Style, usize)> = Vec::new();
        let mut index: HashMap<Style, usize> = HashMap::new();

        let spans = doc
            .pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .filter(|b| !boilerplate.is_boilerplate_block(b))
            .flat_map(|b| b.spans());

        for span in spans {
            let style = span.style();
            match index.get(&style) {
                Some(&i) => histogram[i].1 += 1,
                None => {
                    index.insert(style, histogram.len());
                    histogram.push((style, 1));
                }
            }
        }

        Self::from_histogram(&histogram, max_levels)
    }

    /// Build the profile from style counts given in first-seen order.
    pub fn from_histogram(histogram: &[(Style, usize)], max_levels: usize) -> Self {
        let mut body = Style::new(0, false);
        let mut best = 0;
        for &(style, count) in histogram {
            // strict comparison keeps the first-seen style on ties
            if count > best {
                best = count;
                body = style;
            }
        }

        let mut prominent: Vec<Style> = histogram
            .iter()
            .map(|&(style, _)| style)
            .filter(|s| s.size > body.size || (s.size == body.size && s.bold && !body.bold))
            .collect();
        prominent.sort_by(|a, b| b.cmp(a));

        log::debug!("body style {}, {} prominent styles", body, prominent.len());

        Self {
            body,
            prominent,
            max_levels,
        }
    }

    /// Heading level assigned to a style, if it is among the leading prominent styles.
    pub fn level_of(&self, style: Style) -> Option<HeadingLevel> {
        self.prominent
            .iter()
            .take(self.max_levels.min(HeadingLevel::ALL.len()))
            .position(|s| *s == style)
            .map(|i| HeadingLevel::ALL[i])
    }

    /// Whether the style is more emphatic than the body style.
    pub fn is_prominent(&self, style: Style) -> bool {
        self.prominent.contains(&style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_and_levels() {
        let histogram = [
            (Style::new(24, true), 1),
            (Style::new(11, false), 40),
            (Style::new(16, true), 3),
            (Style::new(11, true), 5),
            (Style::new(9, false), 2),
        ];
        let profile = StyleProfile::from_histogram(&histogram, 5);
        assert_eq!(profile.body, Style::new(11, false));
        assert_eq!(
            profile.prominent,
            vec![Style::new(24, true), Style::new(16, true), Style::new(11, true)]
        );
        assert_eq!(profile.level_of(Style::new(24, true)), Some(HeadingLevel::H1));
        assert_eq!(profile.level_of(Style::new(11, true)), Some(HeadingLevel::H3));
        assert_eq!(profile.level_of(Style::new(11, false)), None);
        assert_eq!(profile.level_of(Style::new(9, false)), None);
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let histogram = [(Style::new(12, false), 4), (Style::new(10, false), 4)];
        let profile = StyleProfile::from_histogram(&histogram, 5);
        assert_eq!(profile.body, Style::new(12, false));
    }

    #[test]
    fn test_only_five_levels() {
        let mut histogram: Vec<(Style, usize)> = vec![(Style::new(10, false), 100)];
        histogram.extend((11..=17).map(|size| (Style::new(size, false), 1)));
        let profile = StyleProfile::from_histogram(&histogram, 5);
        assert_eq!(profile.prominent.len(), 7);
        assert_eq!(profile.level_of(Style::new(17, false)), Some(HeadingLevel::H1));
        assert_eq!(profile.level_of(Style::new(13, false)), Some(HeadingLevel::H5));
        assert_eq!(profile.level_of(Style::new(12, false)), None);
        assert!(profile.is_prominent(Style::new(12, false)));
    }

    #[test]
    fn test_empty_document() {
        let profile = StyleProfile::from_histogram(&[], 5);
        assert_eq!(profile.body, Style::new(0, false));
        assert!(profile.prominent.is_empty());
    }
}
