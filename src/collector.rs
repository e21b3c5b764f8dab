//! Line collection and noise filtering
//!
//! First pipeline stage: turns the layout provider's raw per-page lines into
//! an ordered sequence of candidate text elements, dropping fragments that
//! cannot be headings (too short, known extraction garbage, no alphanumerics).

use crate::layout::PageLines;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Fragments produced by corrupted upstream text extraction. Matched by exact
/// equality after trim + lowercase.
static GARBAGE_FRAGMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "oposal",
        "r pr",
        "quest f",
        "r proposal",
        "quest foooor pr",
        "rfp: r",
        "reeeequest f",
    ])
});

/// Minimum length (in characters) of a cleaned line worth keeping.
const MIN_CLEANED_LEN: usize = 5;

/// One logical line of text surviving collection.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    /// Merged textual content of the line(s)
    pub text: String,
    /// Maximum span font size observed on the source line(s)
    pub font_size: f32,
    /// Font name of the first span (representative only)
    pub font: String,
    /// 1-indexed page number
    pub page: u32,
    /// Vertical offset of the line, rounded to 1 decimal place
    pub y: f32,
}

/// Collect candidate elements from all pages, filtered and sorted by
/// `(page, y)`. The sort is stable, so ties keep extraction order.
pub fn collect_elements(pages: &[PageLines]) -> Vec<TextElement> {
    let mut elements = Vec::new();

    for page in pages {
        for line in &page.lines {
            if line.spans.is_empty() {
                continue;
            }

            let merged_text = line
                .spans
                .iter()
                .map(|s| s.text.trim())
                .collect::<Vec<_>>()
                .join(" ");

            let font_size = line.spans.iter().map(|s| s.size).fold(0.0f32, f32::max);
            let font = line.spans[0].font.clone();

            let cleaned = merged_text.trim().to_lowercase();
            if cleaned.chars().count() < MIN_CLEANED_LEN
                || GARBAGE_FRAGMENTS.contains(cleaned.as_str())
                || !cleaned.chars().any(|c| c.is_alphanumeric())
            {
                continue;
            }

            elements.push(TextElement {
                text: merged_text,
                font_size,
                font,
                page: page.number,
                y: round1(line.y),
            });
        }
    }

    // Stable sort: ties in (page, y) keep relative extraction order
    elements.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });

    elements
}

/// Round to 1 decimal place. The rounding is intentional: together with the
/// merge threshold it defines the adjacency tolerance band.
fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}
