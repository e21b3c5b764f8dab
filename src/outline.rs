//! Outline synthesis
//!
//! Final pipeline stage: ranks the font sizes observed across the surviving
//! elements into heading levels (largest = H1) and assembles the document
//! title from the top-level headings of page 1.

use crate::collector::TextElement;
use serde::{Deserialize, Serialize};

/// One heading in the extracted outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level label: "H1", "H2", ...
    pub level: String,
    pub text: String,
    /// 1-indexed page number
    pub page: u32,
}

/// The extracted structure of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

/// Build the outline from deduplicated elements.
///
/// Every distinct font size gets a level, so every element lands in the
/// outline. Zero elements degrade to an empty title and an empty outline.
pub fn synthesize_outline(elements: &[TextElement]) -> DocumentOutline {
    let sizes = ranked_sizes(elements);

    let level_of = |font_size: f32| -> Option<String> {
        sizes
            .iter()
            .position(|&s| s == font_size)
            .map(|rank| format!("H{}", rank + 1))
    };

    // Title: every H1/H2 element on page 1, in element order
    let title_parts: Vec<&str> = elements
        .iter()
        .filter(|el| {
            el.page == 1
                && matches!(level_of(el.font_size).as_deref(), Some("H1") | Some("H2"))
        })
        .map(|el| el.text.trim())
        .collect();

    let mut title = title_parts.join(" ").trim().to_string();
    if title.is_empty() {
        if let Some(first) = elements.first() {
            title = first.text.clone();
        }
    }

    // Title-sourced elements are not excluded here; they appear in both the
    // title and the outline.
    let outline = elements
        .iter()
        .filter_map(|el| {
            level_of(el.font_size).map(|level| OutlineEntry {
                level,
                text: el.text.trim().to_string(),
                page: el.page,
            })
        })
        .collect();

    DocumentOutline { title, outline }
}

/// Distinct font sizes, largest first. Index order is the heading rank.
fn ranked_sizes(elements: &[TextElement]) -> Vec<f32> {
    let mut sizes: Vec<f32> = elements.iter().map(|el| el.font_size).collect();
    sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    sizes.dedup();
    sizes
}
