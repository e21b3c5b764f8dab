//! Fragment merging and deduplication
//!
//! Second pipeline stage. Extraction often splits one logical line into
//! several fragments a fraction of a point apart; a single left-to-right scan
//! glues those back together, then repeated content (headers, footers,
//! watermark text) is dropped per page.

use crate::collector::TextElement;
use std::collections::HashSet;

/// Maximum vertical distance between consecutive elements for them to count
/// as fragments of one logical line. Kept strict to avoid gluing distinct
/// lines together.
const MERGE_THRESHOLD: f32 = 0.8;

/// Collapse consecutive elements that are fragments of one logical line.
///
/// Elements must arrive in `(page, y)` order. Two consecutive elements merge
/// iff they share a page, sit within [`MERGE_THRESHOLD`] of each other, and
/// have exactly equal font sizes. The merged element keeps the first
/// fragment's font and position.
pub fn merge_adjacent(elements: Vec<TextElement>) -> Vec<TextElement> {
    let mut merged: Vec<TextElement> = Vec::with_capacity(elements.len());
    let mut prev: Option<TextElement> = None;

    for el in elements {
        match prev {
            Some(ref mut p)
                if p.page == el.page
                    && (el.y - p.y).abs() < MERGE_THRESHOLD
                    && el.font_size == p.font_size =>
            {
                p.text.push(' ');
                p.text.push_str(&el.text);
            }
            Some(p) => {
                merged.push(p);
                prev = Some(el);
            }
            None => prev = Some(el),
        }
    }

    if let Some(p) = prev {
        merged.push(p);
    }

    merged
}

/// Drop repeated content, keyed by `(trimmed lowercased text, page)`.
/// The first occurrence wins; order is preserved.
pub fn dedup_elements(elements: Vec<TextElement>) -> Vec<TextElement> {
    let mut seen: HashSet<(String, u32)> = HashSet::new();
    let mut unique = Vec::with_capacity(elements.len());

    for el in elements {
        let key = (el.text.trim().to_lowercase(), el.page);
        if seen.insert(key) {
            unique.push(el);
        }
    }

    unique
}
