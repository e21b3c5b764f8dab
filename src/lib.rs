//! Heuristic PDF outline extraction using lopdf
//!
//! This crate infers a document outline (title + hierarchical headings) from
//! text layout and font metrics alone, without reading PDF bookmark/TOC
//! metadata:
//! - Per-page line extraction with position and font data
//! - Noise filtering and fragment merging
//! - Font-size ranking into heading levels (largest size = H1)
//! - Title synthesis from page-1 top-level headings

pub mod batch;
pub mod collector;
pub mod layout;
pub mod merge;
pub mod outline;

pub use batch::{process_directory, BatchSummary};
pub use collector::{collect_elements, TextElement};
pub use layout::{read_document_lines, read_document_lines_mem, Line, PageLines, Span};
pub use merge::{dedup_elements, merge_adjacent};
pub use outline::{synthesize_outline, DocumentOutline, OutlineEntry};

use std::path::Path;

/// Extract the outline of a PDF file.
///
/// This runs the full pipeline: layout extraction, line collection,
/// merge/dedup, and outline synthesis. A document with no usable text
/// degrades to an empty title and an empty outline rather than an error.
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline, OutlineError> {
    let pages = layout::read_document_lines(path)?;
    Ok(outline_from_pages(&pages))
}

/// Extract the outline of a PDF held in a memory buffer.
pub fn extract_outline_mem(buffer: &[u8]) -> Result<DocumentOutline, OutlineError> {
    let pages = layout::read_document_lines_mem(buffer)?;
    Ok(outline_from_pages(&pages))
}

/// Run the pure pipeline over already-extracted page lines.
///
/// Useful for tests and for callers that bring their own layout provider.
pub fn outline_from_pages(pages: &[PageLines]) -> DocumentOutline {
    let elements = collector::collect_elements(pages);
    let merged = merge::merge_adjacent(elements);
    let unique = merge::dedup_elements(merged);
    outline::synthesize_outline(&unique)
}

#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("PDF is encrypted")]
    Encrypted,
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<lopdf::Error> for OutlineError {
    fn from(e: lopdf::Error) -> Self {
        OutlineError::Parse(e.to_string())
    }
}
