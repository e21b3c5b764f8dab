//! Text layout extraction from PDF using lopdf
//!
//! This module is the layout provider for the outline pipeline: for each page
//! it produces an ordered sequence of lines, each carrying a top-referenced Y
//! coordinate and the spans (text, font, size) composing it. The rest of the
//! crate never touches the PDF container.

use crate::OutlineError;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

/// A run of text shown by a single text operator.
#[derive(Debug, Clone)]
pub struct Span {
    /// Decoded text content
    pub text: String,
    /// Font resource name active when the text was shown
    pub font: String,
    /// Effective font size (matrix-scaled)
    pub size: f32,
}

/// A line of text: consecutive spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct Line {
    /// Top-referenced vertical offset (0 at the top of the page)
    pub y: f32,
    pub spans: Vec<Span>,
}

/// All lines of one page, in extraction order.
#[derive(Debug, Clone)]
pub struct PageLines {
    /// 1-indexed page number
    pub number: u32,
    pub lines: Vec<Line>,
}

/// Read per-page line data from a PDF file.
pub fn read_document_lines<P: AsRef<Path>>(path: P) -> Result<Vec<PageLines>, OutlineError> {
    let doc = Document::load(path)?;
    lines_from_doc(&doc)
}

/// Read per-page line data from a PDF memory buffer.
pub fn read_document_lines_mem(buffer: &[u8]) -> Result<Vec<PageLines>, OutlineError> {
    let doc = Document::load_mem(buffer)?;
    lines_from_doc(&doc)
}

fn lines_from_doc(doc: &Document) -> Result<Vec<PageLines>, OutlineError> {
    if doc.is_encrypted() {
        return Err(OutlineError::Encrypted);
    }

    let pages = doc.get_pages();
    let mut result = Vec::with_capacity(pages.len());

    for (&page_num, &page_id) in pages.iter() {
        let height = page_height(doc, page_id);
        let spans = extract_page_spans(doc, page_id, height)?;
        result.push(PageLines {
            number: page_num,
            lines: group_spans_into_lines(spans),
        });
    }

    Ok(result)
}

/// A span with its baseline position, before line grouping.
struct PositionedSpan {
    text: String,
    font: String,
    size: f32,
    y: f32,
}

/// Multiply two 2D transformation matrices
/// Matrix format: [a, b, c, d, e, f] representing:
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

/// Walk the content stream of a single page and collect positioned spans.
fn extract_page_spans(
    doc: &Document,
    page_id: ObjectId,
    page_height: f32,
) -> Result<Vec<PositionedSpan>, OutlineError> {
    use lopdf::content::Content;

    let mut spans = Vec::new();

    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| OutlineError::Parse(e.to_string()))?;
    let content = Content::decode(&content_data).map_err(|e| OutlineError::Parse(e.to_string()))?;

    // Graphics state tracking
    let mut ctm = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut ctm_stack: Vec<[f32; 6]> = Vec::new();

    // Text state tracking
    let mut current_font = String::new();
    let mut current_font_size: f32 = 12.0;
    let mut text_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut line_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut in_text_block = false;

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => {
                ctm_stack.push(ctm);
            }
            "Q" => {
                if let Some(saved) = ctm_stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                if op.operands.len() >= 6 {
                    let new_matrix = [
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    ];
                    ctm = multiply_matrices(&new_matrix, &ctm);
                }
            }
            "BT" => {
                in_text_block = true;
                text_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                line_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Ok(name) = op.operands[0].as_name() {
                        current_font = String::from_utf8_lossy(name).to_string();
                    }
                    if let Ok(size) = op.operands[1].as_f32() {
                        current_font_size = size;
                    } else if let Ok(size) = op.operands[1].as_i64() {
                        current_font_size = size as f32;
                    }
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    line_matrix[4] += tx;
                    line_matrix[5] += ty;
                    text_matrix = line_matrix;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    for (i, operand) in op.operands.iter().take(6).enumerate() {
                        text_matrix[i] =
                            get_number(operand).unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
                    }
                    line_matrix = text_matrix;
                }
            }
            "T*" => {
                // Approximate line height
                line_matrix[5] -= current_font_size * 1.2;
                text_matrix = line_matrix;
            }
            "Tj" => {
                if in_text_block && !op.operands.is_empty() {
                    if let Some(text) = text_from_operand(&op.operands[0]) {
                        push_span(
                            &mut spans,
                            text,
                            &current_font,
                            current_font_size,
                            &text_matrix,
                            &ctm,
                            page_height,
                        );
                    }
                }
            }
            "TJ" => {
                if in_text_block && !op.operands.is_empty() {
                    if let Ok(array) = op.operands[0].as_array() {
                        let mut combined = String::new();
                        for item in array {
                            if let Some(text) = text_from_operand(item) {
                                combined.push_str(&text);
                            }
                        }
                        push_span(
                            &mut spans,
                            combined,
                            &current_font,
                            current_font_size,
                            &text_matrix,
                            &ctm,
                            page_height,
                        );
                    }
                }
            }
            "'" => {
                line_matrix[5] -= current_font_size * 1.2;
                text_matrix = line_matrix;
                if !op.operands.is_empty() {
                    if let Some(text) = text_from_operand(&op.operands[0]) {
                        push_span(
                            &mut spans,
                            text,
                            &current_font,
                            current_font_size,
                            &text_matrix,
                            &ctm,
                            page_height,
                        );
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

fn push_span(
    spans: &mut Vec<PositionedSpan>,
    text: String,
    font: &str,
    font_size: f32,
    text_matrix: &[f32; 6],
    ctm: &[f32; 6],
    page_height: f32,
) {
    if text.trim().is_empty() {
        return;
    }
    let rendered_size = effective_font_size(font_size, text_matrix);
    // Transform position through CTM, then flip to a top-referenced Y so that
    // ascending Y follows reading order.
    let combined = multiply_matrices(text_matrix, ctm);
    let y = page_height - combined[5];
    spans.push(PositionedSpan {
        text,
        font: font.to_string(),
        size: rendered_size,
        y,
    });
}

/// Group consecutive spans sharing a baseline into lines.
///
/// Stream order is preserved; a span joins the current line only when its Y
/// sits within sub-line jitter of the line's Y. Anything further apart starts
/// a new line and is left for the pipeline's merge stage to reconsider.
fn group_spans_into_lines(spans: Vec<PositionedSpan>) -> Vec<Line> {
    let baseline_jitter = 0.5;
    let mut lines: Vec<Line> = Vec::new();

    for span in spans {
        let same_line = lines
            .last()
            .map_or(false, |line| (line.y - span.y).abs() < baseline_jitter);

        if same_line {
            if let Some(line) = lines.last_mut() {
                line.spans.push(Span {
                    text: span.text,
                    font: span.font,
                    size: span.size,
                });
            }
        } else {
            lines.push(Line {
                y: span.y,
                spans: vec![Span {
                    text: span.text,
                    font: span.font,
                    size: span.size,
                }],
            });
        }
    }

    lines
}

/// Helper to get f32 from Object
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Compute effective font size from base size and text matrix
fn effective_font_size(base_size: f32, text_matrix: &[f32; 6]) -> f32 {
    let scale_x = (text_matrix[0].powi(2) + text_matrix[1].powi(2)).sqrt();
    let scale_y = (text_matrix[2].powi(2) + text_matrix[3].powi(2)).sqrt();
    // The two scales are equal for non-rotated text; take the larger otherwise
    let scale = scale_x.max(scale_y);
    base_size * scale
}

/// Decode the string payload of a text-showing operand.
fn text_from_operand(obj: &Object) -> Option<String> {
    if let Object::String(bytes, _) = obj {
        Some(decode_text_bytes(bytes))
    } else {
        None
    }
}

/// Decode raw PDF string bytes: UTF-16BE when BOM-prefixed, then UTF-8,
/// then Latin-1 as the last resort.
fn decode_text_bytes(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Resolve the page height from the MediaBox, walking up the page tree.
/// Falls back to US Letter when no MediaBox is reachable.
fn page_height(doc: &Document, page_id: ObjectId) -> f32 {
    let mut current = page_id;

    // Bounded walk; malformed documents can have Parent cycles
    for _ in 0..16 {
        let dict = match doc.get_dictionary(current) {
            Ok(d) => d,
            Err(_) => break,
        };

        if let Ok(obj) = dict.get(b"MediaBox") {
            if let Ok(arr) = obj.as_array() {
                if arr.len() >= 4 {
                    let lly = get_number(&arr[1]).unwrap_or(0.0);
                    let ury = get_number(&arr[3]).unwrap_or(792.0);
                    return ury - lly;
                }
            }
        }

        match dict.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent) => current = parent,
            Err(_) => break,
        }
    }

    792.0
}
