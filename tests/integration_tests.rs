//! Integration tests for the pdf-outline pipeline

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdf_outline::{
    extract_outline_mem, outline_from_pages, process_directory, Line, PageLines, Span,
};

// Helpers to build provider data for pure-pipeline tests

fn make_line(y: f32, text: &str, size: f32) -> Line {
    Line {
        y,
        spans: vec![Span {
            text: text.to_string(),
            font: "Helvetica".to_string(),
            size,
        }],
    }
}

fn make_page(number: u32, lines: Vec<Line>) -> PageLines {
    PageLines { number, lines }
}

// Helper to build a synthetic single-page PDF in memory.
// `lines` are (text, font_size, device_y) tuples; device Y is bottom-up.
fn make_pdf(lines: &[(&str, f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    for (text, size, y) in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec!["F1".into(), Object::Real(*size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(72.0), Object::Real(*y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(*text)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save pdf");
    buffer
}

// ============================================================================
// Pure pipeline scenarios
// ============================================================================

#[test]
fn test_single_heading_scenario() {
    let pages = vec![make_page(1, vec![make_line(100.0, "Annual Report", 24.0)])];
    let result = outline_from_pages(&pages);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "title": "Annual Report",
            "outline": [{"level": "H1", "text": "Annual Report", "page": 1}]
        })
    );
}

#[test]
fn test_empty_document_scenario() {
    let result = outline_from_pages(&[]);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json, serde_json::json!({"title": "", "outline": []}));
}

#[test]
fn test_all_garbage_document_degrades_to_empty() {
    let pages = vec![make_page(
        1,
        vec![
            make_line(10.0, "r pr", 12.0),
            make_line(20.0, "ok", 12.0),
            make_line(30.0, "!!!---###", 12.0),
        ],
    )];
    let result = outline_from_pages(&pages);
    assert_eq!(result.title, "");
    assert!(result.outline.is_empty());
}

#[test]
fn test_pipeline_is_idempotent() {
    let pages = vec![
        make_page(
            1,
            vec![
                make_line(50.0, "User Guide", 24.0),
                make_line(120.0, "1. Installation", 16.0),
                make_line(300.0, "2. Configuration", 16.0),
            ],
        ),
        make_page(2, vec![make_line(50.0, "3. Troubleshooting", 16.0)]),
    ];
    let first = serde_json::to_string_pretty(&outline_from_pages(&pages)).unwrap();
    let second = serde_json::to_string_pretty(&outline_from_pages(&pages)).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Pipeline invariants
// ============================================================================

#[test]
fn test_outline_emitted_in_page_y_order() {
    // Lines arrive shuffled within and across pages
    let pages = vec![
        make_page(
            2,
            vec![
                make_line(400.0, "Later on page two", 12.0),
                make_line(100.0, "Early on page two", 12.0),
            ],
        ),
        make_page(
            1,
            vec![
                make_line(500.0, "Bottom of page one", 12.0),
                make_line(50.0, "Top of page one", 12.0),
            ],
        ),
    ];
    let result = outline_from_pages(&pages);
    let texts: Vec<&str> = result.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Top of page one",
            "Bottom of page one",
            "Early on page two",
            "Later on page two",
        ]
    );
}

#[test]
fn test_no_duplicate_text_per_page_in_outline() {
    let pages = vec![make_page(
        1,
        vec![
            make_line(50.0, "Quarterly Summary", 14.0),
            make_line(400.0, "QUARTERLY SUMMARY", 14.0),
            make_line(600.0, "quarterly summary", 14.0),
        ],
    )];
    let result = outline_from_pages(&pages);
    assert_eq!(result.outline.len(), 1);
    assert_eq!(result.outline[0].text, "Quarterly Summary");
}

#[test]
fn test_level_count_equals_distinct_sizes() {
    let pages = vec![make_page(
        1,
        vec![
            make_line(50.0, "Biggest heading", 30.0),
            make_line(150.0, "Middle heading", 20.0),
            make_line(250.0, "Small heading", 10.0),
            make_line(350.0, "Another middle", 20.0),
        ],
    )];
    let result = outline_from_pages(&pages);

    let mut levels: Vec<&str> = result.outline.iter().map(|e| e.level.as_str()).collect();
    levels.sort();
    levels.dedup();
    assert_eq!(levels.len(), 3);

    // Largest size is always H1, descending sizes ascend in level number
    assert_eq!(result.outline[0].level, "H1");
    assert_eq!(result.outline[1].level, "H2");
    assert_eq!(result.outline[2].level, "H3");
    assert_eq!(result.outline[3].level, "H2");
}

#[test]
fn test_merge_threshold_boundaries() {
    // Delta 0.5 merges, delta 1.0 stays separate
    let pages = vec![make_page(
        1,
        vec![
            make_line(10.0, "Request for", 14.0),
            make_line(10.5, "Proposal Details", 14.0),
            make_line(11.5, "Separate heading", 14.0),
        ],
    )];
    let result = outline_from_pages(&pages);
    let texts: Vec<&str> = result.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Request for Proposal Details", "Separate heading"]
    );
}

#[test]
fn test_garbage_lines_never_reach_outline() {
    let pages = vec![make_page(
        1,
        vec![
            make_line(10.0, "r pr", 18.0),
            make_line(50.0, "Real Heading Here", 18.0),
            make_line(90.0, "ok", 18.0),
            make_line(130.0, "!!!---###", 18.0),
        ],
    )];
    let result = outline_from_pages(&pages);
    assert_eq!(result.outline.len(), 1);
    assert_eq!(result.outline[0].text, "Real Heading Here");
}

// ============================================================================
// End-to-end extraction from synthetic PDFs
// ============================================================================

#[test]
fn test_extract_single_heading_pdf() {
    let pdf = make_pdf(&[("Annual Report", 24.0, 700.0)]);
    let result = extract_outline_mem(&pdf).unwrap();
    assert_eq!(result.title, "Annual Report");
    assert_eq!(result.outline.len(), 1);
    assert_eq!(result.outline[0].level, "H1");
    assert_eq!(result.outline[0].page, 1);
}

#[test]
fn test_extract_ranks_heading_sizes() {
    let pdf = make_pdf(&[
        ("Document Title", 24.0, 760.0),
        ("First Section", 16.0, 700.0),
        ("Second Section", 16.0, 500.0),
    ]);
    let result = extract_outline_mem(&pdf).unwrap();
    // Page-1 H1 and H2 headings all feed the title, in reading order
    assert_eq!(result.title, "Document Title First Section Second Section");
    let levels: Vec<&str> = result.outline.iter().map(|e| e.level.as_str()).collect();
    assert_eq!(levels, vec!["H1", "H2", "H2"]);
    // Reading order: higher on the page comes first
    assert_eq!(result.outline[1].text, "First Section");
}

#[test]
fn test_extract_is_byte_identical_across_runs() {
    let pdf = make_pdf(&[
        ("Stable Output", 20.0, 760.0),
        ("Some Section", 14.0, 600.0),
    ]);
    let first = serde_json::to_string_pretty(&extract_outline_mem(&pdf).unwrap()).unwrap();
    let second = serde_json::to_string_pretty(&extract_outline_mem(&pdf).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_garbage_bytes_are_a_parse_error() {
    let err = extract_outline_mem(b"this is not a pdf at all").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("PDF parsing error"), "unexpected error: {msg}");
}

// ============================================================================
// Batch driver
// ============================================================================

#[test]
fn test_batch_isolates_failing_documents() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    std::fs::write(
        input.path().join("a.pdf"),
        make_pdf(&[("First Document", 20.0, 700.0)]),
    )
    .unwrap();
    std::fs::write(input.path().join("b.pdf"), b"corrupt nonsense").unwrap();
    std::fs::write(
        input.path().join("c.pdf"),
        make_pdf(&[("Third Document", 20.0, 700.0)]),
    )
    .unwrap();

    let summary = process_directory(input.path(), output.path()).unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);

    assert!(output.path().join("a.json").exists());
    assert!(!output.path().join("b.json").exists());
    assert!(output.path().join("c.json").exists());
}

#[test]
fn test_batch_creates_output_dir_and_ignores_other_files() {
    let input = tempfile::tempdir().unwrap();
    let output_root = tempfile::tempdir().unwrap();
    let output = output_root.path().join("nested").join("out");

    std::fs::write(
        input.path().join("doc.pdf"),
        make_pdf(&[("Only Document", 20.0, 700.0)]),
    )
    .unwrap();
    std::fs::write(input.path().join("notes.txt"), b"not a pdf").unwrap();

    let summary = process_directory(input.path(), &output).unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 0);
    assert!(output.join("doc.json").exists());
    assert!(!output.join("notes.json").exists());
}

#[test]
fn test_batch_output_is_pretty_printed_utf8() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    std::fs::write(
        input.path().join("resume.pdf"),
        make_pdf(&[("Résumé Overview", 22.0, 700.0)]),
    )
    .unwrap();

    process_directory(input.path(), output.path()).unwrap();

    let json = std::fs::read_to_string(output.path().join("resume.json")).unwrap();
    // 2-space indentation, non-ASCII preserved literally
    assert!(json.contains("\n  \"title\""));
    assert!(json.contains("Résumé Overview"));
    assert!(!json.contains("\\u"));
}
