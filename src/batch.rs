//! Batch driver: outline every PDF in a directory
//!
//! Failures are isolated per document: a file the provider cannot read is
//! logged and skipped, and no output is written for it. Remaining files are
//! still attempted.

use crate::{extract_outline, OutlineError};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Counts for one directory run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents outlined and written successfully
    pub processed: usize,
    /// Documents skipped after a pipeline failure
    pub failed: usize,
}

/// Process every `.pdf` file in `input_dir`, writing a same-named `.json`
/// outline into `output_dir` (created if absent).
///
/// Files are visited in file-name order. The returned error covers only the
/// directory-level setup; per-document failures are logged, counted in the
/// summary, and never abort the loop.
pub fn process_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
) -> Result<BatchSummary, OutlineError> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut pdf_paths: Vec<PathBuf> = fs::read_dir(input_dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    pdf_paths.sort();

    let mut summary = BatchSummary::default();

    for path in pdf_paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        info!("Processing {}", name);

        match process_file(&path, output_dir) {
            Ok(()) => summary.processed += 1,
            Err(e) => {
                error!("Failed to process {}: {}", name, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Outline one document and write its JSON result.
///
/// The output file is only written when the whole pipeline succeeds, so a
/// failed document never leaves partial output behind.
fn process_file(path: &Path, output_dir: &Path) -> Result<(), OutlineError> {
    let result = extract_outline(path)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output_path = output_dir.join(format!("{}.json", stem));

    // to_string_pretty: 2-space indentation, non-ASCII kept literal
    let json = serde_json::to_string_pretty(&result)?;
    fs::write(output_path, json)?;

    Ok(())
}
