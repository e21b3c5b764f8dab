//! CLI tool for batch outline extraction over a directory of PDFs

use pdf_outline::process_directory;
use std::env;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let input_dir = args.get(1).map(String::as_str).unwrap_or("input");
    let output_dir = args.get(2).map(String::as_str).unwrap_or("output");

    match process_directory(input_dir, output_dir) {
        Ok(summary) => {
            println!(
                "Done: {} processed, {} failed",
                summary.processed, summary.failed
            );
        }
        Err(e) => {
            // Only directory-level setup can fail; per-file errors are
            // logged inside the loop and do not reach here.
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
