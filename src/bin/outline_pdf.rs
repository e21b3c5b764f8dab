//! CLI tool for extracting the outline of a single PDF

use pdf_outline::extract_outline;
use std::env;
use std::fs;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [output_file]", args[0]);
        eprintln!();
        eprintln!("Extracts a {{title, outline}} structure from the PDF's text");
        eprintln!("layout and prints it as JSON (or writes it to output_file).");
        process::exit(1);
    }

    let pdf_path = &args[1];
    let output_file = args.get(2);

    match extract_outline(pdf_path) {
        Ok(result) => {
            let json = match serde_json::to_string_pretty(&result) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            };

            match output_file {
                Some(output) => {
                    if let Err(e) = fs::write(output, json) {
                        eprintln!("Error: failed to write {}: {}", output, e);
                        process::exit(1);
                    }
                    println!("Outline written to: {}", output);
                }
                None => println!("{}", json),
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
