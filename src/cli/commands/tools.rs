//! External tool status.

use console::style;

use sitecheck::ocr::{check_binary, OcrEngine, TesseractEngine};
use sitecheck::{Config, TextExtractor};

pub fn cmd_tools(config: &Config) -> anyhow::Result<()> {
    println!("\n{}", style("Extraction Tool Status").bold());
    println!("{}", "-".repeat(50));

    let tesseract = TesseractEngine::new(&config.extraction.tesseract_language);
    let tesseract_status = if tesseract.is_available() {
        style("✓ found").green()
    } else {
        style("✗ not found").red()
    };
    println!("  {:<15} {}", "tesseract", tesseract_status);
    println!("                  {}", style(tesseract.availability_hint()).dim());

    let pdftotext_status = if !config.extraction.pdftotext_fallback {
        style("- disabled").dim()
    } else if check_binary("pdftotext") {
        style("✓ found").green()
    } else {
        style("✗ not found").red()
    };
    println!("  {:<15} {}", "pdftotext", pdftotext_status);

    let extractor = TextExtractor::from_config(&config.extraction);
    println!(
        "\n  {:<15} {}",
        "csv encodings",
        extractor.encoding_names().join(", ")
    );

    Ok(())
}
