//! PDF extraction using `pdf-extract`, with `pdftotext` as a fallback.

use std::fs;
use std::panic;
use std::path::Path;
use std::process::Command;

use super::{ExtractedText, ExtractionError};

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::Parse(format!("{}: {}", error_prefix, stderr.trim())))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

pub(super) fn extract(path: &Path, pdftotext_fallback: bool) -> Result<ExtractedText, ExtractionError> {
    match extract_pages(path) {
        Ok(pages) => Ok(ExtractedText::new(join_pages(pages).trim())),
        Err(ExtractionError::Io(e)) => Err(ExtractionError::Io(e)),
        Err(e) if pdftotext_fallback => {
            tracing::debug!("pdf-extract failed for {}: {}, trying pdftotext", path.display(), e);
            let text = run_pdftotext(path)?;
            Ok(ExtractedText::new(text.trim()))
        }
        Err(e) => Err(e),
    }
}

/// Extract the text of every page.
///
/// The parser panics on some malformed files; a panic is reported as a parse
/// error for this file only.
fn extract_pages(path: &Path) -> Result<Vec<String>, ExtractionError> {
    let bytes = fs::read(path)?;
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes)) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::Parse(format!("unreadable PDF: {}", e))),
        Err(_) => Err(ExtractionError::Parse("PDF parser panicked".to_string())),
    }
}

/// Concatenate page texts. Pages without text contribute nothing.
fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect()
}

/// Run pdftotext on a PDF file.
fn run_pdftotext(path: &Path) -> Result<String, ExtractionError> {
    let output = Command::new("pdftotext")
        .args(["-layout", "-enc", "UTF-8"])
        .arg(path)
        .arg("-") // Output to stdout
        .output();

    handle_cmd_output(output, "pdftotext (install poppler-utils)", "pdftotext failed")
}
