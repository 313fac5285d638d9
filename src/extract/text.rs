//! Plain-text extraction.

use std::fs;
use std::path::Path;

use super::{strip_bom, ExtractedText, ExtractionError};

pub(super) fn extract(path: &Path) -> Result<ExtractedText, ExtractionError> {
    let bytes = fs::read(path)?;
    let text = decode_ignoring_invalid(strip_bom(&bytes));
    Ok(ExtractedText::new(text.trim()))
}

/// Decode UTF-8, silently dropping invalid sequences instead of replacing them.
fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
