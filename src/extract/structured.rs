//! JSON extraction.
//!
//! The whole document is re-serialized, not just its leaf values, so keys and
//! brackets take part in similarity scoring. Object keys come out sorted,
//! which keeps the text stable for equal documents.

use std::fs;
use std::path::Path;

use super::{strip_bom, ExtractedText, ExtractionError};

pub(super) fn extract(path: &Path) -> Result<ExtractedText, ExtractionError> {
    let bytes = fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(strip_bom(&bytes))
        .map_err(|e| ExtractionError::Parse(format!("invalid JSON: {}", e)))?;
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| ExtractionError::Parse(format!("JSON serialization failed: {}", e)))?;
    Ok(ExtractedText::new(text))
}
