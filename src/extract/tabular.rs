//! CSV extraction with an encoding fallback chain.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use super::{strip_bom, ExtractedText, ExtractionError};

/// Resolve encoding labels to encodings, dropping unknown and duplicate labels.
///
/// Falls back to UTF-8 alone when nothing usable remains.
pub(super) fn resolve_encodings(labels: &[String]) -> Vec<&'static Encoding> {
    let mut encodings: Vec<&'static Encoding> = Vec::new();
    for label in labels {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) => {
                if !encodings.contains(&encoding) {
                    encodings.push(encoding);
                }
            }
            None => tracing::warn!("Ignoring unknown CSV encoding label '{}'", label),
        }
    }
    if encodings.is_empty() {
        encodings.push(UTF_8);
    }
    encodings
}

/// Extract all data cells of a CSV file, joined by single spaces.
pub(super) fn extract(
    path: &Path,
    encodings: &[&'static Encoding],
) -> Result<ExtractedText, ExtractionError> {
    let bytes = fs::read(path)?;
    let decoded = decode(&bytes, encodings)?;
    Ok(ExtractedText::new(cells_to_text(&decoded)))
}

/// Decode with the first encoding that accepts the input without replacement.
fn decode(bytes: &[u8], encodings: &[&'static Encoding]) -> Result<String, ExtractionError> {
    for (attempt, encoding) in encodings.iter().enumerate() {
        let input = if *encoding == UTF_8 {
            strip_bom(bytes)
        } else {
            bytes
        };
        match encoding.decode_without_bom_handling_and_without_replacement(input) {
            Some(text) => {
                if attempt > 0 {
                    tracing::debug!("Decoded CSV with fallback encoding {}", encoding.name());
                }
                return Ok(text.into_owned());
            }
            None => tracing::debug!("CSV is not valid {}, trying next encoding", encoding.name()),
        }
    }

    let tried: Vec<&str> = encodings.iter().map(|e| e.name()).collect();
    Err(ExtractionError::Decode(tried.join(", ")))
}

/// Flatten CSV records into space-joined cell values.
///
/// The first record is the header row and is not part of the output.
/// Records whose field count differs from the header are skipped.
fn cells_to_text(data: &str) -> String {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(data.as_bytes());

    let mut cells: Vec<String> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => cells.extend(record.iter().map(str::to_string)),
            Err(e) => tracing::debug!("Skipping malformed CSV record {}: {}", index + 1, e),
        }
    }
    cells.join(" ")
}
