//! Image extraction via OCR.

use std::path::Path;

use crate::ocr::OcrEngine;

use super::{ExtractedText, ExtractionError};

pub(super) fn extract(path: &Path, ocr: &dyn OcrEngine) -> Result<ExtractedText, ExtractionError> {
    // Decode first so corrupt files fail here rather than inside the OCR engine.
    image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| ExtractionError::Parse(format!("unreadable image: {}", e)))?;

    let text = ocr.recognize(path)?;
    Ok(ExtractedText::new(text.trim()))
}
