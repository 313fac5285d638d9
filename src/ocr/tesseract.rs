//! Tesseract OCR engine.
//!
//! Runs the `tesseract` command-line tool and reads the recognized text from
//! its stdout.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use super::{check_binary, OcrEngine, OcrError};

/// Tesseract OCR engine.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language: String,
}

impl TesseractEngine {
    /// Create an engine for the given Tesseract language (e.g. "eng").
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr.trim())))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract")
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            format!("Tesseract is available (language: {})", self.language)
        } else {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        }
    }

    fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        let start = Instant::now();
        let text = self.run_tesseract(image_path)?;
        tracing::debug!(
            "tesseract read {} chars from {} in {} ms",
            text.len(),
            image_path.display(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}
