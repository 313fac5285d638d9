//! OCR engines used for raster images.
//!
//! Tesseract (through its command-line binary) is the only built-in engine.
//! The [`OcrEngine`] trait lets callers plug in another one.

mod tesseract;

use std::path::Path;

use thiserror::Error;

pub use tesseract::TesseractEngine;

/// Errors that can occur during OCR.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An engine that reads text out of an image file.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether the engine can run on this machine.
    fn is_available(&self) -> bool;

    /// Human-readable hint on how to make the engine available.
    fn availability_hint(&self) -> String;

    /// Recognize the text in an image.
    fn recognize(&self, image_path: &Path) -> Result<String, OcrError>;
}

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}
