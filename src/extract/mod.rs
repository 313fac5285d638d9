//! Text extraction from locally stored documents.
//!
//! Every supported file is reduced to a single plain-text string:
//! - CSV via the `csv` crate, decoded through an encoding fallback chain
//! - JSON re-serialized in a stable, indented form
//! - PDF via `pdf-extract`, with `pdftotext` (Poppler) as an optional fallback
//! - DOCX by reading `word/document.xml` out of the zip container
//! - Images through an [`OcrEngine`], Tesseract by default
//! - Plain text, dropping undecodable byte sequences
//!
//! Extractors report failures as [`ExtractionError`]. Callers that only want
//! a best-effort signal go through [`extract_or_empty`], which is the single
//! place where a failure is logged and turned into empty text.

mod pdf;
mod raster;
mod structured;
mod tabular;
mod text;
mod word;

use std::fmt;
use std::path::Path;

use encoding_rs::Encoding;
use serde::Serialize;
use thiserror::Error;

use crate::config::ExtractionConfig;
use crate::ocr::{OcrEngine, OcrError, TesseractEngine};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Drop a leading UTF-8 byte order mark, if any.
pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Could not decode file with any configured encoding (tried {0})")]
    Decode(String),

    #[error("Parse failed: {0}")]
    Parse(String),

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Kind of document, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Delimited records (`.csv`).
    Tabular,
    /// Hierarchical key/value document (`.json`).
    StructuredData,
    /// Portable document (`.pdf`).
    Pdf,
    /// Word-processing document (`.docx`).
    WordProcessing,
    /// Raster image (`.png`, `.jpg`, `.jpeg`).
    Image,
    /// Plain text (`.txt`).
    PlainText,
    /// Anything else. Never handed to an extractor.
    Unsupported,
}

impl DocumentKind {
    /// Map a file extension (without the dot) to a document kind.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Self::Tabular,
            "json" => Self::StructuredData,
            "pdf" => Self::Pdf,
            "docx" => Self::WordProcessing,
            "png" | "jpg" | "jpeg" => Self::Image,
            "txt" => Self::PlainText,
            _ => Self::Unsupported,
        }
    }

    /// Determine the document kind of a path from its extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unsupported)
    }

    pub fn is_supported(&self) -> bool {
        *self != Self::Unsupported
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tabular => "tabular",
            Self::StructuredData => "structured",
            Self::Pdf => "pdf",
            Self::WordProcessing => "word",
            Self::Image => "image",
            Self::PlainText => "text",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All text recovered from one file.
///
/// Empty when the file held no text or could not be read; the two cases are
/// deliberately not distinguished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ExtractedText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ExtractedText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something that turns a file of a known kind into text.
pub trait Extractor {
    fn extract(&self, path: &Path, kind: DocumentKind) -> Result<ExtractedText, ExtractionError>;
}

/// Extract text, degrading any failure to empty text after logging it.
pub fn extract_or_empty<E: Extractor + ?Sized>(
    extractor: &E,
    path: &Path,
    kind: DocumentKind,
) -> ExtractedText {
    match extractor.extract(path, kind) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Error reading {} {}: {}", kind, path.display(), e);
            ExtractedText::empty()
        }
    }
}

/// Extractor dispatching on [`DocumentKind`] to the per-format readers.
pub struct TextExtractor {
    /// CSV encodings, tried in order.
    encodings: Vec<&'static Encoding>,
    /// Use `pdftotext` when `pdf-extract` cannot read a PDF.
    pdftotext_fallback: bool,
    ocr: Box<dyn OcrEngine>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl TextExtractor {
    /// Create a text extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text extractor from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            encodings: tabular::resolve_encodings(&config.csv_encodings),
            pdftotext_fallback: config.pdftotext_fallback,
            ocr: Box::new(TesseractEngine::new(&config.tesseract_language)),
        }
    }

    /// Replace the OCR engine used for images.
    pub fn with_ocr(mut self, engine: impl OcrEngine + 'static) -> Self {
        self.ocr = Box::new(engine);
        self
    }

    /// Enable or disable the `pdftotext` fallback.
    pub fn with_pdftotext_fallback(mut self, enabled: bool) -> Self {
        self.pdftotext_fallback = enabled;
        self
    }

    /// Names of the CSV encodings in the order they are tried.
    pub fn encoding_names(&self) -> Vec<&'static str> {
        self.encodings.iter().map(|e| e.name()).collect()
    }
}

impl Extractor for TextExtractor {
    fn extract(&self, path: &Path, kind: DocumentKind) -> Result<ExtractedText, ExtractionError> {
        match kind {
            DocumentKind::Tabular => tabular::extract(path, &self.encodings),
            DocumentKind::StructuredData => structured::extract(path),
            DocumentKind::Pdf => pdf::extract(path, self.pdftotext_fallback),
            DocumentKind::WordProcessing => word::extract(path),
            DocumentKind::Image => raster::extract(path, self.ocr.as_ref()),
            DocumentKind::PlainText => text::extract(path),
            DocumentKind::Unsupported => {
                Err(ExtractionError::Unsupported(path.display().to_string()))
            }
        }
    }
}
