//! sitecheck - compare live web content against a locally collected corpus.
//!
//! Documents gathered by an earlier collection run (CSV, JSON, PDF, DOCX,
//! images and plain text) are normalized to plain text and scored against
//! the text of a freshly fetched page. The result is a verdict: the page is
//! identical to a corpus document, overlaps suspiciously with one or more of
//! them, or is unrelated.

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod extract;
pub mod fetch;
pub mod ocr;
pub mod privacy;
pub mod similarity;

pub use classifier::{
    ClassificationReport, Classifier, ClassifyError, ComparisonVerdict, MatchLevel,
    MatchThresholds, SuspiciousMatch,
};
pub use config::{Config, ConfigError};
pub use corpus::{CorpusEntry, CorpusWalker, Inventory, InventoryItem};
pub use extract::{
    extract_or_empty, DocumentKind, ExtractedText, ExtractionError, Extractor, TextExtractor,
};
pub use fetch::{ContentSource, FetchError, HttpFetcher};
pub use privacy::{Route, RoutingPolicy};
pub use similarity::SimilarityScorer;
