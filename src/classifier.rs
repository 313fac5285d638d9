//! Comparison of live site text against the collected corpus.
//!
//! A run fetches the live text once, then scores it against every corpus
//! file in walk order. The first exact match ends the run. Suspicious
//! matches are collected and the walk carries on. An empty fetch ends the
//! run before any file is read.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::corpus::CorpusWalker;
use crate::extract::{Extractor, TextExtractor};
use crate::fetch::{ContentSource, HttpFetcher};
use crate::similarity::SimilarityScorer;

/// Errors that stop a classification before any verdict is reached.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Data directory '{}' not found", .0.display())]
    CorpusMissing(PathBuf),
}

/// Where a score falls relative to the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLevel {
    Exact,
    Suspicious,
    Unrelated,
}

/// Score thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchThresholds {
    /// Scores at or above this are exact matches.
    pub exact: f64,
    /// Scores strictly above this (and below `exact`) are suspicious.
    pub suspicious: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            exact: 1.0,
            suspicious: 0.5,
        }
    }
}

impl MatchThresholds {
    pub fn judge(&self, score: f64) -> MatchLevel {
        if score >= self.exact {
            MatchLevel::Exact
        } else if score > self.suspicious {
            MatchLevel::Suspicious
        } else {
            MatchLevel::Unrelated
        }
    }
}

/// Outcome of one classification run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ComparisonVerdict {
    /// A corpus file matched exactly; the walk stopped there.
    Identical { path: PathBuf, score: f64 },
    /// The whole corpus was scanned without an exact match.
    Clean,
    /// The live fetch returned no text, so nothing was compared.
    NoContent,
}

impl ComparisonVerdict {
    /// Human-readable status line.
    pub fn describe(&self) -> String {
        match self {
            Self::Identical { path, .. } => {
                format!("Site content matches collected data ({})", path.display())
            }
            Self::Clean => "No matching content found; the site appears normal".to_string(),
            Self::NoContent => "Unable to fetch website content".to_string(),
        }
    }
}

impl fmt::Display for ComparisonVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A corpus file scoring above the suspicious threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspiciousMatch {
    pub path: PathBuf,
    pub score: f64,
}

impl fmt::Display for SuspiciousMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}% match found with {}",
            self.score * 100.0,
            self.path.display()
        )
    }
}

/// Structured result of a classification run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub url: String,
    #[serde(flatten)]
    pub verdict: ComparisonVerdict,
    /// Every suspicious match seen before the walk ended, in walk order.
    pub suspicious: Vec<SuspiciousMatch>,
    /// Corpus files scored.
    pub files_scanned: usize,
}

impl ClassificationReport {
    fn no_content(url: &str) -> Self {
        Self {
            url: url.to_string(),
            verdict: ComparisonVerdict::NoContent,
            suspicious: Vec::new(),
            files_scanned: 0,
        }
    }

    pub fn is_identical(&self) -> bool {
        matches!(self.verdict, ComparisonVerdict::Identical { .. })
    }

    pub fn matched_path(&self) -> Option<&Path> {
        match &self.verdict {
            ComparisonVerdict::Identical { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Runs classifications against one corpus.
pub struct Classifier {
    source: Box<dyn ContentSource>,
    extractor: Box<dyn Extractor + Send + Sync>,
    corpus_root: PathBuf,
    scorer: SimilarityScorer,
    thresholds: MatchThresholds,
}

impl Classifier {
    /// Create a classifier with default scoring and thresholds.
    pub fn new(
        source: impl ContentSource + 'static,
        extractor: impl Extractor + Send + Sync + 'static,
        corpus_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: Box::new(source),
            extractor: Box::new(extractor),
            corpus_root: corpus_root.into(),
            scorer: SimilarityScorer::default(),
            thresholds: MatchThresholds::default(),
        }
    }

    /// Create a classifier wired to the network and the configured corpus.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            HttpFetcher::from_config(&config.privacy),
            TextExtractor::from_config(&config.extraction),
            config.data_dir.clone(),
        )
        .with_scorer(SimilarityScorer::new(config.matching.max_chars))
        .with_thresholds(config.matching.thresholds())
    }

    pub fn with_scorer(mut self, scorer: SimilarityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_thresholds(mut self, thresholds: MatchThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn corpus_root(&self) -> &Path {
        &self.corpus_root
    }

    /// Fetch `url` and compare its text against the corpus.
    pub async fn classify(&self, url: &str) -> Result<ClassificationReport, ClassifyError> {
        if !self.corpus_root.is_dir() {
            return Err(ClassifyError::CorpusMissing(self.corpus_root.clone()));
        }

        let live_text = self.source.fetch_text(url).await;
        Ok(self.scan(url, &live_text))
    }

    /// Compare already fetched text against the corpus.
    pub fn scan(&self, url: &str, live_text: &str) -> ClassificationReport {
        if live_text.trim().is_empty() {
            tracing::warn!("No content fetched from {}", url);
            return ClassificationReport::no_content(url);
        }

        let walker = CorpusWalker::new(&self.corpus_root, self.extractor.as_ref());
        let mut suspicious = Vec::new();
        let mut files_scanned = 0;

        for entry in walker.walk() {
            files_scanned += 1;
            let score = self.scorer.score(live_text, entry.text.as_str());

            match self.thresholds.judge(score) {
                MatchLevel::Exact => {
                    tracing::info!("{} matches {}", url, entry.path.display());
                    return ClassificationReport {
                        url: url.to_string(),
                        verdict: ComparisonVerdict::Identical {
                            path: entry.path,
                            score,
                        },
                        suspicious,
                        files_scanned,
                    };
                }
                MatchLevel::Suspicious => {
                    let hit = SuspiciousMatch {
                        path: entry.path,
                        score,
                    };
                    tracing::warn!("{}", hit);
                    suspicious.push(hit);
                }
                MatchLevel::Unrelated => {
                    tracing::debug!("{:.4} against {}", score, entry.path.display());
                }
            }
        }

        tracing::info!("{} is clean after {} files", url, files_scanned);
        ClassificationReport {
            url: url.to_string(),
            verdict: ComparisonVerdict::Clean,
            suspicious,
            files_scanned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{DocumentKind, ExtractedText, ExtractionError};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::{Arc, Mutex};

    struct StaticSource(String);

    #[async_trait]
    impl ContentSource for StaticSource {
        async fn fetch_text(&self, _url: &str) -> String {
            self.0.clone()
        }
    }

    /// Reads files verbatim and records which ones it was asked for.
    #[derive(Clone, Default)]
    struct RecordingExtractor {
        seen: Arc<Mutex<Vec<PathBuf>>>,
        fail_all: bool,
    }

    impl RecordingExtractor {
        fn failing() -> Self {
            Self {
                fail_all: true,
                ..Default::default()
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        }
    }

    impl Extractor for RecordingExtractor {
        fn extract(
            &self,
            path: &Path,
            _kind: DocumentKind,
        ) -> Result<ExtractedText, ExtractionError> {
            self.seen.lock().unwrap().push(path.to_path_buf());
            if self.fail_all {
                return Err(ExtractionError::Parse("unreadable".into()));
            }
            Ok(fs::read_to_string(path)?.into())
        }
    }

    fn corpus(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_threshold_boundaries() {
        let thresholds = MatchThresholds::default();
        assert_eq!(thresholds.judge(1.0), MatchLevel::Exact);
        assert_eq!(thresholds.judge(0.999), MatchLevel::Suspicious);
        assert_eq!(thresholds.judge(0.51), MatchLevel::Suspicious);
        assert_eq!(thresholds.judge(0.5), MatchLevel::Unrelated);
        assert_eq!(thresholds.judge(0.0), MatchLevel::Unrelated);
    }

    #[tokio::test]
    async fn test_identical_match_stops_the_walk() {
        let dir = corpus(&[
            ("a.txt", "hello world"),
            ("b.txt", "hello world"),
            ("c.txt", "something else"),
        ]);
        let extractor = RecordingExtractor::default();
        let classifier = Classifier::new(
            StaticSource("hello world".into()),
            extractor.clone(),
            dir.path(),
        );

        let report = classifier.classify("http://example.com").await.unwrap();
        assert_eq!(
            report.verdict,
            ComparisonVerdict::Identical {
                path: dir.path().join("a.txt"),
                score: 1.0
            }
        );
        assert_eq!(report.files_scanned, 1);
        assert_eq!(extractor.seen(), vec!["a.txt"]);
    }

    #[tokio::test]
    async fn test_suspicious_match_is_reported_and_scan_continues() {
        let dir = corpus(&[
            ("a.txt", "the quick brown dog"),
            ("b.txt", "the quick brown cat"),
            ("c.txt", "zzzz"),
        ]);
        let extractor = RecordingExtractor::default();
        let classifier = Classifier::new(
            StaticSource("the quick brown fox".into()),
            extractor.clone(),
            dir.path(),
        );

        let report = classifier.classify("http://example.com").await.unwrap();
        assert_eq!(report.verdict, ComparisonVerdict::Clean);
        assert_eq!(report.files_scanned, 3);
        assert_eq!(extractor.seen(), vec!["a.txt", "b.txt", "c.txt"]);

        assert_eq!(report.suspicious.len(), 2);
        let first = &report.suspicious[0];
        assert_eq!(first.path, dir.path().join("a.txt"));
        assert!(first.score > 0.5 && first.score < 1.0);
    }

    #[tokio::test]
    async fn test_failed_extraction_everywhere_is_clean() {
        let dir = corpus(&[("a.txt", "abc"), ("b.json", "{}"), ("c.csv", "x\nabc\n")]);
        let extractor = RecordingExtractor::failing();
        let classifier =
            Classifier::new(StaticSource("abc".into()), extractor.clone(), dir.path());

        let report = classifier.classify("http://example.com").await.unwrap();
        assert_eq!(report.verdict, ComparisonVerdict::Clean);
        assert_eq!(report.files_scanned, 3);
        assert!(report.suspicious.is_empty());
    }

    #[tokio::test]
    async fn test_empty_fetch_is_no_content() {
        let dir = corpus(&[("a.txt", "")]);
        let extractor = RecordingExtractor::default();
        let classifier = Classifier::new(StaticSource(String::new()), extractor.clone(), dir.path());

        let report = classifier.classify("http://example.com").await.unwrap();
        assert_eq!(report.verdict, ComparisonVerdict::NoContent);
        assert_eq!(report.files_scanned, 0);
        assert!(extractor.seen().is_empty());
    }

    #[tokio::test]
    async fn test_missing_corpus_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = Classifier::new(
            StaticSource("hello".into()),
            RecordingExtractor::default(),
            dir.path().join("data"),
        );
        let result = classifier.classify("http://example.com").await;
        assert!(matches!(result, Err(ClassifyError::CorpusMissing(_))));
    }

    #[test]
    fn test_custom_thresholds() {
        let dir = corpus(&[("a.txt", "the quick brown dog")]);
        let classifier = Classifier::new(
            StaticSource(String::new()),
            RecordingExtractor::default(),
            dir.path(),
        )
        .with_thresholds(MatchThresholds {
            exact: 0.8,
            suspicious: 0.5,
        });

        let report = classifier.scan("http://example.com", "the quick brown fox");
        assert!(report.is_identical());
        assert_eq!(report.matched_path(), Some(dir.path().join("a.txt").as_path()));
    }

    #[test]
    fn test_report_json_shape() {
        let report = ClassificationReport {
            url: "http://example.onion".into(),
            verdict: ComparisonVerdict::Identical {
                path: PathBuf::from("data/a.txt"),
                score: 1.0,
            },
            suspicious: vec![SuspiciousMatch {
                path: PathBuf::from("data/0.txt"),
                score: 0.75,
            }],
            files_scanned: 2,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"], "identical");
        assert_eq!(json["path"], "data/a.txt");
        assert_eq!(json["suspicious"][0]["score"], 0.75);
        assert_eq!(json["files_scanned"], 2);

        let clean = ClassificationReport::no_content("http://x");
        let json = serde_json::to_value(&clean).unwrap();
        assert_eq!(json["verdict"], "no_content");
        assert!(json.get("path").is_none());
    }

    #[test]
    fn test_suspicious_display() {
        let hit = SuspiciousMatch {
            path: PathBuf::from("data/page.txt"),
            score: 0.8947,
        };
        assert_eq!(hit.to_string(), "89.47% match found with data/page.txt");
    }
}
