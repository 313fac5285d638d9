//! Corpus traversal.
//!
//! The corpus is the directory tree left behind by an earlier collection run.
//! [`CorpusWalker`] visits every regular file under it once, in lexicographic
//! path order, and yields the text of each supported file. Unsupported files
//! are skipped without touching the extractor. Files whose extraction fails
//! are still yielded, with empty text.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::extract::{extract_or_empty, DocumentKind, ExtractedText, Extractor};

/// One supported file and the text recovered from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub text: ExtractedText,
}

/// Walks a corpus directory, extracting text lazily.
pub struct CorpusWalker<'a, E: Extractor + ?Sized> {
    root: PathBuf,
    extractor: &'a E,
}

impl<'a, E: Extractor + ?Sized> CorpusWalker<'a, E> {
    pub fn new(root: impl Into<PathBuf>, extractor: &'a E) -> Self {
        Self {
            root: root.into(),
            extractor,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yield every supported file under the root.
    ///
    /// Each call starts a fresh traversal of the tree as it is now. A missing
    /// root yields nothing.
    pub fn walk(&self) -> impl Iterator<Item = CorpusEntry> + 'a {
        let extractor = self.extractor;
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable corpus entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(move |entry| {
                let path = entry.into_path();
                let kind = DocumentKind::from_path(&path);
                if !kind.is_supported() {
                    tracing::debug!("Skipping unsupported file {}", path.display());
                    return None;
                }

                tracing::debug!("Reading {} as {}", path.display(), kind);
                let text = extract_or_empty(extractor, &path, kind);
                Some(CorpusEntry { path, kind, text })
            })
    }

    /// Summarize what the corpus holds.
    pub fn inventory(&self) -> Inventory {
        let items = self
            .walk()
            .map(|entry| InventoryItem {
                chars: entry.text.char_count(),
                path: entry.path,
                kind: entry.kind,
            })
            .collect();
        Inventory { items }
    }
}

/// One file in a corpus inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub path: PathBuf,
    pub kind: DocumentKind,
    /// Characters of text recovered; zero when nothing could be read.
    pub chars: usize,
}

impl InventoryItem {
    pub fn has_text(&self) -> bool {
        self.chars > 0
    }
}

/// What a corpus walk found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
}

impl Inventory {
    /// Whether any supported file yielded text.
    pub fn has_data(&self) -> bool {
        self.items.iter().any(InventoryItem::has_text)
    }

    /// Files that yielded text.
    pub fn with_text(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter().filter(|item| item.has_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionError;
    use std::cell::RefCell;
    use std::fs;

    /// Reads files as UTF-8 and records every path it is asked about.
    #[derive(Default)]
    struct RecordingExtractor {
        seen: RefCell<Vec<PathBuf>>,
    }

    impl RecordingExtractor {
        fn seen_names(&self) -> Vec<String> {
            self.seen
                .borrow()
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
            self.seen.borrow_mut().push(path.to_path_buf());
            if path.to_string_lossy().contains("broken") {
                return Err(ExtractionError::Parse("corrupt".into()));
            }
            Ok(fs::read_to_string(path)?.into())
        }
    }

    fn corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("site/nested")).unwrap();
        fs::write(root.join("b.txt"), "bee").unwrap();
        fs::write(root.join("a.txt"), "ay").unwrap();
        fs::write(root.join("notes.md"), "skip me").unwrap();
        fs::write(root.join("site/page.csv"), "x\n1\n").unwrap();
        fs::write(root.join("site/nested/broken.json"), "{").unwrap();
        fs::write(root.join("site/nested/empty.txt"), "").unwrap();
        fs::write(root.join("site/archive.zip"), "PK").unwrap();
        dir
    }

    #[test]
    fn test_visits_supported_files_once_in_order() {
        let dir = corpus();
        let extractor = RecordingExtractor::default();
        let walker = CorpusWalker::new(dir.path(), &extractor);

        let entries: Vec<CorpusEntry> = walker.walk().collect();
        let names: Vec<String> = entries
            .iter()
            .map(|e| e.path.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "a.txt",
                "b.txt",
                "site/nested/broken.json",
                "site/nested/empty.txt",
                "site/page.csv",
            ]
        );
        assert_eq!(extractor.seen.borrow().len(), 5);
    }

    #[test]
    fn test_unsupported_files_never_reach_the_extractor() {
        let dir = corpus();
        let extractor = RecordingExtractor::default();
        let _ = CorpusWalker::new(dir.path(), &extractor).walk().count();

        let seen = extractor.seen_names();
        assert!(!seen.contains(&"notes.md".to_string()));
        assert!(!seen.contains(&"archive.zip".to_string()));
    }

    #[test]
    fn test_failed_and_empty_files_are_still_yielded() {
        let dir = corpus();
        let extractor = RecordingExtractor::default();
        let entries: Vec<CorpusEntry> = CorpusWalker::new(dir.path(), &extractor).walk().collect();

        let broken = entries
            .iter()
            .find(|e| e.path.ends_with("broken.json"))
            .unwrap();
        assert!(broken.text.is_empty());
        assert_eq!(broken.kind, DocumentKind::StructuredData);

        let empty = entries.iter().find(|e| e.path.ends_with("empty.txt")).unwrap();
        assert!(empty.text.is_empty());
    }

    #[test]
    fn test_walk_is_lazy_and_restartable() {
        let dir = corpus();
        let extractor = RecordingExtractor::default();
        let walker = CorpusWalker::new(dir.path(), &extractor);

        let first = walker.walk().next().unwrap();
        assert_eq!(first.text.as_str(), "ay");
        assert_eq!(extractor.seen.borrow().len(), 1);

        let again: Vec<CorpusEntry> = walker.walk().collect();
        assert_eq!(again.len(), 5);
        assert_eq!(again[0], first);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = RecordingExtractor::default();
        let walker = CorpusWalker::new(dir.path().join("absent"), &extractor);
        assert_eq!(walker.walk().count(), 0);
    }

    #[test]
    fn test_inventory() {
        let dir = corpus();
        let extractor = RecordingExtractor::default();
        let inventory = CorpusWalker::new(dir.path(), &extractor).inventory();

        assert_eq!(inventory.items.len(), 5);
        assert!(inventory.has_data());
        let with_text: Vec<&Path> = inventory.with_text().map(|i| i.path.as_path()).collect();
        assert_eq!(with_text.len(), 3);
        assert!(with_text.iter().all(|p| !p.ends_with("empty.txt")));
    }

    #[test]
    fn test_inventory_without_text() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blank.txt"), "").unwrap();
        let extractor = RecordingExtractor::default();
        let inventory = CorpusWalker::new(dir.path(), &extractor).inventory();
        assert_eq!(inventory.items.len(), 1);
        assert!(!inventory.has_data());
    }
}
