//! # Content Store Module
//!
//! ## Purpose
//! Resolves a document identifier to its full text on demand. Content is read
//! lazily, never preloaded: metadata scans touch only the leading window of a
//! file, while scoring and context assembly read the whole document here.
//!
//! ## Input/Output Specification
//! - **Input**: Document identifier (filename-derived)
//! - **Output**: `Some(DocumentContent)` or `None` for a miss — a miss is a
//!   normal, expected outcome, not a system failure
//! - **Lookup**: Each type folder is probed in a stable order until a matching
//!   filename is found; O(folders) is deliberate, the folder set is small and
//!   fixed
//!
//! Read failures are contained at the file level: the offending folder probe
//! is logged and skipped, and the miss path never mutates the metadata cache.

use crate::config::{AssemblyConfig, CorpusConfig};
use crate::extract::MetadataExtractor;
use crate::{DocType, Document};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Full text of a resolved document with its identifying metadata
#[derive(Debug, Clone, Serialize)]
pub struct DocumentContent {
    /// Document metadata as extracted (or cached) at resolution time
    pub document: Document,
    /// Complete document text
    pub raw_text: String,
    /// Whitespace-separated word count of the text
    pub word_count: usize,
}

/// Lazy file-backed content resolver
pub struct ContentStore {
    config: CorpusConfig,
    extractor: Arc<MetadataExtractor>,
}

impl ContentStore {
    pub fn new(config: CorpusConfig, extractor: Arc<MetadataExtractor>) -> Self {
        Self { config, extractor }
    }

    /// Resolve an identifier to its owning folder and read the full text.
    ///
    /// Folders are tried in the fixed type order; the first folder containing
    /// the filename wins. Returns `None` when no folder has the file or the
    /// only candidate cannot be read.
    pub fn get_content(&self, document_id: &str) -> Option<DocumentContent> {
        for doc_type in DocType::ALL {
            let path = self.path_for(doc_type, document_id);
            if !path.is_file() {
                continue;
            }

            match std::fs::read_to_string(&path) {
                Ok(raw_text) => {
                    let document = self.extractor.extract_file(&path, doc_type);
                    let word_count = crate::utils::word_count(&raw_text);
                    return Some(DocumentContent {
                        document,
                        raw_text,
                        word_count,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "content read failed, skipping folder probe"
                    );
                    continue;
                }
            }
        }

        None
    }

    /// Budget-bounded cleaned preview of a document.
    ///
    /// Scraper noise lines (download links, publication-date blocks) are
    /// dropped before the budget is applied; the preview is suffixed with an
    /// ellipsis when it fills the budget.
    pub fn preview(&self, document_id: &str, assembly: &AssemblyConfig) -> Option<String> {
        let content = self.get_content(document_id)?;
        let max_chars = assembly.preview_char_budget;

        let mut clean_lines: Vec<&str> = Vec::new();
        for line in content.raw_text.lines().take(50) {
            let line = line.trim();
            if line.is_empty() || line.starts_with("Descargar PDF") || line.starts_with("Fechas") {
                continue;
            }
            clean_lines.push(line);
            if clean_lines.iter().map(|l| l.len() + 1).sum::<usize>() > max_chars {
                break;
            }
        }

        let joined = clean_lines.join(" ");
        let mut preview = crate::utils::truncate_chars(&joined, max_chars);
        if joined.chars().count() > max_chars {
            preview.push_str("...");
        }
        Some(preview)
    }

    fn path_for(&self, doc_type: DocType, document_id: &str) -> PathBuf {
        self.config
            .root_path
            .join(doc_type.folder())
            .join(format!("{}.{}", document_id, self.config.file_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extract::MetadataCache;
    use std::fs;

    fn store_for(root: &std::path::Path) -> (ContentStore, Arc<MetadataCache>) {
        let mut config = Config::default();
        config.corpus.root_path = root.to_path_buf();
        let cache = Arc::new(MetadataCache::new());
        let extractor = Arc::new(MetadataExtractor::new(config.extraction.clone(), cache.clone()));
        (ContentStore::new(config.corpus, extractor), cache)
    }

    #[test]
    fn test_resolves_first_matching_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("decretos")).unwrap();
        fs::write(
            dir.path().join("decretos/decreto_1377_2013.txt"),
            "DECRETO 1377 DE 2013\nArtículo 1. Objeto.",
        )
        .unwrap();

        let (store, _) = store_for(dir.path());
        let content = store.get_content("decreto_1377_2013").unwrap();

        assert_eq!(content.document.doc_type, DocType::Decree);
        assert_eq!(content.document.title, "DECRETO 1377 DE 2013");
        assert!(content.raw_text.contains("Artículo 1"));
        assert_eq!(content.word_count, 7);
    }

    #[test]
    fn test_miss_returns_none_without_cache_mutation() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("leyes")).unwrap();

        let (store, cache) = store_for(dir.path());
        assert!(store.get_content("nonexistent_id").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_preview_skips_noise_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("leyes")).unwrap();
        fs::write(
            dir.path().join("leyes/ley_1581_2012.txt"),
            "Descargar PDF aquí\nFechas de expedición\nLEY 1581 DE 2012\nPor la cual se dictan disposiciones",
        )
        .unwrap();

        let (store, _) = store_for(dir.path());
        let preview = store
            .preview("ley_1581_2012", &Config::default().assembly)
            .unwrap();

        assert!(preview.starts_with("LEY 1581 DE 2012"));
        assert!(!preview.contains("Descargar"));
    }
}
