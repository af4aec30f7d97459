//! # Metadata Extraction Module
//!
//! ## Purpose
//! Derives a title, a document number and a year from the raw content of a
//! corpus file using cascading heuristics, with a process-scoped cache of
//! extraction results.
//!
//! ## Input/Output Specification
//! - **Input**: Raw file bytes, filename, folder-implied document type
//! - **Output**: A `Document` record; never a failure. A file that cannot be
//!   decoded as text yields a document whose title carries an error marker and
//!   whose `extraction_error` records the cause, so one corrupt file never
//!   aborts a full corpus scan.
//!
//! ## Key Features
//! - Prioritized title strategies applied to the leading window of the file
//! - Number/year pair extraction with title-over-filename precedence
//! - Success-only caching keyed by file path (failures are retried on the
//!   next access)
//! - Concurrent readers are safe; racing writers recompute redundantly, which
//!   is tolerated because extraction is idempotent

pub mod patterns;

use crate::config::ExtractionConfig;
use crate::errors::EngineError;
use crate::{DocType, Document};
use dashmap::DashMap;
use patterns::{TitleInput, TitlePattern};
use regex::Regex;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Cache of previously computed document metadata, keyed by file path.
///
/// A cache hit is semantically equivalent to recomputation; the cache is a
/// pure optimization. Entries are never evicted except by an explicit
/// [`MetadataCache::clear`], which exists because extraction heuristics evolve
/// and stale cached titles must not survive a logic change.
#[derive(Default)]
pub struct MetadataCache {
    entries: DashMap<PathBuf, Document>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Document> {
        self.entries.get(path).map(|entry| entry.clone())
    }

    pub fn insert(&self, path: PathBuf, document: Document) {
        self.entries.insert(path, document);
    }

    /// Drop every cached entry; subsequent extractions recompute from scratch.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Heuristic metadata extractor
pub struct MetadataExtractor {
    config: ExtractionConfig,
    patterns: Vec<Box<dyn TitlePattern>>,
    cache: Arc<MetadataCache>,
    number_year_pair: Regex,
    bare_year: Regex,
}

impl MetadataExtractor {
    /// Create a new extractor sharing the given cache handle.
    ///
    /// The cache is injected rather than owned so tests can substitute an
    /// empty one per test and so the index can expose an explicit clear.
    pub fn new(config: ExtractionConfig, cache: Arc<MetadataCache>) -> Self {
        let patterns = patterns::default_patterns(&config);
        Self {
            config,
            patterns,
            cache,
            number_year_pair: Regex::new(r"(\d{3,4}).*?(\d{4})").expect("valid regex"),
            bare_year: Regex::new(r"\d{4}").expect("valid regex"),
        }
    }

    /// Extract metadata for a corpus file, consulting the cache first.
    ///
    /// Successful extractions populate the cache; failures are not cached so
    /// a transient read error is retried on the next access.
    pub fn extract_file(&self, path: &Path, declared_type: DocType) -> Document {
        if let Some(cached) = self.cache.get(path) {
            return cached;
        }

        let id = document_id(path);
        let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        match self.read_header(path) {
            Ok(header) => {
                let document =
                    self.extract(&header, &id, declared_type, path.to_path_buf(), size_bytes);
                self.cache.insert(path.to_path_buf(), document.clone());
                document
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "metadata extraction failed");
                Document {
                    id,
                    title: format!("Error: {}", err),
                    number: String::new(),
                    year: 0,
                    doc_type: declared_type,
                    path: path.to_path_buf(),
                    size_bytes,
                    extraction_error: Some(err.to_string()),
                }
            }
        }
    }

    /// Extract metadata from already-decoded content. Never fails.
    pub fn extract(
        &self,
        content: &str,
        filename: &str,
        declared_type: DocType,
        path: PathBuf,
        size_bytes: u64,
    ) -> Document {
        let normalized: String = content.nfc().collect();
        let lines: Vec<&str> = normalized.lines().collect();

        let title = self.extract_title(&lines, filename, declared_type);
        let (number, year) = self.extract_number_year(&title, filename);

        Document {
            id: filename.to_string(),
            title,
            number,
            year,
            doc_type: declared_type,
            path,
            size_bytes,
            extraction_error: None,
        }
    }

    /// Run the title strategies in priority order, stopping at the first match.
    /// The filename fallback always succeeds.
    fn extract_title(&self, lines: &[&str], filename: &str, declared_type: DocType) -> String {
        let input = TitleInput {
            lines,
            filename,
            declared_type,
        };

        for pattern in &self.patterns {
            if let Some(title) = pattern.apply(&input) {
                tracing::debug!(strategy = pattern.name(), filename, "title extracted");
                return title;
            }
        }

        // Unreachable while the filename fallback is in the strategy list
        filename.to_string()
    }

    /// Extract the `(number, year)` pair.
    ///
    /// The title is searched before the filename: titles are curated text
    /// while filenames may be arbitrary, so a title-derived pair wins even
    /// when a different pair exists in the filename. When no pair exists
    /// anywhere, a bare four-digit token becomes the year with an empty
    /// number; failing that, both stay empty/zero.
    fn extract_number_year(&self, title: &str, filename: &str) -> (String, u16) {
        for source in [title, filename] {
            if let Some(caps) = self.number_year_pair.captures(source) {
                let number = caps[1].to_string();
                let year = caps[2].parse().unwrap_or(0);
                return (number, year);
            }
        }

        let combined = format!("{}{}", title, filename);
        if let Some(year) = self.bare_year.find(&combined) {
            return (String::new(), year.as_str().parse().unwrap_or(0));
        }

        (String::new(), 0)
    }

    /// Read the leading window of a file as UTF-8.
    ///
    /// Only the first `header_scan_bytes` bytes are inspected; a multibyte
    /// character split by the window boundary is trimmed rather than treated
    /// as a decode failure.
    fn read_header(&self, path: &Path) -> crate::errors::Result<String> {
        let mut file = std::fs::File::open(path).map_err(|e| EngineError::Decode {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;

        let mut buf = Vec::with_capacity(self.config.header_scan_bytes);
        file.by_ref()
            .take(self.config.header_scan_bytes as u64)
            .read_to_end(&mut buf)
            .map_err(|e| EngineError::Decode {
                path: path.display().to_string(),
                details: e.to_string(),
            })?;

        match std::str::from_utf8(&buf) {
            Ok(text) => Ok(text.to_string()),
            Err(e) if buf.len() == self.config.header_scan_bytes && e.valid_up_to() + 4 >= buf.len() => {
                Ok(String::from_utf8_lossy(&buf[..e.valid_up_to()]).into_owned())
            }
            Err(e) => Err(EngineError::Decode {
                path: path.display().to_string(),
                details: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
            }),
        }
    }
}

/// Stable document identifier: the filename without its extension.
pub fn document_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
