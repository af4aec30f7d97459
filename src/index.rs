//! # Corpus Index Module
//!
//! ## Purpose
//! Owns the collection of all documents' metadata, built by walking the fixed
//! set of per-type corpus folders and extracting metadata for every file.
//!
//! ## Input/Output Specification
//! - **Input**: Corpus root path, fixed folder-to-type mapping
//! - **Output**: Ordered `Document` list, filtered listings, corpus statistics
//! - **Failure semantics**: A file that cannot be decoded is still returned
//!   with an error-marker title rather than dropped, so document counts stay
//!   externally verifiable
//!
//! ## Key Features
//! - Sequential walk of a small, fixed folder set; missing folders skipped
//! - Result ordered by year descending, then number descending (display
//!   convenience, re-sorted on every scan)
//! - Scan results republished atomically as an `Arc` snapshot so in-flight
//!   readers always see a consistent document collection
//! - Explicit metadata cache invalidation for when extraction logic changes

use crate::config::CorpusConfig;
use crate::errors::Result;
use crate::extract::{MetadataCache, MetadataExtractor};
use crate::{DocType, Document};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Filters accepted by the document listing API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentFilter {
    /// Keep only documents of this type
    pub doc_type: Option<DocType>,
    /// Keep only documents from this year
    pub year: Option<u16>,
    /// Keep only documents whose title contains this substring
    /// (case-insensitive)
    pub title_substring: Option<String>,
}

/// Corpus statistics
#[derive(Debug, Clone, Serialize)]
pub struct CorpusStats {
    /// Total indexed documents, error documents included
    pub total: usize,
    /// Document count per type label
    pub by_type: BTreeMap<String, usize>,
    /// Document count per year, ascending; year 0 (unknown) excluded
    pub by_year: BTreeMap<u16, usize>,
    /// When the counted scan completed
    pub scanned_at: DateTime<Utc>,
}

/// Corpus index over the per-type document folders
pub struct CorpusIndex {
    config: CorpusConfig,
    extractor: Arc<MetadataExtractor>,
    cache: Arc<MetadataCache>,
    snapshot: RwLock<Arc<Vec<Document>>>,
}

impl CorpusIndex {
    /// Create a new index sharing the given cache handle with its extractor.
    pub fn new(
        config: CorpusConfig,
        extractor: Arc<MetadataExtractor>,
        cache: Arc<MetadataCache>,
    ) -> Self {
        Self {
            config,
            extractor,
            cache,
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Walk the corpus folders and rebuild the document collection.
    ///
    /// Every file with the expected extension is accounted for: extraction
    /// failures become error-marker documents instead of being dropped. The
    /// result is sorted year descending, then number descending (string
    /// comparison), and published atomically for concurrent readers.
    pub fn scan(&self) -> Result<Arc<Vec<Document>>> {
        let mut documents = Vec::new();

        for doc_type in DocType::ALL {
            let folder = self.config.root_path.join(doc_type.folder());
            let entries = match std::fs::read_dir(&folder) {
                Ok(entries) => entries,
                Err(_) => {
                    tracing::debug!(folder = %folder.display(), "corpus folder missing, skipping");
                    continue;
                }
            };

            let mut paths: Vec<_> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.extension()
                        .map(|ext| ext == self.config.file_extension.as_str())
                        .unwrap_or(false)
                })
                .collect();
            // Directory iteration order is platform-dependent; a stable walk
            // keeps tie-breaking by scan order deterministic.
            paths.sort();

            for path in paths {
                documents.push(self.extractor.extract_file(&path, doc_type));
            }
        }

        documents.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| b.number.cmp(&a.number))
        });

        let snapshot = Arc::new(documents);
        *self.snapshot.write() = snapshot.clone();

        tracing::info!(documents = snapshot.len(), "corpus scan complete");
        Ok(snapshot)
    }

    /// Last published document collection without rescanning.
    pub fn snapshot(&self) -> Arc<Vec<Document>> {
        self.snapshot.read().clone()
    }

    /// Rescan and return documents matching the filter.
    pub fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let documents = self.scan()?;

        let needle = filter
            .title_substring
            .as_ref()
            .map(|s| s.to_lowercase());

        Ok(documents
            .iter()
            .filter(|doc| filter.doc_type.map_or(true, |t| doc.doc_type == t))
            .filter(|doc| filter.year.map_or(true, |y| doc.year == y))
            .filter(|doc| {
                needle
                    .as_ref()
                    .map_or(true, |n| doc.title.to_lowercase().contains(n))
            })
            .cloned()
            .collect())
    }

    /// Compute corpus statistics from a fresh scan.
    pub fn stats(&self) -> Result<CorpusStats> {
        let documents = self.scan()?;

        let mut by_type = BTreeMap::new();
        let mut by_year = BTreeMap::new();

        for doc in documents.iter() {
            *by_type.entry(doc.doc_type.label().to_string()).or_insert(0) += 1;
            if doc.year > 0 {
                *by_year.entry(doc.year).or_insert(0) += 1;
            }
        }

        Ok(CorpusStats {
            total: documents.len(),
            by_type,
            by_year,
            scanned_at: Utc::now(),
        })
    }

    /// Reset the metadata cache; subsequent scans recompute every document
    /// from scratch. Callers do this when the extraction logic itself changes,
    /// not on every process start.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("metadata cache cleared");
    }

    /// Corpus root this index walks.
    pub fn root_path(&self) -> &std::path::Path {
        &self.config.root_path
    }
}
