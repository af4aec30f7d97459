//! # Legal Corpus Search Engine
//!
//! ## Overview
//! This library indexes a file tree of Colombian legal documents (leyes,
//! decretos, circulares, resoluciones, CONPES planning documents), extracts
//! structured identity metadata from noisy scraped text, and answers free-text
//! queries with a ranked, bounded-size excerpt set suitable for downstream
//! summarization.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `extract`: Heuristic title/number/year extraction with a metadata cache
//! - `index`: Corpus index built by scanning the per-type document folders
//! - `content`: Lazy resolution of a document identifier to its full text
//! - `articles`: Extraction of numbered articles from document content
//! - `scoring`: Weighted multi-factor relevance ranking
//! - `context`: Size-bounded context assembly for a downstream generator
//! - `generation`: Collaborator traits for canonical metadata and text generation
//! - `engine`: Facade exposing the query surface to the serving layer
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Plain-text legal documents on disk, free-text search queries
//! - **Output**: Ranked scored documents, assembled bounded context, corpus stats
//! - **Index lifetime**: Rebuilt by scanning files; nothing persists across restarts
//!
//! ## Usage
//! ```rust,no_run
//! use legal_corpus_search::{config::Config, engine::CorpusEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let engine = CorpusEngine::new(config)?;
//!     let outcome = engine.query("decreto 1377 datos personales")?;
//!     println!("{} sources", outcome.ranked_sources.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod extract;
pub mod index;
pub mod content;
pub mod articles;
pub mod scoring;
pub mod context;
pub mod generation;
pub mod engine;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use engine::{CorpusEngine, QueryOutcome};
pub use errors::{EngineError, Result};
pub use scoring::ScoredDocument;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Document type, assigned solely from the containing folder and never
/// inferred from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    Law,
    Decree,
    Circular,
    Resolution,
    PlanningDoc,
    Other,
}

impl DocType {
    /// Fixed folder-to-type mapping, in the stable order used for both
    /// corpus scans and identifier lookups.
    pub const ALL: [DocType; 6] = [
        DocType::Law,
        DocType::Decree,
        DocType::Circular,
        DocType::Resolution,
        DocType::PlanningDoc,
        DocType::Other,
    ];

    /// Corpus subfolder holding documents of this type
    pub fn folder(&self) -> &'static str {
        match self {
            DocType::Law => "leyes",
            DocType::Decree => "decretos",
            DocType::Circular => "circulares",
            DocType::Resolution => "resoluciones",
            DocType::PlanningDoc => "conpes",
            DocType::Other => "otros",
        }
    }

    /// Spanish display label used in document headers
    pub fn label(&self) -> &'static str {
        match self {
            DocType::Law => "Ley",
            DocType::Decree => "Decreto",
            DocType::Circular => "Circular",
            DocType::Resolution => "Resolución",
            DocType::PlanningDoc => "Conpes",
            DocType::Other => "Otros",
        }
    }

    /// Parse a type filter value as accepted by the listing API
    pub fn parse(value: &str) -> Option<DocType> {
        let lower = value.trim().to_lowercase();
        DocType::ALL
            .iter()
            .copied()
            .find(|t| t.folder() == lower || t.label().to_lowercase() == lower)
    }
}

/// One physical text file in the corpus.
///
/// Created when the corpus is scanned and immutable until the next rescan;
/// `id` is unique across the corpus (derived from the filename).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier derived from the filename (without extension)
    pub id: String,
    /// Best-effort extracted heading, or an error marker when the file could
    /// not be decoded
    pub title: String,
    /// Document number; empty when no number pattern was found
    pub number: String,
    /// Four-digit year; 0 when unknown
    pub year: u16,
    /// Type implied by the containing folder
    pub doc_type: DocType,
    /// Path of the backing file
    pub path: PathBuf,
    /// Size of the backing file in bytes
    pub size_bytes: u64,
    /// Description of the contained extraction failure, if any
    pub extraction_error: Option<String>,
}

impl Document {
    /// Human-readable header used to attribute excerpts to their source,
    /// e.g. `Decreto 1377 de 2013`.
    pub fn header(&self) -> String {
        match (self.number.is_empty(), self.year) {
            (false, y) if y > 0 => format!("{} {} de {}", self.doc_type.label(), self.number, y),
            (false, _) => format!("{} {}", self.doc_type.label(), self.number),
            (true, y) if y > 0 => format!("{} de {}", self.doc_type.label(), y),
            (true, _) => format!("{} {}", self.doc_type.label(), self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_mapping_is_stable() {
        assert_eq!(DocType::Law.folder(), "leyes");
        assert_eq!(DocType::PlanningDoc.folder(), "conpes");
        assert_eq!(DocType::ALL.len(), 6);
    }

    #[test]
    fn test_parse_accepts_folder_and_label() {
        assert_eq!(DocType::parse("decretos"), Some(DocType::Decree));
        assert_eq!(DocType::parse("Decreto"), Some(DocType::Decree));
        assert_eq!(DocType::parse("resolución"), Some(DocType::Resolution));
        assert_eq!(DocType::parse("unknown"), None);
    }

    #[test]
    fn test_document_header() {
        let doc = Document {
            id: "decreto_1377_2013".to_string(),
            title: "DECRETO 1377 DE 2013".to_string(),
            number: "1377".to_string(),
            year: 2013,
            doc_type: DocType::Decree,
            path: PathBuf::from("decretos/decreto_1377_2013.txt"),
            size_bytes: 1024,
            extraction_error: None,
        };
        assert_eq!(doc.header(), "Decreto 1377 de 2013");
    }
}
