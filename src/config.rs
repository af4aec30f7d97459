//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the legal corpus engine, supporting TOML files
//! and environment variable overrides with validation and type-safe access to
//! all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, dependency verification
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (highest priority)
//! 2. Configuration files
//! 3. Default values (lowest priority)
//!
//! The scoring weights and context budgets are deliberately configuration, not
//! constants: they are empirically chosen policy values subject to product
//! review. The defaults reproduce the observed production behavior.
//!
//! ## Usage
//! ```rust,no_run
//! use legal_corpus_search::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("corpus root: {:?}", config.corpus.root_path);
//! ```

use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Corpus layout and scanning
    pub corpus: CorpusConfig,
    /// Metadata extraction heuristics
    pub extraction: ExtractionConfig,
    /// Relevance scoring weights and thresholds
    pub scoring: ScoringConfig,
    /// Context assembly budgets
    pub assembly: AssemblyConfig,
    /// Logging and monitoring
    pub logging: LoggingConfig,
}

/// Corpus layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Root directory containing the per-type document folders
    pub root_path: PathBuf,
    /// File extension of corpus documents (without the dot)
    pub file_extension: String,
}

/// Metadata extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Number of leading bytes of a file inspected for title patterns
    pub header_scan_bytes: usize,
    /// Line window for the type-specific structured patterns
    pub structured_pattern_lines: usize,
    /// Line window for the generic legal heading pattern
    pub heading_pattern_lines: usize,
}

/// Relevance scoring configuration.
///
/// Weights are integer contributions summed per document; see the scorer for
/// the exact semantics of each factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Numeric query term found in the document title
    pub numeric_in_title_weight: u32,
    /// Non-numeric query term found in the document title
    pub term_in_title_weight: u32,
    /// Numeric query term found in the document identifier
    pub numeric_in_identifier_weight: u32,
    /// Non-numeric query term found in the document identifier
    pub term_in_identifier_weight: u32,
    /// Query term found anywhere in the content, once per distinct term
    pub term_in_content_weight: u32,
    /// Query mentions a type keyword that also appears in the identifier
    pub type_match_boost: u32,
    /// Minimum total score a document needs to stay in the result set
    pub min_score_threshold: u32,
    /// Number of top-ranked documents handed to context assembly
    pub max_context_documents: usize,
    /// Queries shorter than this are rejected before scoring
    pub min_query_length: usize,
}

/// Context assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Per-document character budget for general queries
    pub default_char_budget: usize,
    /// Per-document character budget when full-document context is needed
    /// (definitional lookups and planning documents)
    pub full_document_char_budget: usize,
    /// Trailing lines appended after a located article for surrounding context
    pub article_trailing_lines: usize,
    /// Hard cap on lines captured for a single article
    pub max_article_lines: usize,
    /// Character budget for article navigation snippets
    pub snippet_char_budget: usize,
    /// Character budget for cleaned document previews
    pub preview_char_budget: usize,
}

/// Logging and monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("configuration file not found: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            message: format!("failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| EngineError::Config {
            message: format!("failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(root) = std::env::var("LEGAL_CORPUS_ROOT") {
            self.corpus.root_path = PathBuf::from(root);
        }
        if let Ok(level) = std::env::var("LEGAL_CORPUS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(threshold) = std::env::var("LEGAL_CORPUS_SCORE_THRESHOLD") {
            self.scoring.min_score_threshold =
                threshold.parse().map_err(|_| EngineError::Config {
                    message: "invalid number in LEGAL_CORPUS_SCORE_THRESHOLD".to_string(),
                })?;
        }
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.corpus.file_extension.is_empty() {
            return Err(EngineError::Validation {
                field: "corpus.file_extension".to_string(),
                reason: "file extension cannot be empty".to_string(),
            });
        }

        if self.extraction.header_scan_bytes == 0 {
            return Err(EngineError::Validation {
                field: "extraction.header_scan_bytes".to_string(),
                reason: "header scan window must be greater than zero".to_string(),
            });
        }

        if self.scoring.max_context_documents == 0 {
            return Err(EngineError::Validation {
                field: "scoring.max_context_documents".to_string(),
                reason: "context document cap must be greater than zero".to_string(),
            });
        }

        if self.scoring.min_query_length == 0 {
            return Err(EngineError::Validation {
                field: "scoring.min_query_length".to_string(),
                reason: "minimum query length must be greater than zero".to_string(),
            });
        }

        if self.assembly.default_char_budget > self.assembly.full_document_char_budget {
            return Err(EngineError::Validation {
                field: "assembly.default_char_budget".to_string(),
                reason: "default budget cannot exceed the full-document budget".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config {
            message: format!("failed to serialize config to TOML: {}", e),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig {
                root_path: PathBuf::from("./data/textos"),
                file_extension: "txt".to_string(),
            },
            extraction: ExtractionConfig {
                header_scan_bytes: 2000,
                structured_pattern_lines: 30,
                heading_pattern_lines: 20,
            },
            scoring: ScoringConfig {
                numeric_in_title_weight: 100,
                term_in_title_weight: 50,
                numeric_in_identifier_weight: 80,
                term_in_identifier_weight: 30,
                term_in_content_weight: 5,
                type_match_boost: 60,
                min_score_threshold: 30,
                max_context_documents: 3,
                min_query_length: 3,
            },
            assembly: AssemblyConfig {
                default_char_budget: 5000,
                full_document_char_budget: 8000,
                article_trailing_lines: 3,
                max_article_lines: 50,
                snippet_char_budget: 50,
                preview_char_budget: 500,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.min_score_threshold, 30);
        assert_eq!(config.scoring.max_context_documents, 3);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(
            parsed.scoring.numeric_in_title_weight,
            config.scoring.numeric_in_title_weight
        );
        assert_eq!(parsed.corpus.file_extension, "txt");
    }

    #[test]
    fn test_budget_ordering_enforced() {
        let mut config = Config::default();
        config.assembly.default_char_budget = 10_000;
        config.assembly.full_document_char_budget = 5000;
        assert!(config.validate().is_err());
    }
}
