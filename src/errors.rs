//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the legal corpus engine, providing structured
//! error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from extraction, indexing, scoring and configuration
//! - **Output**: Structured error types with context, categories and recoverability
//! - **Error Categories**: Extraction, Query, Configuration, Internal
//!
//! ## Design Notes
//! Missing documents and missing articles are *not* errors: lookups return
//! `Option` so that a miss can never be confused with a failure. Only genuine
//! failures (undecodable files, rejected queries, bad configuration) travel
//! through `EngineError`.

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error types for the legal corpus engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// A file exists but could not be decoded as text. Contained at the file
    /// level: scans keep the document with an error-marker title instead of
    /// propagating this.
    #[error("failed to decode '{path}' as text: {details}")]
    Decode { path: String, details: String },

    /// Query rejected before any scan or scoring work (blank or below the
    /// configured minimum length).
    #[error("query too short: minimum {min_length} characters")]
    EmptyQuery { min_length: usize },

    /// The query was scored but no document met the minimum relevance
    /// threshold. Distinct from a lookup miss; callers present this as
    /// "no results", not as a system failure.
    #[error("no documents scored at or above the relevance threshold {threshold}")]
    NoRelevantDocuments { threshold: u32 },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("validation failed for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Internal system errors
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::Decode { .. } => "extraction",
            EngineError::EmptyQuery { .. } | EngineError::NoRelevantDocuments { .. } => "query",
            EngineError::Config { .. } | EngineError::Validation { .. } => "configuration",
            EngineError::Internal { .. } => "internal",
        }
    }

    /// Whether the condition is an expected, user-presentable outcome rather
    /// than a system fault.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyQuery { .. } | EngineError::NoRelevantDocuments { .. }
        )
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Internal {
            message: format!("JSON serialization error: {}", err),
        }
    }
}
