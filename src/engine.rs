//! # Corpus Engine Module
//!
//! ## Purpose
//! Facade over the indexing, scoring and assembly components, exposing the
//! query surface consumed by the serving layer.
//!
//! ## Input/Output Specification
//! - **Input**: Listing filters, document identifiers, free-text queries
//! - **Output**: Document listings, resolved content with article navigation,
//!   ranked sources with assembled context, corpus statistics
//! - **Request model**: Synchronous; one query is scored and assembled to
//!   completion before the next begins. Only the generation boundary is async.
//!
//! ## Error Semantics
//! `EmptyQuery` is rejected before any scan or scoring work begins.
//! `NoRelevantDocuments` means the query was scored and nothing met the
//! threshold — distinct from a lookup miss, which is an `Option::None`.

use crate::articles::{Article, ArticleLocator};
use crate::config::Config;
use crate::content::ContentStore;
use crate::context::ContextAssembler;
use crate::errors::{EngineError, Result};
use crate::extract::{MetadataCache, MetadataExtractor};
use crate::generation::{CanonicalMetadataStore, GeneratedAnswer, TextGenerator, SYSTEM_INSTRUCTION};
use crate::index::{CorpusIndex, CorpusStats, DocumentFilter};
use crate::scoring::{RelevanceScorer, ScoredDocument};
use crate::utils::Timer;
use crate::Document;
use serde::Serialize;
use std::sync::Arc;

/// Query phrases that ask for definitions and need full-document context
const DEFINITIONAL_MARKERS: [&str; 3] = ["qué es", "definición", "define"];

/// Result of a free-text query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    /// Every document that met the relevance threshold, ranked
    pub ranked_sources: Vec<ScoredDocument>,
    /// Bounded context assembled from the top-ranked documents
    pub assembled_context: String,
}

/// Resolved document content with article navigation
#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    /// Document metadata, canonical title applied when available
    pub document: Document,
    /// Complete document text
    pub raw_text: String,
    /// Whitespace-separated word count
    pub word_count: usize,
    /// Article headings in document order
    pub articles: Vec<Article>,
}

/// Engine facade owning the component wiring
pub struct CorpusEngine {
    config: Config,
    cache: Arc<MetadataCache>,
    index: CorpusIndex,
    content_store: ContentStore,
    locator: ArticleLocator,
    scorer: RelevanceScorer,
    assembler: ContextAssembler,
    canonical: Option<Arc<dyn CanonicalMetadataStore>>,
}

impl CorpusEngine {
    /// Wire up the engine components from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let cache = Arc::new(MetadataCache::new());
        let extractor = Arc::new(MetadataExtractor::new(
            config.extraction.clone(),
            cache.clone(),
        ));

        let index = CorpusIndex::new(config.corpus.clone(), extractor.clone(), cache.clone());
        let content_store = ContentStore::new(config.corpus.clone(), extractor);
        let locator = ArticleLocator::new(config.assembly.clone());
        let scorer = RelevanceScorer::new(config.scoring.clone());
        let assembler = ContextAssembler::new(config.assembly.clone());

        Ok(Self {
            config,
            cache,
            index,
            content_store,
            locator,
            scorer,
            assembler,
            canonical: None,
        })
    }

    /// Attach a canonical metadata store whose titles override extraction.
    pub fn with_canonical_store(mut self, store: Arc<dyn CanonicalMetadataStore>) -> Self {
        self.canonical = Some(store);
        self
    }

    /// List indexed documents, optionally filtered.
    pub fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let mut documents = self.index.list(filter)?;
        for doc in &mut documents {
            self.apply_canonical(doc);
        }
        Ok(documents)
    }

    /// Resolve a document identifier to its content and article navigation.
    ///
    /// A miss is `Ok(None)`: a normal outcome, never an error, and it leaves
    /// the metadata cache untouched.
    pub fn get_document_content(&self, document_id: &str) -> Result<Option<ContentResponse>> {
        let Some(content) = self.content_store.get_content(document_id) else {
            return Ok(None);
        };

        let articles: Vec<Article> = self.locator.all_articles(&content.raw_text).collect();

        let mut document = content.document;
        self.apply_canonical(&mut document);

        Ok(Some(ContentResponse {
            document,
            raw_text: content.raw_text,
            word_count: content.word_count,
            articles,
        }))
    }

    /// Budget-bounded cleaned preview of a document.
    pub fn get_document_preview(&self, document_id: &str) -> Option<String> {
        self.content_store
            .preview(document_id, &self.config.assembly)
    }

    /// Resolve one specific article of one document.
    ///
    /// `None` when either the document or the exact article is absent; a
    /// near-miss on the article number is a miss.
    pub fn get_article(&self, document_id: &str, article_number: &str) -> Option<String> {
        let content = self.content_store.get_content(document_id)?;
        self.locator
            .extract_article(&content.raw_text, article_number)
    }

    /// Score the corpus against a free-text query and assemble bounded
    /// context from the top-ranked documents.
    pub fn query(&self, text: &str) -> Result<QueryOutcome> {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.config.scoring.min_query_length {
            return Err(EngineError::EmptyQuery {
                min_length: self.config.scoring.min_query_length,
            });
        }

        let timer = Timer::new("query");
        let documents = self.index.scan()?;
        let ranked = self.scorer.score(trimmed, &documents, &self.content_store);

        if ranked.is_empty() {
            return Err(EngineError::NoRelevantDocuments {
                threshold: self.config.scoring.min_score_threshold,
            });
        }

        let selected = &ranked[..ranked.len().min(self.config.scoring.max_context_documents)];
        let budget = if is_definitional(trimmed) {
            self.config.assembly.full_document_char_budget
        } else {
            self.config.assembly.default_char_budget
        };

        let assembled_context =
            self.assembler
                .assemble(trimmed, selected, budget, &self.content_store);

        tracing::info!(
            query = trimmed,
            sources = ranked.len(),
            elapsed_ms = timer.elapsed_ms(),
            "query answered"
        );

        Ok(QueryOutcome {
            ranked_sources: ranked,
            assembled_context,
        })
    }

    /// Run a query and hand its context to the generation service, pairing
    /// the opaque result with the engine-computed source list.
    pub async fn answer(&self, text: &str, generator: &dyn TextGenerator) -> Result<GeneratedAnswer> {
        let outcome = self.query(text)?;

        let sources: Vec<String> = outcome
            .ranked_sources
            .iter()
            .take(self.config.scoring.max_context_documents)
            .map(|s| s.document.id.clone())
            .collect();

        let generated = generator
            .generate(SYSTEM_INSTRUCTION, &outcome.assembled_context, text)
            .await?;

        Ok(GeneratedAnswer {
            text: generated,
            sources,
        })
    }

    /// Corpus statistics from a fresh scan.
    pub fn corpus_stats(&self) -> Result<CorpusStats> {
        self.index.stats()
    }

    /// Reset the metadata cache (extraction logic changed; recompute all).
    pub fn clear_cache(&self) {
        self.index.clear_cache();
    }

    /// Number of cached metadata entries, for observability.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn apply_canonical(&self, document: &mut Document) {
        if let Some(store) = &self.canonical {
            if let Some(record) = store.lookup(&document.id) {
                if record.title != document.title {
                    tracing::debug!(
                        id = %document.id,
                        "canonical title overrides extracted title"
                    );
                }
                document.title = record.title;
            }
        }
    }
}

fn is_definitional(query: &str) -> bool {
    let lower = query.to_lowercase();
    DEFINITIONAL_MARKERS.iter().any(|m| lower.contains(m))
}
