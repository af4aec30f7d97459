//! # Context Assembly Module
//!
//! ## Purpose
//! Produces the size-bounded textual context handed to a downstream generator
//! from the documents selected by relevance ranking.
//!
//! ## Input/Output Specification
//! - **Input**: Query text, ranked documents, per-document character budget
//! - **Output**: Context string with one attributed block per document
//! - **Attribution**: Every included block is prefixed with a human-readable
//!   document header (type, number, year) so downstream consumers and humans
//!   auditing output can trace every excerpt to its source
//!
//! When the query carries an explicit article reference, the assembler tries
//! to locate that article in each selected document and includes its text with
//! a few trailing lines of surrounding context; otherwise (or when the article
//! is absent from a document) it falls back to a budget-bounded content
//! prefix.

use crate::articles::ArticleLocator;
use crate::config::AssemblyConfig;
use crate::content::ContentStore;
use crate::scoring::ScoredDocument;
use crate::DocType;
use regex::Regex;

/// Bounded-context assembler over ranked documents
pub struct ContextAssembler {
    config: AssemblyConfig,
    locator: ArticleLocator,
    article_reference: Regex,
}

impl ContextAssembler {
    pub fn new(config: AssemblyConfig) -> Self {
        Self {
            locator: ArticleLocator::new(config.clone()),
            article_reference: Regex::new(r"(?i)art[ií]culo\s+\d+").expect("valid regex"),
            config,
        }
    }

    /// Assemble the context for the selected documents.
    ///
    /// `per_document_char_budget` bounds the fallback prefix per document;
    /// planning documents get the larger full-document budget because their
    /// relevant material sits deep in the body.
    pub fn assemble(
        &self,
        query: &str,
        ranked: &[ScoredDocument],
        per_document_char_budget: usize,
        content_store: &ContentStore,
    ) -> String {
        let requested_articles = self.requested_articles(query);
        let mut context = String::new();

        for scored in ranked {
            let doc = &scored.document;
            let Some(content) = content_store.get_content(&doc.id) else {
                tracing::warn!(id = %doc.id, "ranked document has no readable content, skipping");
                continue;
            };

            let block = self
                .article_block(&requested_articles, &content.raw_text)
                .unwrap_or_else(|| {
                    let budget = if doc.doc_type == DocType::PlanningDoc {
                        self.config.full_document_char_budget
                    } else {
                        per_document_char_budget
                    };
                    crate::utils::truncate_chars(&content.raw_text, budget)
                });

            context.push_str(&format!("\n\n--- {} ---\n{}", doc.header(), block));
        }

        context
    }

    /// Numeric tokens of an article-referencing query, in query order.
    /// Empty when the query carries no explicit article reference.
    fn requested_articles(&self, query: &str) -> Vec<String> {
        if !self.article_reference.is_match(query) {
            return Vec::new();
        }

        query
            .split_whitespace()
            .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
            .map(|token| token.to_string())
            .collect()
    }

    /// Try Contract A for each requested article number against this content;
    /// first hit wins. Exactness over coverage: a miss falls back to the
    /// prefix path rather than an approximate excerpt.
    fn article_block(&self, requested: &[String], raw_text: &str) -> Option<String> {
        for number in requested {
            if let Some(text) = self.locator.extract_article_with_trailing(
                raw_text,
                number,
                self.config.article_trailing_lines,
            ) {
                return Some(text);
            }
        }
        None
    }
}
