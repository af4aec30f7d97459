//! # Relevance Scoring Module
//!
//! ## Purpose
//! Computes a ranked list of documents for a free-text query using weighted
//! term matches across title, identifier and content, plus type-specific
//! boosts.
//!
//! ## Input/Output Specification
//! - **Input**: Query text, the scanned document collection, the content store
//! - **Output**: `ScoredDocument` list sorted descending by score; ties keep
//!   scan order (explicit design looseness, not a guarantee)
//!
//! ## Weighting Rationale
//! Title and identifier matches are curated, low-noise signals and must
//! dominate. Raw content matches are high-recall but low-precision — a term
//! can appear incidentally in a long document — so they are down-weighted and
//! counted once per distinct term rather than per occurrence, preventing long
//! documents from winning purely on volume. All weights are configuration;
//! the defaults reproduce the empirically tuned production values.

use crate::config::ScoringConfig;
use crate::content::ContentStore;
use crate::Document;
use serde::Serialize;

/// Type keywords eligible for the identifier type-match boost
const TYPE_KEYWORDS: [&str; 3] = ["decreto", "ley", "circular"];

/// Transient result of scoring one document against one query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument {
    /// The scored document
    pub document: Document,
    /// Non-negative integer relevance score
    pub score: u32,
    /// Ordered, human-readable reasons contributing to the score. Used for
    /// explainability and debugging, never for ranking.
    pub matched_factors: Vec<String>,
}

/// Weighted multi-factor scorer
pub struct RelevanceScorer {
    config: ScoringConfig,
}

impl RelevanceScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every document against the query and rank the survivors.
    ///
    /// Documents below the minimum relevance threshold are dropped entirely,
    /// not ranked last. The sort is stable, so equal scores keep scan order.
    pub fn score(
        &self,
        query: &str,
        documents: &[Document],
        content_store: &ContentStore,
    ) -> Vec<ScoredDocument> {
        let terms = tokenize(query);
        let query_lower = query.to_lowercase();

        let mut scored: Vec<ScoredDocument> = documents
            .iter()
            .filter_map(|doc| {
                let result = self.score_document(doc, &terms, &query_lower, content_store);
                (result.score >= self.config.min_score_threshold).then_some(result)
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            query,
            candidates = documents.len(),
            retained = scored.len(),
            "relevance scoring complete"
        );

        scored
    }

    fn score_document(
        &self,
        document: &Document,
        terms: &[String],
        query_lower: &str,
        content_store: &ContentStore,
    ) -> ScoredDocument {
        let title = document.title.to_lowercase();
        let identifier = document.id.to_lowercase();

        let mut score = 0u32;
        let mut factors = Vec::new();

        for term in terms {
            let numeric = is_numeric(term);

            if title.contains(term.as_str()) {
                let weight = if numeric {
                    self.config.numeric_in_title_weight
                } else {
                    self.config.term_in_title_weight
                };
                score += weight;
                factors.push(format!("term '{}' in title (+{})", term, weight));
            }

            if identifier.contains(term.as_str()) {
                let weight = if numeric {
                    self.config.numeric_in_identifier_weight
                } else {
                    self.config.term_in_identifier_weight
                };
                score += weight;
                factors.push(format!("term '{}' in identifier (+{})", term, weight));
            }
        }

        // One hit per distinct term, never per occurrence
        if !terms.is_empty() {
            if let Some(content) = content_store.get_content(&document.id) {
                let text = content.raw_text.to_lowercase();
                for term in terms {
                    if text.contains(term.as_str()) {
                        score += self.config.term_in_content_weight;
                        factors.push(format!(
                            "term '{}' in content (+{})",
                            term, self.config.term_in_content_weight
                        ));
                    }
                }
            }
        }

        for keyword in TYPE_KEYWORDS {
            if query_lower.contains(keyword) && identifier.contains(keyword) {
                score += self.config.type_match_boost;
                factors.push(format!(
                    "type keyword '{}' in identifier (+{})",
                    keyword, self.config.type_match_boost
                ));
                break;
            }
        }

        ScoredDocument {
            document: document.clone(),
            score,
            matched_factors: factors,
        }
    }
}

/// Whitespace tokenization into lowercase terms, duplicates removed while
/// preserving first-seen order. No stemming, no stop-word removal.
fn tokenize(query: &str) -> Vec<String> {
    let mut terms = Vec::new();
    for token in query.split_whitespace() {
        let term = token.to_lowercase();
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

fn is_numeric(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::ContentStore;
    use crate::extract::{MetadataCache, MetadataExtractor};
    use crate::DocType;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn fixture(root: &std::path::Path) -> (RelevanceScorer, ContentStore) {
        let mut config = Config::default();
        config.corpus.root_path = root.to_path_buf();
        let cache = Arc::new(MetadataCache::new());
        let extractor = Arc::new(MetadataExtractor::new(config.extraction.clone(), cache));
        (
            RelevanceScorer::new(config.scoring),
            ContentStore::new(config.corpus, extractor),
        )
    }

    fn doc(id: &str, title: &str, doc_type: DocType) -> Document {
        Document {
            id: id.to_string(),
            title: title.to_string(),
            number: String::new(),
            year: 2013,
            doc_type,
            path: PathBuf::from(format!("{}/{}.txt", doc_type.folder(), id)),
            size_bytes: 0,
            extraction_error: None,
        }
    }

    #[test]
    fn test_decree_query_scores_all_factors() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("decretos")).unwrap();
        fs::write(
            dir.path().join("decretos/decreto_1377_2013.txt"),
            "DECRETO 1377 DE 2013\nProtección de datos personales",
        )
        .unwrap();

        let (scorer, store) = fixture(dir.path());
        let documents = vec![doc("decreto_1377_2013", "DECRETO 1377 DE 2013", DocType::Decree)];

        let results = scorer.score("decreto 1377", &documents, &store);
        assert_eq!(results.len(), 1);

        // number-in-filename (80) + type-match boost (60) as a floor
        assert!(results[0].score >= 140, "score was {}", results[0].score);
        assert!(results[0]
            .matched_factors
            .iter()
            .any(|f| f.contains("type keyword 'decreto'")));
    }

    #[test]
    fn test_below_threshold_dropped_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let (scorer, store) = fixture(dir.path());

        // No content on disk: the only possible factor would be content hits
        let documents = vec![doc("otros_doc", "Documento sin relación", DocType::Other)];
        let results = scorer.score("tributario", &documents, &store);
        assert!(results.is_empty());
    }

    #[test]
    fn test_title_match_is_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let (scorer, store) = fixture(dir.path());

        let documents = vec![doc(
            "ley_1581_2012",
            "LEY 1581 DE 2012 protección de datos",
            DocType::Law,
        )];

        let base = scorer.score("ley 1581", &documents, &store);
        let extended = scorer.score("ley 1581 datos", &documents, &store);
        assert!(extended[0].score > base[0].score);
    }

    #[test]
    fn test_numeric_terms_outweigh_words_in_title() {
        let dir = tempfile::tempdir().unwrap();
        let (scorer, store) = fixture(dir.path());

        let documents = vec![
            doc("a_1581", "Norma 1581 de prueba", DocType::Other),
            doc("b_sin_numero", "Norma de prueba palabra", DocType::Other),
        ];

        let results = scorer.score("1581 palabra", &documents, &store);
        assert_eq!(results[0].document.id, "a_1581");
    }

    #[test]
    fn test_ties_keep_scan_order() {
        let dir = tempfile::tempdir().unwrap();
        let (scorer, store) = fixture(dir.path());

        let documents = vec![
            doc("primero", "decreto repetido", DocType::Decree),
            doc("segundo", "decreto repetido", DocType::Decree),
        ];

        let results = scorer.score("decreto repetido", &documents, &store);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, results[1].score);
        assert_eq!(results[0].document.id, "primero");
    }

    #[test]
    fn test_duplicate_query_terms_counted_once() {
        let dir = tempfile::tempdir().unwrap();
        let (scorer, store) = fixture(dir.path());

        let documents = vec![doc("ley_1581_2012", "LEY 1581 DE 2012", DocType::Law)];
        let once = scorer.score("1581", &documents, &store);
        let twice = scorer.score("1581 1581", &documents, &store);
        assert_eq!(once[0].score, twice[0].score);
    }
}
