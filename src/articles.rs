//! # Article Locator Module
//!
//! ## Purpose
//! Extracts numbered articles from a document's text: a single article's body
//! for exact citation, or every article heading for navigation.
//!
//! ## Input/Output Specification
//! - **Input**: Full document text, optionally a requested article number
//! - **Output**: The article body as normalized text, or a lazy sequence of
//!   article headings in document order
//! - **Exactness**: Legal citation must be exact — a near-miss (different
//!   article number) is a miss, never a partial or approximate match
//!
//! Article bodies are bounded by the next article heading, a structural
//! section marker, or a fixed line cap for pathological single-article files.

use crate::config::AssemblyConfig;
use crate::utils::normalize_whitespace;
use regex::Regex;
use serde::Serialize;

/// One article heading, produced on demand for navigation; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// Article number as it appears in the text
    pub number: String,
    /// Heading line truncated to the snippet budget
    pub title_snippet: String,
    /// Deterministic anchor derived from the article number
    pub anchor_id: String,
}

/// Line-oriented article extraction over document content
pub struct ArticleLocator {
    config: AssemblyConfig,
    article_heading: Regex,
    section_marker: Regex,
    article_global: Regex,
}

impl ArticleLocator {
    pub fn new(config: AssemblyConfig) -> Self {
        Self {
            config,
            article_heading: Regex::new(r"(?i)^Art[ií]culo\s+(\d+)[°º]?\.?").expect("valid regex"),
            section_marker: Regex::new(r"(?i)^(CAPÍTULO|CAPITULO|TÍTULO|TITULO|Parágrafo)")
                .expect("valid regex"),
            article_global: Regex::new(r"(?i)Art[ií]culo\s+(\d+)[°º]*\.?\s*([^\n]*)")
                .expect("valid regex"),
        }
    }

    /// Extract the body of one specific article.
    ///
    /// Capture begins at the line whose heading number equals the requested
    /// number exactly, and ends at the next article heading, at a structural
    /// section marker, or after the configured maximum of captured lines.
    /// Captured lines are joined with single spaces and whitespace-normalized.
    pub fn extract_article(&self, content: &str, article_number: &str) -> Option<String> {
        let (captured, _) = self.capture(content, article_number)?;
        Some(normalize_whitespace(&captured.join(" ")))
    }

    /// Contract A plus a fixed number of trailing lines of surrounding
    /// context, used by context assembly so the excerpt does not end mid
    /// thought.
    pub fn extract_article_with_trailing(
        &self,
        content: &str,
        article_number: &str,
        trailing_lines: usize,
    ) -> Option<String> {
        let (captured, end) = self.capture(content, article_number)?;
        let mut text = normalize_whitespace(&captured.join(" "));

        // Trailing context never crosses into the next article
        let trailing: Vec<&str> = content
            .lines()
            .skip(end)
            .map(|l| l.trim())
            .take_while(|l| !self.article_heading.is_match(l))
            .filter(|l| !l.is_empty())
            .take(trailing_lines)
            .collect();

        if !trailing.is_empty() {
            text.push(' ');
            text.push_str(&normalize_whitespace(&trailing.join(" ")));
        }

        Some(text)
    }

    /// Shared line scanner behind Contract A. Returns the captured lines and
    /// the index of the first line after the capture stopped.
    fn capture<'a>(&self, content: &'a str, article_number: &str) -> Option<(Vec<&'a str>, usize)> {
        let mut captured: Vec<&str> = Vec::new();
        let mut in_article = false;
        let mut end = 0;

        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            end = i + 1;

            if let Some(caps) = self.article_heading.captures(line) {
                if !in_article && &caps[1] == article_number {
                    in_article = true;
                    captured.push(line);
                    continue;
                }
                if in_article {
                    end = i;
                    break;
                }
                continue;
            }

            if in_article {
                if !line.is_empty() {
                    captured.push(line);
                }
                if self.section_marker.is_match(line) {
                    break;
                }
                if captured.len() > self.config.max_article_lines {
                    break;
                }
            }
        }

        if captured.is_empty() {
            return None;
        }

        Some((captured, end))
    }

    /// Lazily produce every article heading in document order.
    ///
    /// The sequence is finite and consumed once per content retrieval; it is
    /// not cached because producing it is cheap relative to the retrieval
    /// itself.
    pub fn all_articles<'a>(&'a self, content: &'a str) -> impl Iterator<Item = Article> + 'a {
        let budget = self.config.snippet_char_budget;
        self.article_global.captures_iter(content).map(move |caps| {
            let number = caps[1].to_string();
            let rest = caps[2].trim();

            let title_snippet = if rest.chars().count() > budget {
                let truncated: String = rest.chars().take(budget).collect();
                format!("Artículo {}°. {}...", number, truncated)
            } else {
                format!("Artículo {}°. {}", number, rest)
            };

            Article {
                anchor_id: format!("art-{}", number),
                number,
                title_snippet,
            }
        })
    }
}
