//! # Generation Boundary Module
//!
//! ## Purpose
//! Collaborator interfaces consumed by the engine but implemented elsewhere:
//! the canonical metadata store that overrides heuristic titles, and the text
//! generation service that turns assembled context into natural language.
//!
//! ## Input/Output Specification
//! - **Input**: Document identifiers (canonical lookup); system instruction,
//!   context and query (generation)
//! - **Output**: Authoritative `{type, title}` pairs; opaque generated text
//!
//! The engine never inspects or validates generated text. It pairs the opaque
//! result with the source list it computed itself, so attribution never
//! depends on the generator.

use crate::errors::Result;
use crate::DocType;
use async_trait::async_trait;
use serde::Serialize;

/// Authoritative metadata for one document
#[derive(Debug, Clone)]
pub struct CanonicalRecord {
    pub doc_type: DocType,
    pub title: String,
}

/// Canonical metadata store boundary.
///
/// When a lookup succeeds, the canonical title is preferred over the
/// heuristically extracted one; otherwise the engine falls back to its own
/// extraction.
pub trait CanonicalMetadataStore: Send + Sync {
    fn lookup(&self, document_id: &str) -> Option<CanonicalRecord>;
}

/// Text generation service boundary.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce natural-language text for the query grounded in the assembled
    /// context. The result is treated as opaque by the caller.
    async fn generate(&self, system_instruction: &str, context: &str, query: &str)
        -> Result<String>;
}

/// Generated text paired with the engine-computed source list
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedAnswer {
    /// Opaque generator output
    pub text: String,
    /// Identifiers of the documents whose excerpts formed the context
    pub sources: Vec<String>,
}

/// System instruction handed to the generator alongside every request.
///
/// Grounding and citation rules: answers must come from the supplied context
/// only, with explicit article/source citations.
pub const SYSTEM_INSTRUCTION: &str = "\
Eres un asistente legal especializado en normativa colombiana. \
Responde únicamente con base en el contexto legal suministrado, de manera \
precisa y profesional. Cita siempre la fuente específica (Artículo X, Ley Y \
de Z). Si el contexto no contiene la información, indica que no encontraste \
información específica sobre el tema en la normativa disponible.";

/// Builds the user-facing prompt for the generation service.
///
/// Implementations of [`TextGenerator`] that talk to chat-style completion
/// APIs combine the context and query they receive with this builder.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Combine assembled context and query into the generation prompt.
    pub fn build(context: &str, query: &str) -> String {
        format!(
            "CONTEXTO LEGAL:\n{}\n\nPREGUNTA: {}\n\nResponde de manera clara y cita los artículos o secciones relevantes.",
            context.trim(),
            query.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_context_and_query() {
        let prompt = PromptBuilder::build("--- Ley 1581 de 2012 ---\ntexto", "¿qué es un dato?");
        assert!(prompt.starts_with("CONTEXTO LEGAL:"));
        assert!(prompt.contains("Ley 1581 de 2012"));
        assert!(prompt.contains("PREGUNTA: ¿qué es un dato?"));
    }
}
