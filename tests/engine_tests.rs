//! End-to-end tests over a real on-disk corpus.
//!
//! Each test builds its own corpus tree in a temp directory, mirroring the
//! production layout of per-type folders of plain-text documents.

use legal_corpus_search::config::Config;
use legal_corpus_search::engine::CorpusEngine;
use legal_corpus_search::index::DocumentFilter;
use legal_corpus_search::{DocType, EngineError};
use std::fs;
use std::path::Path;

fn engine_for(root: &Path) -> CorpusEngine {
    let mut config = Config::default();
    config.corpus.root_path = root.to_path_buf();
    CorpusEngine::new(config).expect("engine construction")
}

/// Corpus with one document per folder plus an undecodable file.
fn write_full_corpus(root: &Path) {
    for folder in ["leyes", "decretos", "circulares", "resoluciones", "conpes", "otros"] {
        fs::create_dir_all(root.join(folder)).unwrap();
    }

    fs::write(
        root.join("leyes/ley_1581_2012.txt"),
        "\
LEY 1581 DE 2012

Por la cual se dictan disposiciones generales para la protección de datos personales.

Artículo 15. Reclamos. El Titular o sus causahabientes que consideren que la
información contenida en una base de datos debe ser objeto de corrección,
podrán presentar un reclamo ante el Responsable del Tratamiento.

Artículo 16. Requisitos. Sin perjuicio de lo anterior.
",
    )
    .unwrap();

    fs::write(
        root.join("decretos/decreto_1377_2013.txt"),
        "\
DECRETO 1377 DE 2013

Por el cual se reglamenta parcialmente la Ley 1581 de 2012.

Artículo 1. Objeto. El presente Decreto tiene como objeto reglamentar
parcialmente la Ley 1581 de 2012.
",
    )
    .unwrap();

    fs::write(
        root.join("circulares/circular_externa_002_2015.txt"),
        "CIRCULAR EXTERNA 002 DE 2015\nInstrucciones sobre videovigilancia.\n",
    )
    .unwrap();

    fs::write(
        root.join("resoluciones/resolucion_76434_2012.txt"),
        "76434 del 30 de octubre de 2012\nPor la cual se decide una actuación administrativa.\n",
    )
    .unwrap();

    fs::write(
        root.join("conpes/conpes_3995_2020.txt"),
        "Documento\nCONPES\n\n3995\nPolítica nacional de confianza y seguridad digital.\n",
    )
    .unwrap();

    fs::write(root.join("otros/corrupto_sin_fecha.txt"), [0xffu8, 0xfe, 0x00]).unwrap();
}

#[test]
fn scan_assigns_types_from_folders_only() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let documents = engine.list_documents(&DocumentFilter::default()).unwrap();
    assert_eq!(documents.len(), 6);

    for doc in &documents {
        let expected = DocType::ALL
            .iter()
            .copied()
            .find(|t| doc.path.parent().unwrap().ends_with(t.folder()))
            .unwrap();
        assert_eq!(doc.doc_type, expected, "document {}", doc.id);
    }
}

#[test]
fn undecodable_file_is_counted_not_dropped() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let documents = engine.list_documents(&DocumentFilter::default()).unwrap();
    let corrupt = documents
        .iter()
        .find(|d| d.id == "corrupto_sin_fecha")
        .expect("error document retained");
    assert!(corrupt.title.starts_with("Error:"));

    let stats = engine.corpus_stats().unwrap();
    assert_eq!(stats.total, 6);
}

#[test]
fn title_pair_takes_precedence_over_filename_pair() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("leyes")).unwrap();
    // Filename carries a different number/year pair than the title
    fs::write(
        dir.path().join("leyes/ley_9999_2020.txt"),
        "LEY 1581 DE 2012\nTexto.",
    )
    .unwrap();

    let engine = engine_for(dir.path());
    let documents = engine.list_documents(&DocumentFilter::default()).unwrap();

    assert_eq!(documents[0].number, "1581");
    assert_eq!(documents[0].year, 2012);
}

#[test]
fn scan_is_idempotent_with_warm_cache() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let first = engine.list_documents(&DocumentFilter::default()).unwrap();
    let second = engine.list_documents(&DocumentFilter::default()).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.title, b.title);
        assert_eq!(a.number, b.number);
        assert_eq!(a.year, b.year);
        assert_eq!(a.doc_type, b.doc_type);
    }
}

#[test]
fn decree_query_ranks_the_decree_first_with_expected_floor() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let outcome = engine.query("decreto 1377").unwrap();
    let top = &outcome.ranked_sources[0];

    assert_eq!(top.document.id, "decreto_1377_2013");
    // number-in-filename (80) + type-match boost (60)
    assert!(top.score >= 140, "score was {}", top.score);
    assert!(!top.matched_factors.is_empty());
}

#[test]
fn sub_threshold_documents_never_appear() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    // "videovigilancia" appears only in the circular's content: 5 points,
    // below the threshold of 30, so even that document is dropped.
    let err = engine.query("videovigilancia biométrica").unwrap_err();
    assert!(matches!(err, EngineError::NoRelevantDocuments { .. }));
}

#[test]
fn short_query_rejected_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let err = engine.query(" a ").unwrap_err();
    assert!(matches!(err, EngineError::EmptyQuery { .. }));
    assert_eq!(engine.cached_entries(), 0);
}

#[test]
fn article_query_assembles_exact_article_context() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let outcome = engine.query("artículo 15 ley 1581").unwrap();

    assert!(outcome.assembled_context.contains("Artículo 15. Reclamos."));
    // The excerpt for the law is bounded strictly before Artículo 16
    let law_block = outcome
        .assembled_context
        .split("--- Ley 1581 de 2012 ---")
        .nth(1)
        .expect("law block present")
        .split("\n\n---")
        .next()
        .unwrap();
    assert!(!law_block.contains("Requisitos"));
}

#[test]
fn specific_article_lookup_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let body = engine.get_article("ley_1581_2012", "15").unwrap();
    assert!(body.starts_with("Artículo 15."));
    assert!(!body.contains("Artículo 16"));

    assert!(engine.get_article("ley_1581_2012", "99").is_none());
    assert!(engine.get_article("nonexistent_id", "1").is_none());
}

#[test]
fn content_lookup_miss_is_a_value_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let response = engine.get_document_content("nonexistent_id").unwrap();
    assert!(response.is_none());
    assert_eq!(engine.cached_entries(), 0);
}

#[test]
fn content_response_carries_article_navigation() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let response = engine
        .get_document_content("ley_1581_2012")
        .unwrap()
        .expect("document exists");

    let anchors: Vec<&str> = response.articles.iter().map(|a| a.anchor_id.as_str()).collect();
    assert_eq!(anchors, vec!["art-15", "art-16"]);
    assert!(response.word_count > 0);
}

#[test]
fn listing_filters_compose() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let laws_2012 = engine
        .list_documents(&DocumentFilter {
            doc_type: Some(DocType::Law),
            year: Some(2012),
            title_substring: Some("protección".to_string()),
        })
        .unwrap();
    assert_eq!(laws_2012.len(), 0);

    let laws = engine
        .list_documents(&DocumentFilter {
            doc_type: Some(DocType::Law),
            year: Some(2012),
            title_substring: Some("1581".to_string()),
        })
        .unwrap();
    assert_eq!(laws.len(), 1);
    assert_eq!(laws[0].id, "ley_1581_2012");
}

#[test]
fn stats_group_by_type_and_year() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    let stats = engine.corpus_stats().unwrap();
    assert_eq!(stats.total, 6);
    assert_eq!(stats.by_type.get("Ley"), Some(&1));
    assert_eq!(stats.by_type.get("Decreto"), Some(&1));
    // The corrupt document has no year and stays out of by_year
    let yearly: usize = stats.by_year.values().sum();
    assert_eq!(yearly, 5);
}

#[test]
fn cache_clear_forces_recomputation() {
    let dir = tempfile::tempdir().unwrap();
    write_full_corpus(dir.path());
    let engine = engine_for(dir.path());

    engine.list_documents(&DocumentFilter::default()).unwrap();
    assert!(engine.cached_entries() > 0);

    engine.clear_cache();
    assert_eq!(engine.cached_entries(), 0);

    let documents = engine.list_documents(&DocumentFilter::default()).unwrap();
    assert_eq!(documents.len(), 6);
}
