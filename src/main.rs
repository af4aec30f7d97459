//! # Legal Corpus CLI Driver
//!
//! ## Purpose
//! Command-line entry point for the corpus engine: scans the corpus, prints
//! statistics, resolves documents and runs ranked queries against the index.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file, command line arguments, environment variables
//! - **Output**: Document listings, statistics and query results on stdout
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Wire up the corpus engine
//! 4. Execute the requested subcommand

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use tracing::info;

use legal_corpus_search::{
    config::Config,
    engine::CorpusEngine,
    index::DocumentFilter,
    DocType, EngineError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("legal-corpus-cli")
        .version("0.1.0")
        .author("Legal Search Team")
        .about("File-backed legal corpus index with heuristic extraction and relevance ranking")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml")
                .global(true),
        )
        .arg(
            Arg::new("corpus-root")
                .long("corpus-root")
                .value_name("DIR")
                .help("Override the corpus root directory")
                .global(true),
        )
        .subcommand(
            Command::new("scan").about("Scan the corpus and list documents").arg(
                Arg::new("type")
                    .long("type")
                    .value_name("TYPE")
                    .help("Filter by document type (folder or label)"),
            ),
        )
        .subcommand(Command::new("stats").about("Print corpus statistics"))
        .subcommand(
            Command::new("query")
                .about("Run a ranked query against the corpus")
                .arg(Arg::new("text").required(true).num_args(1..))
                .arg(
                    Arg::new("context")
                        .long("context")
                        .help("Print the assembled context")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Resolve a document identifier to its content")
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("article")
                        .long("article")
                        .value_name("N")
                        .help("Show only this article"),
                )
                .arg(
                    Arg::new("preview")
                        .long("preview")
                        .help("Show a short cleaned preview instead of the full text")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand_required(true)
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").expect("has default");
    let mut config = Config::from_file(config_path)?;

    if let Some(root) = matches.get_one::<String>("corpus-root") {
        config.corpus.root_path = root.into();
    }

    init_logging(&config)?;
    info!(config = %config_path, corpus = %config.corpus.root_path.display(), "starting");

    let engine = CorpusEngine::new(config)?;

    match matches.subcommand() {
        Some(("scan", sub)) => {
            let filter = DocumentFilter {
                doc_type: sub
                    .get_one::<String>("type")
                    .map(|t| {
                        DocType::parse(t)
                            .with_context(|| format!("unknown document type: {}", t))
                    })
                    .transpose()?,
                ..Default::default()
            };
            let documents = engine.list_documents(&filter)?;
            for doc in &documents {
                println!(
                    "{:<40} {:<12} {:>6} {:>4}  {}",
                    doc.id,
                    doc.doc_type.label(),
                    doc.number,
                    doc.year,
                    doc.title
                );
            }
            println!("{} documents", documents.len());
        }
        Some(("stats", _)) => {
            let stats = engine.corpus_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Some(("query", sub)) => {
            let text = sub
                .get_many::<String>("text")
                .expect("required")
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");

            match engine.query(&text) {
                Ok(outcome) => {
                    for scored in &outcome.ranked_sources {
                        println!("{:>5}  {}", scored.score, scored.document.header());
                        for factor in &scored.matched_factors {
                            println!("       - {}", factor);
                        }
                    }
                    if sub.get_flag("context") {
                        println!("{}", outcome.assembled_context);
                    }
                }
                Err(err @ EngineError::EmptyQuery { .. })
                | Err(err @ EngineError::NoRelevantDocuments { .. }) => {
                    println!("{}", err);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Some(("show", sub)) => {
            let id = sub.get_one::<String>("id").expect("required");

            if sub.get_flag("preview") {
                match engine.get_document_preview(id) {
                    Some(preview) => println!("{}", preview),
                    None => println!("document not found: {}", id),
                }
            } else {
                match sub.get_one::<String>("article") {
                    Some(number) => match engine.get_article(id, number) {
                        Some(body) => println!("{}", body),
                        None => println!("article {} not found in {}", number, id),
                    },
                    None => match engine.get_document_content(id)? {
                        Some(response) => {
                            println!("{} ({} words)", response.document.title, response.word_count);
                            for article in &response.articles {
                                println!("  {}", article.title_snippet);
                            }
                        }
                        None => println!("document not found: {}", id),
                    },
                }
            }
        }
        _ => unreachable!("subcommand required"),
    }

    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    Ok(())
}
