use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use search_core::{QueryOptions, SearchIndex, UnseenTerms};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Index an XML abstracts corpus in memory and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and run one query against it
    Search {
        /// Corpus path (XML file or directory of XML files)
        #[arg(long)]
        corpus: PathBuf,
        /// Query text
        #[arg(long)]
        query: String,
        /// Maximum number of results to print
        #[arg(long)]
        limit: Option<usize>,
        /// Return nothing when a query term is absent from the corpus
        #[arg(long, default_value_t = false)]
        strict: bool,
        /// Newline-separated stop-word list replacing the built-in one
        #[arg(long)]
        stop_words: Option<PathBuf>,
        /// Print results as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build the index and print document and term counts
    Stats {
        /// Corpus path (XML file or directory of XML files)
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        stop_words: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct JsonHit<'a> {
    doc_id: u32,
    score: f64,
    title: &'a str,
    url: &'a str,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, query, limit, strict, stop_words, json } => {
            let index = build_index(&corpus, stop_words.as_deref())?;
            let options = QueryOptions {
                unseen_terms: if strict { UnseenTerms::Strict } else { UnseenTerms::Skip },
                limit,
            };
            let hits = index.search_with(&query, &options);
            if json {
                let out: Vec<JsonHit> = hits
                    .iter()
                    .map(|h| JsonHit { doc_id: h.document.id, score: h.score, title: &h.document.title, url: &h.document.url })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for hit in &hits {
                    println!("{}", hit.summary());
                }
            }
            tracing::info!(query = %query, hits = hits.len(), "search complete");
            Ok(())
        }
        Commands::Stats { corpus, stop_words } => {
            let index = build_index(&corpus, stop_words.as_deref())?;
            println!("documents: {}", index.len());
            println!("terms: {}", index.term_count());
            Ok(())
        }
    }
}

fn build_index(corpus: &Path, stop_words: Option<&Path>) -> Result<SearchIndex> {
    let index = search_core::corpus::build_index(corpus, stop_words)
        .with_context(|| format!("build index from {}", corpus.display()))?;
    tracing::info!(num_docs = index.len(), num_terms = index.term_count(), "index build complete");
    Ok(index)
}
