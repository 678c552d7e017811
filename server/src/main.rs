use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use server::{build_app, load_index};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Corpus path (XML file or directory of XML files)
    #[arg(long, default_value = "./data/abstracts.xml")]
    corpus: PathBuf,
    /// Newline-separated stop-word list replacing the built-in one
    #[arg(long)]
    stop_words: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let index = load_index(&args.corpus, args.stop_words.as_deref())?;
    tracing::info!(num_docs = index.len(), num_terms = index.term_count(), "index ready");
    let app: Router = build_app(index);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
