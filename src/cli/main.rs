//! Batch job: (re)build the posts index and load the document corpus.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use post_search::config::Config;
use post_search::search::{read_corpus, BulkLoader, EngineClient, IndexManager};

#[derive(Parser)]
#[command(name = "post-search-loader")]
#[command(about = "Rebuild the posts index and load the corpus", long_about = None)]
struct Cli {
    /// Delete and recreate the index before loading, even if it already
    /// exists
    #[arg(short, long)]
    recreate: bool,

    /// Path to the JSON corpus file
    #[arg(short, long, env = "POST_SEARCH_CORPUS", default_value = "data/posts.json")]
    data: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "post_search=info,post_search_loader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        tracing::error!("Index load failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    // One engine handle spans the whole job and is released on every path.
    let client = EngineClient::connect(&config.engine, &config.search.index)?;

    let manager = IndexManager::new(&client, &config.search);
    if cli.recreate {
        manager.recreate().await?;
    } else {
        manager.ensure_exists().await?;
    }

    let records = read_corpus(&cli.data)
        .with_context(|| format!("reading corpus from {}", cli.data.display()))?;
    tracing::info!(records = records.len(), corpus = %cli.data.display(), "Corpus loaded");

    let loader = BulkLoader::new(&client);
    let report = loader.load(records).await?;
    tracing::info!(
        took_ms = report.took_ms,
        "{} posts have been indexed",
        report.submitted
    );

    Ok(())
}
