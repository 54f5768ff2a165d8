//! RAG Server binary
//!
//! Run with: cargo run -p cite-rag --bin cite-rag-server -- --config rag.toml

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cite_rag::providers::VectorStoreProvider;
use cite_rag::{config::RagConfig, server::RagServer, Providers, RagPipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cite-rag-server", version, about = "RAG server with cited answers")]
struct Args {
    /// TOML configuration file (defaults to ./rag.toml when present)
    #[arg(short, long, env = "RAG_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cite_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = RagConfig::load(args.config.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - Collection: {}", config.vector_db.collection);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!(
        "  - Chunking: {} tokens, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let providers = Providers::from_config(&config)?;
    providers.store.ensure_collection().await?;

    let pipeline = Arc::new(RagPipeline::from_config(&config, providers)?);
    let server = RagServer::new(&config, pipeline)?;

    tracing::info!("Health: http://{}/health", server.address());
    server.start().await?;

    Ok(())
}
