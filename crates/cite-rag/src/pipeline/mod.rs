//! Pipeline orchestration: indexing and querying over injected providers

mod indexing;
pub mod metrics;
mod query;

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::{build_tokenizer, TextChunker};
use crate::providers::{
    EmbeddingProvider, LlmProvider, Providers, RerankProvider, VectorStoreProvider,
};

pub use metrics::Pricing;
pub use query::QueryStage;

/// Orchestrates chunking, embedding, storage, reranking and generation.
///
/// Providers are shared read-only; one pipeline serves every request.
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    reranker: Arc<dyn RerankProvider>,
    llm: Arc<dyn LlmProvider>,
    chunker: TextChunker,
    pricing: Pricing,
}

impl RagPipeline {
    /// Assemble a pipeline, rejecting an embedder whose dimension differs
    /// from the store's
    pub fn new(providers: Providers, chunker: TextChunker, pricing: Pricing) -> Result<Self> {
        let expected = providers.store.dimensions();
        let actual = providers.embedder.dimensions();
        if expected != actual {
            return Err(Error::DimensionMismatch { expected, actual });
        }

        Ok(Self {
            embedder: providers.embedder,
            store: providers.store,
            reranker: providers.reranker,
            llm: providers.llm,
            chunker,
            pricing,
        })
    }

    /// Assemble a pipeline with the chunking and pricing settings of `config`
    pub fn from_config(config: &RagConfig, providers: Providers) -> Result<Self> {
        let tokenizer = build_tokenizer(&config.chunking)?;
        let chunker = TextChunker::new(
            tokenizer,
            config.chunking.chunk_size,
            config.chunking.chunk_overlap,
        )?;
        Self::new(providers, chunker, Pricing::from_config(&config.llm))
    }

    /// The vector store
    pub fn store(&self) -> &Arc<dyn VectorStoreProvider> {
        &self.store
    }

    /// The chunker
    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Name and model of the generation provider
    pub fn llm_model(&self) -> (&str, &str) {
        (self.llm.name(), self.llm.model())
    }

    /// Names of the embedding, store and rerank providers
    pub fn provider_names(&self) -> (&str, &str, &str) {
        (self.embedder.name(), self.store.name(), self.reranker.name())
    }
}
