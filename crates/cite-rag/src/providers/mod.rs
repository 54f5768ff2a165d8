//! Provider abstractions for embeddings, vector storage, reranking and generation
//!
//! This module provides trait-based abstractions that allow switching between
//! local (Ollama, in-memory, keyword) and hosted (Qdrant, Cohere, Gemini) backends.

pub mod cohere;
pub mod embedding;
pub mod gemini;
pub mod http;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod qdrant;
pub mod reranker;
pub mod vector_store;

use std::sync::Arc;

use crate::config::{LlmBackend, RagConfig, RerankBackend, VectorBackend};
use crate::error::Result;

pub use cohere::CohereReranker;
pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::{Generation, LlmProvider, TokenUsage};
pub use local::{InMemoryVectorStore, KeywordReranker};
pub use ollama::{OllamaEmbedder, OllamaLlm};
pub use qdrant::QdrantStore;
pub use reranker::RerankProvider;
pub use vector_store::VectorStoreProvider;

/// The set of providers a pipeline is built from
#[derive(Clone)]
pub struct Providers {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub store: Arc<dyn VectorStoreProvider>,
    pub reranker: Arc<dyn RerankProvider>,
    pub llm: Arc<dyn LlmProvider>,
}

impl Providers {
    /// Build the providers selected by the configuration
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let dimensions = config.embeddings.dimensions;

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(&config.embeddings)?);

        let store: Arc<dyn VectorStoreProvider> = match config.vector_db.provider {
            VectorBackend::Qdrant => Arc::new(QdrantStore::new(&config.vector_db, dimensions)?),
            VectorBackend::Memory => Arc::new(InMemoryVectorStore::new(
                dimensions,
                config.vector_db.distance,
            )),
        };

        let reranker: Arc<dyn RerankProvider> = match config.rerank.provider {
            RerankBackend::Cohere => Arc::new(CohereReranker::new(&config.rerank)?),
            RerankBackend::Keyword => Arc::new(KeywordReranker),
        };

        let llm: Arc<dyn LlmProvider> = match config.llm.provider {
            LlmBackend::Gemini => Arc::new(GeminiClient::new(&config.llm)?),
            LlmBackend::Ollama => Arc::new(OllamaLlm::new(&config.llm)?),
        };

        tracing::info!(
            embedder = embedder.name(),
            store = store.name(),
            reranker = reranker.name(),
            llm = llm.name(),
            model = llm.model(),
            "Providers configured"
        );

        Ok(Self {
            embedder,
            store,
            reranker,
            llm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_providers_from_config() {
        let mut config = RagConfig::default();
        config.vector_db.provider = VectorBackend::Memory;
        config.rerank.provider = RerankBackend::Keyword;
        config.llm.provider = LlmBackend::Ollama;

        let providers = Providers::from_config(&config).unwrap();
        assert_eq!(providers.store.name(), "memory");
        assert_eq!(providers.store.dimensions(), 384);
        assert_eq!(providers.reranker.name(), "keyword");
        assert_eq!(providers.llm.name(), "ollama");
        assert_eq!(providers.embedder.dimensions(), 384);
    }

    #[test]
    fn test_cloud_providers_need_keys() {
        let config = RagConfig::default();
        assert!(Providers::from_config(&config).is_err());
    }
}
