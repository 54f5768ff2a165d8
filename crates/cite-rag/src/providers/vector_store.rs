//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RetrievalHit, VectorRecord};

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `QdrantStore`: Qdrant REST API
/// - `InMemoryVectorStore`: process-local map, for development and tests
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Make sure the collection exists with the configured dimension and metric
    async fn ensure_collection(&self) -> Result<()>;

    /// Insert or replace records by id, all in one call
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()>;

    /// Nearest records to `query`, by decreasing similarity
    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievalHit>>;

    /// Delete records of `document_id` whose chunk index is `>= from_sequence`
    async fn delete_document(&self, document_id: &str, from_sequence: u32) -> Result<()>;

    /// Get total number of records stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Vector dimension of the collection
    fn dimensions(&self) -> usize;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
