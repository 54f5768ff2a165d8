//! Rerank provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for scoring candidate documents against a query
///
/// Implementations:
/// - `CohereReranker`: Cohere `/v2/rerank`
/// - `KeywordReranker`: local term overlap
#[async_trait]
pub trait RerankProvider: Send + Sync {
    /// Relevance score for every document, aligned positionally with `documents`
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f32>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
