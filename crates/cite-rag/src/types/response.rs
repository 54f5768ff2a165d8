//! Retrieval and response types

use serde::{Deserialize, Serialize};

use super::document::RecordMetadata;

/// Answer returned when retrieval finds nothing
pub const NO_ANSWER: &str = "I don't know.";

/// A nearest-neighbour match returned by the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    /// Chunk text
    pub text: String,
    /// Source and position of the chunk
    pub metadata: RecordMetadata,
    /// Similarity under the collection's metric (higher is closer)
    pub similarity_score: f32,
}

/// A retrieval hit scored by the reranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankedDocument {
    /// Chunk text
    pub text: String,
    /// Source and position of the chunk
    pub metadata: RecordMetadata,
    /// Similarity from the vector search
    pub similarity_score: f32,
    /// Relevance assigned by the reranker
    pub relevance_score: f32,
    /// Position in the retrieval order (0-based)
    pub retrieval_rank: usize,
}

/// Response from a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// Generated answer, or [`NO_ANSWER`]
    pub answer: String,
    /// `"[i] Source: {...}"` entries in rank order
    pub citations: Vec<String>,
    /// Wall-clock time spent on the query
    pub latency_seconds: f64,
    /// Coarse token count of the answer (words x 2)
    pub token_estimate: u64,
    /// Provider cost when usage is reported, else 0.0
    pub cost_estimate: f64,
}

impl AnswerResponse {
    /// Response for a query whose retrieval returned no hits
    pub fn no_answer(latency_seconds: f64) -> Self {
        Self {
            answer: NO_ANSWER.to_string(),
            citations: Vec::new(),
            latency_seconds,
            token_estimate: 0,
            cost_estimate: 0.0,
        }
    }
}

/// Result of indexing one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOutcome {
    /// Number of chunks written to the vector store
    pub indexed_chunk_count: usize,
}

/// Response from the upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Human-readable status
    pub message: String,
    /// Indexed document id
    pub document_id: String,
    /// Number of chunks written to the vector store
    pub indexed_chunk_count: usize,
}

impl IndexResponse {
    /// Successful indexing response
    pub fn indexed(document_id: String, outcome: IndexOutcome) -> Self {
        Self {
            message: "Document indexed successfully.".to_string(),
            document_id,
            indexed_chunk_count: outcome.indexed_chunk_count,
        }
    }
}

/// Response from the delete endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Deleted document id
    pub document_id: String,
    /// Always `"deleted"`
    pub status: String,
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
