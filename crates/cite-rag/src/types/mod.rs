//! Core data types for the RAG pipeline

pub mod document;
pub mod query;
pub mod response;

pub use document::{record_id, Chunk, Document, RecordMetadata, RecordPayload, VectorRecord};
pub use query::QueryRequest;
pub use response::{
    AnswerResponse, DeleteResponse, HealthResponse, IndexOutcome, IndexResponse,
    RerankedDocument, RetrievalHit, NO_ANSWER,
};
