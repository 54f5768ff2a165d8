//! cite-rag: retrieval-augmented answers with source citations
//!
//! Documents are split into overlapping token windows, embedded in one batch
//! and upserted under deterministic ids. Queries are embedded, matched against
//! the vector store, reranked and answered by a generative model whose answer
//! comes back with one citation per reranked chunk.
//!
//! Every external system sits behind a trait in [`providers`] and is injected
//! into [`pipeline::RagPipeline`].

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, ProviderStage, Result};
pub use pipeline::RagPipeline;
pub use providers::Providers;
pub use types::{
    AnswerResponse, Chunk, Document, IndexOutcome, QueryRequest, RerankedDocument, RetrievalHit,
    VectorRecord,
};
