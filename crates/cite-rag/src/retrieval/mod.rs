//! Retrieval post-processing

pub mod rerank;

pub use rerank::apply_rerank_scores;
