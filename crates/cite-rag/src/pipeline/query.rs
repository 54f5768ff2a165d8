//! Querying: embed, retrieve, rerank, prompt, generate, cite

use std::fmt;
use std::time::Instant;

use crate::error::{Error, ProviderStage, Result};
use crate::generation::{format_citations, PromptBuilder};
use crate::retrieval::apply_rerank_scores;
use crate::types::AnswerResponse;

use super::metrics::{round_latency, token_estimate};
use super::RagPipeline;

/// Stages a query moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Embedding,
    Retrieving,
    /// Retrieval found nothing; answered without reranking or generation
    EmptyShortCircuit,
    Reranking,
    PromptBuilding,
    Generating,
    Completed,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryStage::Embedding => "embedding",
            QueryStage::Retrieving => "retrieving",
            QueryStage::EmptyShortCircuit => "empty_short_circuit",
            QueryStage::Reranking => "reranking",
            QueryStage::PromptBuilding => "prompt_building",
            QueryStage::Generating => "generating",
            QueryStage::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Logs stage transitions with the time spent so far
struct QueryTrace {
    start: Instant,
}

impl QueryTrace {
    fn enter(&self, stage: QueryStage) {
        tracing::debug!(
            %stage,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            "Query stage"
        );
    }
}

impl RagPipeline {
    /// Answer `query` from the `top_k` nearest chunks.
    ///
    /// Any provider failure ends the query with that stage's error; no
    /// fallback answer is produced.
    pub async fn answer_query(&self, query: &str, top_k: usize) -> Result<AnswerResponse> {
        if query.trim().is_empty() {
            return Err(Error::invalid_request("query must not be empty"));
        }
        if top_k == 0 {
            return Err(Error::invalid_request("top_k must be greater than 0"));
        }

        let trace = QueryTrace {
            start: Instant::now(),
        };

        trace.enter(QueryStage::Embedding);
        let vector = self
            .embedder
            .embed_one(query)
            .await
            .map_err(|e| e.at_stage(ProviderStage::Embedding))?;
        let expected = self.store.dimensions();
        if vector.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }

        trace.enter(QueryStage::Retrieving);
        let hits = self
            .store
            .search(&vector, top_k)
            .await
            .map_err(|e| e.at_stage(ProviderStage::StoreSearch))?;

        if hits.is_empty() {
            trace.enter(QueryStage::EmptyShortCircuit);
            return Ok(AnswerResponse::no_answer(round_latency(trace.start.elapsed())));
        }

        trace.enter(QueryStage::Reranking);
        let texts: Vec<String> = hits.iter().map(|h| h.text.clone()).collect();
        let scores = self
            .reranker
            .rerank(query, &texts)
            .await
            .map_err(|e| e.at_stage(ProviderStage::Rerank))?;
        let documents = apply_rerank_scores(hits, scores)?;

        trace.enter(QueryStage::PromptBuilding);
        let context = PromptBuilder::build_context(&documents);
        let prompt = PromptBuilder::build_rag_prompt(query, &context);

        trace.enter(QueryStage::Generating);
        let generation = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| e.at_stage(ProviderStage::Generation))?;
        let answer = generation.text.trim().to_string();
        let citations = format_citations(&documents)?;

        trace.enter(QueryStage::Completed);
        let response = AnswerResponse {
            token_estimate: token_estimate(&answer),
            cost_estimate: self.pricing.cost(generation.usage),
            latency_seconds: round_latency(trace.start.elapsed()),
            answer,
            citations,
        };

        tracing::info!(
            hits = documents.len(),
            latency_seconds = response.latency_seconds,
            "Answered query"
        );

        Ok(response)
    }
}
