//! API routes for the RAG server

pub mod ingest;
pub mod query;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(ingest::upload_document))
        .route("/documents/:id", delete(ingest::delete_document))
        .route("/query", post(query::query_rag))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let pipeline = state.pipeline();
    let (embedder, store, reranker) = pipeline.provider_names();
    let (llm, model) = pipeline.llm_model();
    let chunker = pipeline.chunker();

    Json(serde_json::json!({
        "name": "cite-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Retrieval-augmented answers with numbered source citations",
        "endpoints": {
            "POST /upload": "Chunk, embed and index a document",
            "POST /query": "Answer a question with citations",
            "DELETE /documents/:id": "Remove a document's records",
            "GET /health": "Liveness check"
        },
        "providers": {
            "embeddings": embedder,
            "vector_store": store,
            "reranker": reranker,
            "llm": llm,
            "model": model
        },
        "chunking": {
            "tokenizer": chunker.tokenizer_name(),
            "chunk_size": chunker.chunk_size(),
            "chunk_overlap": chunker.overlap()
        },
        "default_top_k": state.default_top_k()
    }))
}
