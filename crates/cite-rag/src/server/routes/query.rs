//! Query endpoint with RAG and citations

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AnswerResponse, QueryRequest};

/// POST /query - Answer a question from indexed documents
pub async fn query_rag(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>> {
    let Json(request) = payload?;
    let top_k = request.top_k_or(state.default_top_k());
    tracing::info!(top_k, "Query: \"{}\"", request.query);

    let response = state.pipeline().answer_query(&request.query, top_k).await?;
    Ok(Json(response))
}
