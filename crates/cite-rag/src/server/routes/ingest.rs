//! Document upload and deletion endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{DeleteResponse, Document, IndexResponse};

/// POST /upload - Index a document
pub async fn upload_document(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Document>, JsonRejection>,
) -> Result<Json<IndexResponse>> {
    let Json(document) = payload?;
    tracing::info!(document_id = %document.id, bytes = document.text.len(), "Upload");

    let outcome = state.pipeline().index_document(&document).await?;
    Ok(Json(IndexResponse::indexed(document.id, outcome)))
}

/// DELETE /documents/:id - Remove a document's records
pub async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.pipeline().delete_document(&document_id).await?;
    Ok(Json(DeleteResponse {
        document_id,
        status: "deleted".to_string(),
    }))
}
