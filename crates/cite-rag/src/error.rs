//! Error types for the RAG pipeline

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an external provider call belongs to.
///
/// Used to fold whatever an adapter returned into the error variant of the
/// stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStage {
    Embedding,
    StoreWrite,
    StoreSearch,
    Rerank,
    Generation,
}

/// RAG pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (bad chunk parameters, missing credentials, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding dimension does not match the vector store dimension
    #[error("Dimension mismatch: vector store expects {expected}, embedder produced {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Request rejected before any provider was called
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Embedding provider failure
    #[error("Embedding provider error: {0}")]
    Embedding(String),

    /// Vector store write (upsert/delete) failure
    #[error("Vector store write error: {0}")]
    StoreWrite(String),

    /// Vector store search failure
    #[error("Vector store search error: {0}")]
    StoreSearch(String),

    /// Rerank provider failure
    #[error("Rerank provider error: {0}")]
    Rerank(String),

    /// Generation provider failure
    #[error("Generation provider error: {0}")]
    Generation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create the error variant of a provider stage
    pub fn provider(stage: ProviderStage, message: impl Into<String>) -> Self {
        let message = message.into();
        match stage {
            ProviderStage::Embedding => Self::Embedding(message),
            ProviderStage::StoreWrite => Self::StoreWrite(message),
            ProviderStage::StoreSearch => Self::StoreSearch(message),
            ProviderStage::Rerank => Self::Rerank(message),
            ProviderStage::Generation => Self::Generation(message),
        }
    }

    /// True for errors that indicate a misconfigured deployment rather than a
    /// failing request.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Config(_) | Error::DimensionMismatch { .. })
    }

    /// Re-type an adapter error as a failure of `stage`.
    ///
    /// Configuration errors and errors already carrying the stage's variant
    /// pass through unchanged.
    pub fn at_stage(self, stage: ProviderStage) -> Self {
        if self.is_configuration() {
            return self;
        }
        match (stage, self) {
            (ProviderStage::Embedding, e @ Error::Embedding(_))
            | (ProviderStage::StoreWrite, e @ Error::StoreWrite(_))
            | (ProviderStage::StoreSearch, e @ Error::StoreSearch(_))
            | (ProviderStage::Rerank, e @ Error::Rerank(_))
            | (ProviderStage::Generation, e @ Error::Generation(_)) => e,
            (stage, e) => Error::provider(stage, e.to_string()),
        }
    }

    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::DimensionMismatch { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "dimension_mismatch")
            }
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding_error"),
            Error::StoreWrite(_) => (StatusCode::BAD_GATEWAY, "store_write_error"),
            Error::StoreSearch(_) => (StatusCode::BAD_GATEWAY, "store_search_error"),
            Error::Rerank(_) => (StatusCode::BAD_GATEWAY, "rerank_error"),
            Error::Generation(_) => (StatusCode::SERVICE_UNAVAILABLE, "generation_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        if status.is_server_error() {
            tracing::error!(error_type, "{}", self);
        } else {
            tracing::warn!(error_type, "{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
