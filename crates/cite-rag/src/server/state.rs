//! Application state for the RAG server

use std::sync::Arc;

use crate::pipeline::RagPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Pipeline shared by every request
    pipeline: Arc<RagPipeline>,
    /// `top_k` used when a query does not set one
    default_top_k: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(pipeline: Arc<RagPipeline>, default_top_k: usize) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pipeline,
                default_top_k,
            }),
        }
    }

    /// The pipeline
    pub fn pipeline(&self) -> &RagPipeline {
        &self.inner.pipeline
    }

    /// Default number of hits per query
    pub fn default_top_k(&self) -> usize {
        self.inner.default_top_k
    }
}
