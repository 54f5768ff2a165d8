//! Query request types

use serde::{Deserialize, Serialize};

/// Query request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub query: String,

    /// Number of hits to retrieve; the configured default when absent
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
        }
    }

    /// Set the number of hits to retrieve
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Resolve `top_k` against the configured default
    pub fn top_k_or(&self, default_top_k: usize) -> usize {
        self.top_k.unwrap_or(default_top_k)
    }
}
