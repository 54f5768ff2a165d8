//! Citation formatting
//!
//! Every reranked document gets one citation, in rank order, whether or not
//! the answer refers to it. Inline markers in the answer are not checked
//! against this list.

use crate::error::Result;
use crate::types::{RecordMetadata, RerankedDocument};

/// `"[n] Source: {...}"` with the metadata rendered as compact JSON
pub fn format_citation(number: usize, metadata: &RecordMetadata) -> Result<String> {
    Ok(format!("[{}] Source: {}", number, serde_json::to_string(metadata)?))
}

/// Citations for reranked documents, numbered from 1
pub fn format_citations(documents: &[RerankedDocument]) -> Result<Vec<String>> {
    documents
        .iter()
        .enumerate()
        .map(|(i, d)| format_citation(i + 1, &d.metadata))
        .collect()
}
