//! Document, chunk and vector record types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Namespace for deterministic vector record ids
const RECORD_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6f, 0x1c, 0x2a, 0x94, 0x3b, 0x5e, 0x4d, 0x0a, 0x9c, 0x71, 0xe2, 0x58, 0xb0, 0x3d, 0x17, 0xc6,
]);

/// Deterministic vector record id for a chunk position.
///
/// The same `(document_id, sequence_index)` always yields the same id, so
/// re-uploading a document overwrites its records instead of duplicating them.
pub fn record_id(document_id: &str, sequence_index: u32) -> Uuid {
    Uuid::new_v5(
        &RECORD_NAMESPACE,
        format!("{}:{}", document_id, sequence_index).as_bytes(),
    )
}

/// A document submitted for indexing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Caller-chosen document id
    pub id: String,
    /// Raw text
    pub text: String,
    /// Free-form metadata attached by the caller
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a document without metadata
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A token window of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Deterministic id, see [`record_id`]
    pub chunk_id: Uuid,
    /// Id of the document the chunk was cut from
    pub source_document_id: String,
    /// Position of the window within the document
    pub sequence_index: u32,
    /// Detokenized window text
    pub text: String,
}

impl Chunk {
    /// Create a chunk, deriving its id from the document id and position
    pub fn new(source_document_id: impl Into<String>, sequence_index: u32, text: String) -> Self {
        let source_document_id = source_document_id.into();
        Self {
            chunk_id: record_id(&source_document_id, sequence_index),
            source_document_id,
            sequence_index,
            text,
        }
    }

    /// Metadata stored with the chunk's vector and echoed in citations
    pub fn record_metadata(&self) -> RecordMetadata {
        RecordMetadata {
            source: self.source_document_id.clone(),
            chunk: self.sequence_index,
        }
    }
}

/// Citation metadata of a vector record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Source document id
    pub source: String,
    /// Chunk sequence index within the source document
    pub chunk: u32,
}

/// Payload stored next to a vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    /// Chunk text
    pub text: String,
    /// Source and position of the chunk
    pub metadata: RecordMetadata,
    /// Metadata of the source document (not part of citations)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub document_metadata: HashMap<String, serde_json::Value>,
}

/// A vector with its payload, one per chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Deterministic record id
    pub id: Uuid,
    /// Embedding
    pub vector: Vec<f32>,
    /// Stored payload
    pub payload: RecordPayload,
}

impl VectorRecord {
    /// Build the record for an embedded chunk
    pub fn from_chunk(
        chunk: Chunk,
        vector: Vec<f32>,
        document_metadata: &HashMap<String, serde_json::Value>,
    ) -> Self {
        let metadata = chunk.record_metadata();
        Self {
            id: chunk.chunk_id,
            vector,
            payload: RecordPayload {
                text: chunk.text,
                metadata,
                document_metadata: document_metadata.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_is_deterministic() {
        assert_eq!(record_id("doc1", 0), record_id("doc1", 0));
        assert_ne!(record_id("doc1", 0), record_id("doc1", 1));
        assert_ne!(record_id("doc1", 1), record_id("doc11", 0));
    }

    #[test]
    fn test_chunk_id_reconstructible() {
        let chunk = Chunk::new("doc1", 3, "text".to_string());
        assert_eq!(
            chunk.chunk_id,
            record_id(&chunk.source_document_id, chunk.sequence_index)
        );
    }

    #[test]
    fn test_payload_shape() {
        let doc = Document::new("doc1", "x").with_metadata("lang", serde_json::json!("en"));
        let chunk = Chunk::new(&doc.id, 0, "Paris is the capital of France.".to_string());
        let record = VectorRecord::from_chunk(chunk, vec![0.1, 0.2], &doc.metadata);

        let payload = serde_json::to_value(&record.payload).unwrap();
        assert_eq!(payload["text"], "Paris is the capital of France.");
        assert_eq!(payload["metadata"]["source"], "doc1");
        assert_eq!(payload["metadata"]["chunk"], 0);
        assert_eq!(payload["document_metadata"]["lang"], "en");
    }
}
