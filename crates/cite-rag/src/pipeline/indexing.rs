//! Indexing: chunk, embed in one batch, upsert in one call, prune leftovers

use std::time::Instant;

use crate::error::{Error, ProviderStage, Result};
use crate::types::{Document, IndexOutcome, VectorRecord};

use super::RagPipeline;

impl RagPipeline {
    /// Index a document, replacing any records from a previous upload.
    ///
    /// Nothing is written unless every chunk was embedded with the store's
    /// dimension. Records whose chunk index is beyond the new chunk count are
    /// removed after the upsert.
    pub async fn index_document(&self, doc: &Document) -> Result<IndexOutcome> {
        let start = Instant::now();

        if doc.id.trim().is_empty() {
            return Err(Error::invalid_request("document id must not be empty"));
        }

        let chunks = self.chunker.chunk_document(doc)?;
        if chunks.is_empty() {
            return Err(Error::invalid_request(format!(
                "document '{}' has no text to index",
                doc.id
            )));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self
            .embedder
            .embed(&texts)
            .await
            .map_err(|e| e.at_stage(ProviderStage::Embedding))?;

        if vectors.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "{} returned {} vectors for {} chunks",
                self.embedder.name(),
                vectors.len(),
                chunks.len()
            )));
        }
        let expected = self.store.dimensions();
        if let Some(vector) = vectors.iter().find(|v| v.len() != expected) {
            return Err(Error::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }

        let chunk_count = chunks.len();
        let records: Vec<VectorRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| VectorRecord::from_chunk(chunk, vector, &doc.metadata))
            .collect();

        self.store
            .upsert(records)
            .await
            .map_err(|e| e.at_stage(ProviderStage::StoreWrite))?;

        self.store
            .delete_document(&doc.id, chunk_count as u32)
            .await
            .map_err(|e| e.at_stage(ProviderStage::StoreWrite))?;

        tracing::info!(
            document_id = %doc.id,
            chunks = chunk_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Indexed document"
        );

        Ok(IndexOutcome {
            indexed_chunk_count: chunk_count,
        })
    }

    /// Remove every record of a document
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        if document_id.trim().is_empty() {
            return Err(Error::invalid_request("document id must not be empty"));
        }

        self.store
            .delete_document(document_id, 0)
            .await
            .map_err(|e| e.at_stage(ProviderStage::StoreWrite))?;

        tracing::info!(document_id, "Deleted document");
        Ok(())
    }
}
