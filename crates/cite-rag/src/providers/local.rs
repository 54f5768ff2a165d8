//! Local provider implementations: an in-process vector store and a
//! term-overlap reranker

use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Ordering;
use std::collections::HashSet;
use uuid::Uuid;

use crate::config::DistanceMetric;
use crate::error::{Error, Result};
use crate::types::{RetrievalHit, VectorRecord};

use super::reranker::RerankProvider;
use super::vector_store::VectorStoreProvider;

/// Process-local vector store with exact search.
///
/// Records are lost on restart. Scores follow the "higher is closer"
/// convention: Euclid distance is reported negated.
pub struct InMemoryVectorStore {
    records: DashMap<Uuid, VectorRecord>,
    dimensions: usize,
    distance: DistanceMetric,
}

impl InMemoryVectorStore {
    /// Create an empty store
    pub fn new(dimensions: usize, distance: DistanceMetric) -> Self {
        Self {
            records: DashMap::new(),
            dimensions,
            distance,
        }
    }

    /// Stored record by id
    pub fn get(&self, id: &Uuid) -> Option<VectorRecord> {
        self.records.get(id).map(|r| r.value().clone())
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.distance {
            DistanceMetric::Cosine => cosine_similarity(a, b),
            DistanceMetric::Dot => dot(a, b),
            DistanceMetric::Euclid => -euclidean_distance(a, b),
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm = dot(a, a).sqrt() * dot(b, b).sqrt();
    if norm == 0.0 {
        0.0
    } else {
        dot(a, b) / norm
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn ensure_collection(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()> {
        for record in &records {
            self.check_dimensions(&record.vector)?;
        }
        for record in records {
            self.records.insert(record.id, record);
        }
        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievalHit>> {
        self.check_dimensions(query)?;

        let mut scored: Vec<(f32, Uuid, RetrievalHit)> = self
            .records
            .iter()
            .map(|entry| {
                let record = entry.value();
                let score = self.score(query, &record.vector);
                let hit = RetrievalHit {
                    text: record.payload.text.clone(),
                    metadata: record.payload.metadata.clone(),
                    similarity_score: score,
                };
                (score, record.id, hit)
            })
            .collect();

        // Id as secondary key keeps equal scores in a fixed order.
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });

        Ok(scored.into_iter().take(top_k).map(|(_, _, hit)| hit).collect())
    }

    async fn delete_document(&self, document_id: &str, from_sequence: u32) -> Result<()> {
        self.records.retain(|_, record| {
            let meta = &record.payload.metadata;
            !(meta.source == document_id && meta.chunk >= from_sequence)
        });
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Reranker scoring the fraction of query terms present in each document
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordReranker;

impl KeywordReranker {
    fn terms(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect()
    }

    /// Overlap score in `[0, 1]`
    pub fn score(query: &str, document: &str) -> f32 {
        let query_terms = Self::terms(query);
        if query_terms.is_empty() {
            return 0.0;
        }
        let document_terms = Self::terms(document);
        let overlap = query_terms.intersection(&document_terms).count() as f32;
        overlap / query_terms.len() as f32
    }
}

#[async_trait]
impl RerankProvider for KeywordReranker {
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f32>> {
        Ok(documents.iter().map(|d| Self::score(query, d)).collect())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
