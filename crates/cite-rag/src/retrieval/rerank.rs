//! Merge reranker scores into retrieval hits

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::types::{RerankedDocument, RetrievalHit};

/// Attach relevance scores to hits and sort by descending relevance.
///
/// The sort is stable, so equal scores keep retrieval order. NaN scores sort
/// after every number.
pub fn apply_rerank_scores(hits: Vec<RetrievalHit>, scores: Vec<f32>) -> Result<Vec<RerankedDocument>> {
    if hits.len() != scores.len() {
        return Err(Error::Rerank(format!(
            "reranker returned {} scores for {} documents",
            scores.len(),
            hits.len()
        )));
    }

    let mut documents: Vec<RerankedDocument> = hits
        .into_iter()
        .zip(scores)
        .enumerate()
        .map(|(rank, (hit, relevance_score))| RerankedDocument {
            text: hit.text,
            metadata: hit.metadata,
            similarity_score: hit.similarity_score,
            relevance_score,
            retrieval_rank: rank,
        })
        .collect();

    documents.sort_by(|a, b| descending(a.relevance_score, b.relevance_score));
    Ok(documents)
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordMetadata;

    fn hits(n: u32) -> Vec<RetrievalHit> {
        (0..n)
            .map(|i| RetrievalHit {
                text: format!("chunk {}", i),
                metadata: RecordMetadata {
                    source: "doc".to_string(),
                    chunk: i,
                },
                similarity_score: 1.0 - i as f32 * 0.1,
            })
            .collect()
    }

    fn ranks(docs: &[RerankedDocument]) -> Vec<usize> {
        docs.iter().map(|d| d.retrieval_rank).collect()
    }

    #[test]
    fn test_sorted_descending() {
        let docs = apply_rerank_scores(hits(4), vec![0.1, 0.9, 0.5, 0.7]).unwrap();
        assert_eq!(ranks(&docs), vec![1, 3, 2, 0]);
        assert!(docs.windows(2).all(|w| w[0].relevance_score >= w[1].relevance_score));
        assert_eq!(docs[0].text, "chunk 1");
        assert_eq!(docs[0].similarity_score, 0.9);
    }

    #[test]
    fn test_ties_keep_retrieval_order() {
        let docs = apply_rerank_scores(hits(5), vec![0.5, 0.8, 0.5, 0.8, 0.5]).unwrap();
        assert_eq!(ranks(&docs), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_nan_sorts_last() {
        let docs = apply_rerank_scores(hits(3), vec![f32::NAN, 0.2, -1.0]).unwrap();
        assert_eq!(ranks(&docs), vec![1, 2, 0]);
    }

    #[test]
    fn test_score_count_mismatch() {
        let err = apply_rerank_scores(hits(3), vec![0.1, 0.2]).unwrap_err();
        assert!(matches!(err, Error::Rerank(_)));
    }

    #[test]
    fn test_empty() {
        assert!(apply_rerank_scores(Vec::new(), Vec::new()).unwrap().is_empty());
    }
}
