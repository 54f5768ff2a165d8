//! Cohere rerank client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::RerankConfig;
use crate::error::{Error, ProviderStage, Result};

use super::http::{join_url, HttpClient};
use super::reranker::RerankProvider;

/// Reranker backed by Cohere `/v2/rerank`
pub struct CohereReranker {
    http: HttpClient,
    url: String,
    api_key: String,
    model: String,
}

impl CohereReranker {
    /// Create a new Cohere reranker; the API key is required
    pub fn new(config: &RerankConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config("COHERE_API_KEY is not set"))?;

        Ok(Self {
            http: HttpClient::new("cohere", config.timeout_secs, config.max_retries)?,
            url: join_url(&config.base_url, "v2/rerank"),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankResult>,
}

#[derive(Deserialize)]
struct RerankResult {
    index: usize,
    relevance_score: f32,
}

/// Place scores back at their input positions
fn align_scores(results: Vec<RerankResult>, count: usize) -> Result<Vec<f32>> {
    let mut scores = vec![None; count];
    for result in results {
        let slot = scores.get_mut(result.index).ok_or_else(|| {
            Error::Rerank(format!(
                "cohere returned index {} for {} documents",
                result.index, count
            ))
        })?;
        *slot = Some(result.relevance_score);
    }

    scores
        .into_iter()
        .enumerate()
        .map(|(i, score)| {
            score.ok_or_else(|| Error::Rerank(format!("cohere returned no score for document {}", i)))
        })
        .collect()
}

#[async_trait]
impl RerankProvider for CohereReranker {
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f32>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let request = RerankRequest {
            model: &self.model,
            query,
            documents,
            top_n: documents.len(),
        };

        let response: RerankResponse = self
            .http
            .send_json(ProviderStage::Rerank, |client| {
                client
                    .post(&self.url)
                    .bearer_auth(&self.api_key)
                    .json(&request)
            })
            .await?;

        align_scores(response.results, documents.len())
    }

    fn name(&self) -> &str {
        "cohere"
    }
}
