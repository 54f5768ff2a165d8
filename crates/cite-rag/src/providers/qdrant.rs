//! Qdrant vector store over the REST API

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::{DistanceMetric, VectorDbConfig};
use crate::error::{Error, ProviderStage, Result};
use crate::types::{RecordPayload, RetrievalHit, VectorRecord};

use super::http::{join_url, HttpClient};
use super::vector_store::VectorStoreProvider;

/// Vector store backed by a Qdrant collection
pub struct QdrantStore {
    http: HttpClient,
    collection_url: String,
    api_key: Option<String>,
    collection: String,
    dimensions: usize,
    distance: DistanceMetric,
    recreate_on_start: bool,
}

#[derive(Serialize)]
struct Point<'a> {
    id: Uuid,
    vector: &'a [f32],
    payload: &'a RecordPayload,
}

#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct CollectionInfo {
    config: CollectionConfig,
}

#[derive(Deserialize)]
struct CollectionConfig {
    params: CollectionParams,
}

#[derive(Deserialize)]
struct CollectionParams {
    vectors: Value,
}

#[derive(Deserialize)]
struct VectorParams {
    size: usize,
    distance: String,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    payload: Option<RecordPayload>,
}

#[derive(Deserialize)]
struct CountResult {
    count: usize,
}

impl QdrantStore {
    /// Create a store for the configured collection.
    ///
    /// `dimensions` comes from the embedding configuration so the collection
    /// and the embedder can never disagree silently.
    pub fn new(config: &VectorDbConfig, dimensions: usize) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("qdrant", config.timeout_secs, config.max_retries)?,
            collection_url: join_url(&config.url, &format!("collections/{}", config.collection)),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
            dimensions,
            distance: config.distance,
            recreate_on_start: config.recreate_on_start,
        })
    }

    fn request(&self, client: &Client, method: Method, path: &str) -> RequestBuilder {
        let url = if path.is_empty() {
            self.collection_url.clone()
        } else {
            join_url(&self.collection_url, path)
        };
        let builder = client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    async fn create_collection(&self) -> Result<()> {
        let body = json!({
            "vectors": {
                "size": self.dimensions,
                "distance": self.distance.as_str(),
            }
        });
        let _: QdrantResponse<Value> = self
            .http
            .send_json(ProviderStage::StoreWrite, |client| {
                self.request(client, Method::PUT, "").json(&body)
            })
            .await?;

        tracing::info!(
            collection = %self.collection,
            dimensions = self.dimensions,
            distance = self.distance.as_str(),
            "Created Qdrant collection"
        );
        Ok(())
    }

    async fn drop_collection(&self) -> Result<()> {
        let response = self
            .http
            .send(ProviderStage::StoreWrite, |client| {
                self.request(client, Method::DELETE, "")
            })
            .await?;
        if response.status() != StatusCode::NOT_FOUND {
            self.http.check_status(ProviderStage::StoreWrite, response).await?;
        }
        Ok(())
    }

    /// Fetch the existing collection's vector parameters, `None` when absent
    async fn existing_params(&self) -> Result<Option<VectorParams>> {
        let response = self
            .http
            .send(ProviderStage::StoreWrite, |client| {
                self.request(client, Method::GET, "")
            })
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let info: QdrantResponse<CollectionInfo> = self
            .http
            .check_status(ProviderStage::StoreWrite, response)
            .await?
            .json()
            .await
            .map_err(|e| self.http.error(ProviderStage::StoreWrite, format!("invalid collection info: {}", e)))?;

        let params = serde_json::from_value(info.result.config.params.vectors).map_err(|_| {
            Error::config(format!(
                "Qdrant collection '{}' uses named vectors, expected a single unnamed vector",
                self.collection
            ))
        })?;
        Ok(Some(params))
    }

    fn check_params(&self, params: &VectorParams) -> Result<()> {
        if params.size != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: params.size,
                actual: self.dimensions,
            });
        }
        if params.distance != self.distance.as_str() {
            return Err(Error::config(format!(
                "Qdrant collection '{}' uses {} distance, configured {}",
                self.collection,
                params.distance,
                self.distance.as_str()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStoreProvider for QdrantStore {
    async fn ensure_collection(&self) -> Result<()> {
        if self.recreate_on_start {
            tracing::warn!(collection = %self.collection, "Recreating Qdrant collection");
            self.drop_collection().await?;
            return self.create_collection().await;
        }

        match self.existing_params().await? {
            Some(params) => {
                self.check_params(&params)?;
                tracing::info!(collection = %self.collection, "Using existing Qdrant collection");
                Ok(())
            }
            None => self.create_collection().await,
        }
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<Point<'_>> = records
            .iter()
            .map(|r| Point {
                id: r.id,
                vector: &r.vector,
                payload: &r.payload,
            })
            .collect();
        let body = json!({ "points": points });

        let _: QdrantResponse<Value> = self
            .http
            .send_json(ProviderStage::StoreWrite, |client| {
                self.request(client, Method::PUT, "points?wait=true").json(&body)
            })
            .await?;

        tracing::debug!(collection = %self.collection, points = records.len(), "Upserted points");
        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievalHit>> {
        let body = json!({
            "vector": query,
            "limit": top_k,
            "with_payload": true,
        });

        let response: QdrantResponse<Vec<ScoredPoint>> = self
            .http
            .send_json(ProviderStage::StoreSearch, |client| {
                self.request(client, Method::POST, "points/search").json(&body)
            })
            .await?;

        response
            .result
            .into_iter()
            .map(|point| {
                let payload = point.payload.ok_or_else(|| {
                    Error::StoreSearch("qdrant returned a point without payload".to_string())
                })?;
                Ok(RetrievalHit {
                    text: payload.text,
                    metadata: payload.metadata,
                    similarity_score: point.score,
                })
            })
            .collect()
    }

    async fn delete_document(&self, document_id: &str, from_sequence: u32) -> Result<()> {
        let body = json!({
            "filter": {
                "must": [
                    { "key": "metadata.source", "match": { "value": document_id } },
                    { "key": "metadata.chunk", "range": { "gte": from_sequence } }
                ]
            }
        });

        let _: QdrantResponse<Value> = self
            .http
            .send_json(ProviderStage::StoreWrite, |client| {
                self.request(client, Method::POST, "points/delete?wait=true").json(&body)
            })
            .await?;
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        let body = json!({ "exact": true });
        let response: QdrantResponse<CountResult> = self
            .http
            .send_json(ProviderStage::StoreSearch, |client| {
                self.request(client, Method::POST, "points/count").json(&body)
            })
            .await?;
        Ok(response.result.count)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}
