//! Ollama-based providers for embeddings and generation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{ProviderStage, Result};

use super::embedding::EmbeddingProvider;
use super::http::{join_url, HttpClient};
use super::llm::{Generation, LlmProvider, TokenUsage};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

impl GenerateResponse {
    fn usage(&self) -> Option<TokenUsage> {
        match (self.prompt_eval_count, self.eval_count) {
            (None, None) => None,
            (prompt, completion) => Some(TokenUsage {
                prompt_tokens: prompt.unwrap_or(0),
                completion_tokens: completion.unwrap_or(0),
            }),
        }
    }
}

/// Ollama embedding provider using the batch `/api/embed` endpoint
pub struct OllamaEmbedder {
    http: HttpClient,
    url: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("ollama", config.timeout_secs, config.max_retries)?,
            url: join_url(&config.base_url, "api/embed"),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response: EmbedResponse = self
            .http
            .send_json(ProviderStage::Embedding, |client| {
                let builder = client.post(&self.url).json(&request);
                match &self.api_key {
                    Some(key) => builder.bearer_auth(key),
                    None => builder,
                }
            })
            .await?;

        tracing::debug!(model = %self.model, inputs = texts.len(), "Embedded batch");
        Ok(response.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    http: HttpClient,
    url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("ollama", config.timeout_secs, config.max_retries)?,
            url: join_url(config.base_url(), "api/generate"),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_output_tokens,
            },
        };

        let response: GenerateResponse = self
            .http
            .send_json(ProviderStage::Generation, |client| {
                client.post(&self.url).json(&request)
            })
            .await?;

        Ok(Generation {
            usage: response.usage(),
            text: response.response,
        })
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_request_shape() {
        let input = vec!["a".to_string(), "b".to_string()];
        let request = EmbedRequest {
            model: "all-minilm",
            input: &input,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "all-minilm");
        assert_eq!(json["input"][1], "b");
    }

    #[test]
    fn test_generate_usage() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"response": "Paris", "prompt_eval_count": 40, "eval_count": 3}"#,
        )
        .unwrap();
        assert_eq!(
            response.usage(),
            Some(TokenUsage {
                prompt_tokens: 40,
                completion_tokens: 3
            })
        );

        let response: GenerateResponse = serde_json::from_str(r#"{"response": "Paris"}"#).unwrap();
        assert_eq!(response.usage(), None);
    }

    #[test]
    fn test_embedder_endpoint() {
        let embedder = OllamaEmbedder::new(&EmbeddingConfig::default()).unwrap();
        assert_eq!(embedder.url, "http://localhost:11434/api/embed");
        assert_eq!(embedder.dimensions(), 384);
    }
}
