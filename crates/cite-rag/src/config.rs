//! Configuration for the RAG pipeline
//!
//! Settings are process-wide and resolved once at startup. Sources are layered
//! with figment, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`rag.toml` or `--config <path>`)
//! 3. `RAG_`-prefixed environment variables, nested with `__`
//!    (`RAG_VECTOR_DB__URL`, `RAG_CHUNKING__CHUNK_SIZE`, ...)
//! 4. the well-known provider variables `GEMINI_API_KEY`, `QDRANT_URL`,
//!    `QDRANT_API_KEY` and `COHERE_API_KEY`

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default TOML file picked up when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "rag.toml";

/// Main RAG pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Embedding provider configuration
    pub embeddings: EmbeddingConfig,
    /// Vector database configuration
    pub vector_db: VectorDbConfig,
    /// Rerank provider configuration
    pub rerank: RerankConfig,
    /// Generation provider configuration
    pub llm: LlmConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Query defaults
    pub query: QueryConfig,
}

impl RagConfig {
    /// Load configuration from defaults, an optional TOML file and the environment.
    ///
    /// A missing file is not an error: figment skips absent TOML files.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Self::from_figment(Self::figment(file))
    }

    /// Build the layered figment without extracting it
    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(RagConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("RAG_").split("__"))
            .merge(Env::raw().filter_map(legacy_env_key))
    }

    /// Extract and validate a configuration from a figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: RagConfig = figment
            .extract()
            .map_err(|e| Error::config(format!("Failed to load configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that can never work at runtime
    pub fn validate(&self) -> Result<()> {
        if self.embeddings.dimensions == 0 {
            return Err(Error::config("embeddings.dimensions must be greater than 0"));
        }
        if self.chunking.chunk_size == 0 {
            return Err(Error::config("chunking.chunk_size must be greater than 0"));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.query.default_top_k == 0 {
            return Err(Error::config("query.default_top_k must be greater than 0"));
        }
        if self.rerank.provider == RerankBackend::Cohere && is_blank(&self.rerank.api_key) {
            return Err(Error::config(
                "rerank.api_key (or COHERE_API_KEY) is required for the cohere reranker",
            ));
        }
        if self.llm.provider == LlmBackend::Gemini && is_blank(&self.llm.api_key) {
            return Err(Error::config(
                "llm.api_key (or GEMINI_API_KEY) is required for the gemini provider",
            ));
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Map well-known provider environment variables onto config keys
fn legacy_env_key(key: &UncasedStr) -> Option<Uncased<'_>> {
    let mapped = match key.as_str().to_ascii_uppercase().as_str() {
        "GEMINI_API_KEY" => "llm.api_key",
        "QDRANT_URL" => "vector_db.url",
        "QDRANT_API_KEY" => "vector_db.api_key",
        "COHERE_API_KEY" => "rerank.api_key",
        _ => return None,
    };
    Some(Uncased::from(mapped))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin (without credentials)
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "https://assessment-track-b-w7o7.vercel.app".to_string(),
            ],
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Embedding provider configuration
///
/// `dimensions` is the single source of truth for the vector size: the
/// collection is created with it and every embedding is checked against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama-compatible base URL
    pub base_url: String,
    /// Optional bearer token for hosted endpoints
    pub api_key: Option<String>,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (384 for all-MiniLM-L6-v2)
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Adapter-level retries for failed requests
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
            model: "all-minilm".to_string(),
            dimensions: 384,
            timeout_secs: 60,
            max_retries: 0,
        }
    }
}

/// Vector store backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    /// Qdrant over its REST API
    #[default]
    Qdrant,
    /// Process-local store (lost on restart)
    Memory,
}

/// Distance metric of the collection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Dot,
    Euclid,
}

impl DistanceMetric {
    /// Name used by the Qdrant API
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "Cosine",
            DistanceMetric::Dot => "Dot",
            DistanceMetric::Euclid => "Euclid",
        }
    }
}

/// Vector database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Backend provider
    pub provider: VectorBackend,
    /// Qdrant base URL
    pub url: String,
    /// Qdrant API key
    pub api_key: Option<String>,
    /// Collection name
    pub collection: String,
    /// Distance metric
    pub distance: DistanceMetric,
    /// Drop and recreate the collection at startup
    pub recreate_on_start: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Adapter-level retries for failed requests
    pub max_retries: u32,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            provider: VectorBackend::Qdrant,
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "documents".to_string(),
            distance: DistanceMetric::Cosine,
            recreate_on_start: false,
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

/// Rerank backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RerankBackend {
    /// Cohere rerank API
    #[default]
    Cohere,
    /// Local term-overlap scoring
    Keyword,
}

/// Rerank provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    /// Backend provider
    pub provider: RerankBackend,
    /// API base URL
    pub base_url: String,
    /// API key
    pub api_key: Option<String>,
    /// Rerank model identifier
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Adapter-level retries for failed requests
    pub max_retries: u32,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            provider: RerankBackend::Cohere,
            base_url: "https://api.cohere.com".to_string(),
            api_key: None,
            model: "rerank-v3.5".to_string(),
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

/// Generation backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Google Gemini API
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

/// Generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend provider
    pub provider: LlmBackend,
    /// API base URL; the provider's public endpoint when unset
    pub base_url: Option<String>,
    /// API key
    pub api_key: Option<String>,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Adapter-level retries for failed requests
    pub max_retries: u32,
    /// Price per 1000 prompt tokens, used when the provider reports usage
    pub input_cost_per_1k: f64,
    /// Price per 1000 completion tokens, used when the provider reports usage
    pub output_cost_per_1k: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmBackend::Gemini,
            base_url: None,
            api_key: None,
            model: "gemini-flash-latest".to_string(),
            temperature: 0.2,
            max_output_tokens: 1024,
            timeout_secs: 120,
            max_retries: 0,
            input_cost_per_1k: 0.0,
            output_cost_per_1k: 0.0,
        }
    }
}

impl LlmConfig {
    /// Configured base URL or the selected provider's default
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.provider) {
            (Some(url), _) => url,
            (None, LlmBackend::Gemini) => "https://generativelanguage.googleapis.com",
            (None, LlmBackend::Ollama) => "http://localhost:11434",
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in tokens
    pub chunk_size: usize,
    /// Tokens shared by adjacent windows
    pub chunk_overlap: usize,
    /// HuggingFace `tokenizer.json`; word tokenization when unset
    pub tokenizer_path: Option<PathBuf>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 150,
            tokenizer_path: None,
        }
    }
}

/// Query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of hits retrieved when the request does not say
    pub default_top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { default_top_k: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> RagConfig {
        let mut config = RagConfig::default();
        config.rerank.provider = RerankBackend::Keyword;
        config.llm.provider = LlmBackend::Ollama;
        config
    }

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 150);
        assert_eq!(config.vector_db.collection, "documents");
        assert_eq!(config.vector_db.distance, DistanceMetric::Cosine);
        assert_eq!(config.embeddings.dimensions, 384);
        assert_eq!(config.query.default_top_k, 5);
    }

    #[test]
    fn test_validate_rejects_overlap_not_smaller_than_size() {
        let mut config = local_config();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_requires_cloud_keys() {
        let mut config = local_config();
        assert!(config.validate().is_ok());

        config.llm.provider = LlmBackend::Gemini;
        assert!(config.validate().is_err());

        config.llm.api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_figment_layers_overrides() {
        let figment = Figment::from(Serialized::defaults(local_config()))
            .merge(Serialized::default("chunking.chunk_size", 400))
            .merge(Serialized::default("vector_db.provider", "memory"));

        let config = RagConfig::from_figment(figment).unwrap();
        assert_eq!(config.chunking.chunk_size, 400);
        assert_eq!(config.vector_db.provider, VectorBackend::Memory);
        assert_eq!(config.chunking.chunk_overlap, 150);
    }

    #[test]
    fn test_llm_base_url_follows_provider() {
        let mut config = RagConfig::default();
        assert_eq!(config.llm.base_url(), "https://generativelanguage.googleapis.com");
        config.llm.provider = LlmBackend::Ollama;
        assert_eq!(config.llm.base_url(), "http://localhost:11434");
        config.llm.base_url = Some("http://gpu-box:11434".to_string());
        assert_eq!(config.llm.base_url(), "http://gpu-box:11434");
    }

    #[test]
    fn test_legacy_env_keys() {
        let key = UncasedStr::new("QDRANT_URL");
        assert_eq!(legacy_env_key(key).unwrap().as_str(), "vector_db.url");
        let key = UncasedStr::new("PATH");
        assert!(legacy_env_key(key).is_none());
    }
}
