//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Token counts reported by a generation provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u64,
    /// Tokens in the completion
    pub completion_tokens: u64,
}

/// Output of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Generated text
    pub text: String,
    /// Usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

impl Generation {
    /// Generation without usage information
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// Trait for free-text generation from a prompt
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-flash-latest)
/// - `OllamaLlm`: Local Ollama server
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<Generation>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
