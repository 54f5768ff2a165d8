//! Tokenizers used to measure chunk windows
//!
//! A tokenizer reports each token as a byte span of the input. Detokenizing a
//! window is then a slice of the source text from the first span's start to
//! the last span's end, which keeps the source whitespace intact.

use std::ops::Range;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};

/// Splits text into atomic units, reported as byte spans of the input
pub trait Tokenizer: Send + Sync {
    /// Byte ranges of every token, in order and non-overlapping
    fn token_spans(&self, text: &str) -> Result<Vec<Range<usize>>>;

    /// Tokenizer name for logging
    fn name(&self) -> &str;

    /// Number of tokens in `text`
    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.token_spans(text)?.len())
    }
}

/// Unicode word-boundary tokenizer; whitespace runs are not tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn token_spans(&self, text: &str) -> Result<Vec<Range<usize>>> {
        Ok(text
            .split_word_bound_indices()
            .filter(|(_, segment)| !segment.trim().is_empty())
            .map(|(start, segment)| start..start + segment.len())
            .collect())
    }

    fn name(&self) -> &str {
        "word"
    }
}

/// HuggingFace tokenizer loaded from a `tokenizer.json`
#[cfg(feature = "hf-tokenizer")]
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
    name: String,
}

#[cfg(feature = "hf-tokenizer")]
impl HfTokenizer {
    /// Load a tokenizer file, disabling its truncation and padding so whole
    /// documents can be measured
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let mut inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            Error::config(format!("Failed to load tokenizer {}: {}", path.display(), e))
        })?;
        inner
            .with_truncation(None)
            .map_err(|e| Error::config(format!("Failed to disable truncation: {}", e)))?;
        inner.with_padding(None);

        Ok(Self {
            inner,
            name: path.display().to_string(),
        })
    }
}

#[cfg(feature = "hf-tokenizer")]
impl Tokenizer for HfTokenizer {
    fn token_spans(&self, text: &str) -> Result<Vec<Range<usize>>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| Error::internal(format!("Tokenization failed: {}", e)))?;

        // Offsets are byte offsets; zero-width entries belong to special tokens.
        Ok(encoding
            .get_offsets()
            .iter()
            .filter(|(start, end)| start < end)
            .map(|&(start, end)| start..end)
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Build the tokenizer selected by the chunking configuration
pub fn build_tokenizer(config: &ChunkingConfig) -> Result<Arc<dyn Tokenizer>> {
    match &config.tokenizer_path {
        None => Ok(Arc::new(WordTokenizer)),
        #[cfg(feature = "hf-tokenizer")]
        Some(path) => Ok(Arc::new(HfTokenizer::from_file(path)?)),
        #[cfg(not(feature = "hf-tokenizer"))]
        Some(path) => Err(Error::config(format!(
            "chunking.tokenizer_path is set to {} but the hf-tokenizer feature is not enabled",
            path.display()
        ))),
    }
}
