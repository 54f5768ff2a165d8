//! Token-window chunking with overlap

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

use super::tokenizer::Tokenizer;

/// A window of tokens cut from a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWindow {
    /// Index of the first token in the window
    pub start_token: usize,
    /// Index one past the last token in the window
    pub end_token: usize,
    /// Detokenized window text
    pub text: String,
}

/// Sliding-window chunker over a pluggable tokenizer
#[derive(Clone)]
pub struct TextChunker {
    tokenizer: Arc<dyn Tokenizer>,
    /// Window length in tokens
    chunk_size: usize,
    /// Tokens shared by adjacent windows
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker, rejecting `overlap >= chunk_size`
    pub fn new(tokenizer: Arc<dyn Tokenizer>, chunk_size: usize, overlap: usize) -> Result<Self> {
        validate_window(chunk_size, overlap)?;
        Ok(Self {
            tokenizer,
            chunk_size,
            overlap,
        })
    }

    /// Window length in tokens
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Tokens shared by adjacent windows
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Name of the tokenizer windows are measured with
    pub fn tokenizer_name(&self) -> &str {
        self.tokenizer.name()
    }

    /// Cut `text` into windows of `chunk_size` tokens advancing by
    /// `chunk_size - overlap`; the last window may be shorter.
    pub fn windows(&self, text: &str) -> Result<Vec<TokenWindow>> {
        let spans = self.tokenizer.token_spans(text)?;
        let stride = self.chunk_size - self.overlap;

        Ok((0..spans.len())
            .step_by(stride)
            .map(|start| {
                let end = (start + self.chunk_size).min(spans.len());
                TokenWindow {
                    start_token: start,
                    end_token: end,
                    text: text[spans[start].start..spans[end - 1].end].to_string(),
                }
            })
            .collect())
    }

    /// Chunk text into window strings
    pub fn chunk(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.windows(text)?.into_iter().map(|w| w.text).collect())
    }

    /// Chunk a document into chunks with deterministic ids
    pub fn chunk_document(&self, doc: &Document) -> Result<Vec<Chunk>> {
        let windows = self.windows(&doc.text)?;
        let chunks: Vec<Chunk> = windows
            .into_iter()
            .enumerate()
            .map(|(i, window)| Chunk::new(doc.id.clone(), i as u32, window.text))
            .collect();

        tracing::debug!(
            document_id = %doc.id,
            chunks = chunks.len(),
            tokenizer = self.tokenizer.name(),
            "Chunked document"
        );

        Ok(chunks)
    }
}

/// Chunk `text` with a one-off window configuration
pub fn chunk_text(
    tokenizer: Arc<dyn Tokenizer>,
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>> {
    TextChunker::new(tokenizer, chunk_size, overlap)?.chunk(text)
}

fn validate_window(chunk_size: usize, overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::config("chunk_size must be greater than 0"));
    }
    if overlap >= chunk_size {
        return Err(Error::config(format!(
            "overlap ({}) must be smaller than chunk_size ({})",
            overlap, chunk_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::tokenizer::WordTokenizer;

    fn filler(tokens: usize) -> String {
        (0..tokens)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn chunker(size: usize, overlap: usize) -> TextChunker {
        TextChunker::new(Arc::new(WordTokenizer), size, overlap).unwrap()
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        for (size, overlap) in [(10, 10), (10, 11), (1, 1), (0, 0)] {
            let result = TextChunker::new(Arc::new(WordTokenizer), size, overlap);
            assert!(matches!(result, Err(Error::Config(_))), "{} / {}", size, overlap);
        }
    }

    #[test]
    fn test_short_text_single_chunk() {
        let text = "Paris is the capital of France.";
        let chunks = chunker(1000, 150).chunk(text).unwrap();
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_1200_tokens_two_chunks() {
        let text = filler(1200);
        let windows = chunker(1000, 150).windows(&text).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start_token, 0);
        assert_eq!(windows[0].end_token, 1000);
        assert_eq!(windows[1].start_token, 850);
        assert_eq!(windows[1].end_token, 1200);
        assert!(windows[1].text.starts_with("w850 "));
        assert!(windows[1].text.ends_with("w1199"));
    }

    #[test]
    fn test_chunk_count_is_ceil_of_stride() {
        for (tokens, size, overlap) in [(1, 5, 0), (10, 5, 0), (11, 5, 2), (100, 7, 3), (9, 4, 3)] {
            let text = filler(tokens);
            let chunks = chunker(size, overlap).chunk(&text).unwrap();
            let stride = size - overlap;
            assert_eq!(chunks.len(), tokens.div_ceil(stride), "{} {} {}", tokens, size, overlap);
        }
    }

    #[test]
    fn test_windows_reconstruct_token_sequence() {
        let text = "The quick brown fox, it jumps over the lazy dog; then naps. \
                    Later it wakes up and runs home again.";
        let tokenizer = WordTokenizer;
        let expected: Vec<String> = tokenizer
            .token_spans(text)
            .unwrap()
            .into_iter()
            .map(|s| text[s].to_string())
            .collect();

        for (size, overlap) in [(1, 0), (4, 1), (5, 4), (8, 3), (50, 10)] {
            let windows = chunker(size, overlap).windows(text).unwrap();
            let mut rebuilt: Vec<String> = Vec::new();
            for window in &windows {
                let tokens: Vec<String> = tokenizer
                    .token_spans(&window.text)
                    .unwrap()
                    .into_iter()
                    .map(|s| window.text[s].to_string())
                    .collect();
                // Drop the part already emitted by the previous window.
                let skip = rebuilt.len().saturating_sub(window.start_token);
                rebuilt.extend(tokens.into_iter().skip(skip));
            }
            assert_eq!(rebuilt, expected, "size {} overlap {}", size, overlap);
        }
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(chunker(10, 2).chunk("").unwrap().is_empty());
        assert!(chunker(10, 2).chunk(" \n ").unwrap().is_empty());
    }

    #[test]
    fn test_chunk_document_ids() {
        let doc = Document::new("doc1", filler(25));
        let chunks = chunker(10, 0).chunk_document(&doc).unwrap();

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i as u32);
            assert_eq!(chunk.source_document_id, "doc1");
            assert_eq!(chunk.chunk_id, crate::types::record_id("doc1", i as u32));
        }
    }

    #[test]
    fn test_chunk_text_function() {
        let chunks = chunk_text(Arc::new(WordTokenizer), &filler(6), 4, 2).unwrap();
        assert_eq!(chunks, vec!["w0 w1 w2 w3", "w2 w3 w4 w5", "w4 w5"]);
    }
}
