//! Document ingestion: tokenization and token-window chunking

mod chunker;
mod tokenizer;

pub use chunker::{chunk_text, TextChunker, TokenWindow};
#[cfg(feature = "hf-tokenizer")]
pub use tokenizer::HfTokenizer;
pub use tokenizer::{build_tokenizer, Tokenizer, WordTokenizer};
