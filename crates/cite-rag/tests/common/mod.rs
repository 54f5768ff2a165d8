//! Fake providers with call counters for pipeline and router tests
#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cite_rag::config::DistanceMetric;
use cite_rag::ingestion::{TextChunker, WordTokenizer};
use cite_rag::pipeline::Pricing;
use cite_rag::providers::{
    EmbeddingProvider, Generation, InMemoryVectorStore, KeywordReranker, LlmProvider,
    Providers, RerankProvider, TokenUsage, VectorStoreProvider,
};
use cite_rag::types::{RetrievalHit, VectorRecord};
use cite_rag::{Error, RagPipeline, Result};

/// Bag-of-words embedder: each lowercase word bumps one hashed dimension
pub struct FakeEmbedder {
    /// Dimension the embedder claims
    pub declared: usize,
    /// Length of the vectors it actually returns
    pub produced: usize,
    pub calls: AtomicUsize,
    pub batch_sizes: Mutex<Vec<usize>>,
    pub fail: AtomicBool,
}

impl FakeEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self::lying(dimensions, dimensions)
    }

    pub fn lying(declared: usize, produced: usize) -> Self {
        Self {
            declared,
            produced,
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.produced];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % self.produced as u64) as usize] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes.lock().unwrap().push(texts.len());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::internal("embedding backend unavailable"));
        }
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.declared
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// In-memory store that counts calls and can be told to fail them
pub struct CountingStore {
    pub inner: InMemoryVectorStore,
    pub upserts: AtomicUsize,
    pub searches: AtomicUsize,
    pub fail_upsert: AtomicBool,
    pub fail_search: AtomicBool,
}

impl CountingStore {
    pub fn new(dimensions: usize) -> Self {
        Self {
            inner: InMemoryVectorStore::new(dimensions, DistanceMetric::Cosine),
            upserts: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
            fail_upsert: AtomicBool::new(false),
            fail_search: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl VectorStoreProvider for CountingStore {
    async fn ensure_collection(&self) -> Result<()> {
        self.inner.ensure_collection().await
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(Error::internal("connection refused"));
        }
        self.inner.upsert(records).await
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievalHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(Error::internal("search timed out"));
        }
        self.inner.search(query, top_k).await
    }

    async fn delete_document(&self, document_id: &str, from_sequence: u32) -> Result<()> {
        self.inner.delete_document(document_id, from_sequence).await
    }

    async fn len(&self) -> Result<usize> {
        self.inner.len().await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Reranker returning fixed scores, or keyword scores when none are set
#[derive(Default)]
pub struct FakeReranker {
    pub calls: AtomicUsize,
    pub scores: Mutex<Option<Vec<f32>>>,
    pub fail: AtomicBool,
}

impl FakeReranker {
    pub fn with_scores(scores: Vec<f32>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            scores: Mutex::new(Some(scores)),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RerankProvider for FakeReranker {
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::internal("rerank service returned 500"));
        }
        let fixed = self.scores.lock().unwrap().clone();
        match fixed {
            Some(scores) => Ok(scores),
            None => KeywordReranker.rerank(query, documents).await,
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// LLM replying with a canned answer and recording prompts
pub struct FakeLlm {
    pub reply: String,
    pub usage: Option<TokenUsage>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl FakeLlm {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            usage: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::internal("quota exceeded"));
        }
        Ok(Generation {
            text: self.reply.clone(),
            usage: self.usage,
        })
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

/// Fakes shared with the pipeline so tests can inspect them
pub struct Harness {
    pub embedder: Arc<FakeEmbedder>,
    pub store: Arc<CountingStore>,
    pub reranker: Arc<FakeReranker>,
    pub llm: Arc<FakeLlm>,
    pub pipeline: Arc<RagPipeline>,
}

pub struct HarnessBuilder {
    pub embedder: FakeEmbedder,
    pub store: CountingStore,
    pub reranker: FakeReranker,
    pub llm: FakeLlm,
    pub chunk_size: usize,
    pub overlap: usize,
    pub pricing: Pricing,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            embedder: FakeEmbedder::new(16),
            store: CountingStore::new(16),
            reranker: FakeReranker::default(),
            llm: FakeLlm::new("Paris is the capital of France [1]."),
            chunk_size: 10,
            overlap: 2,
            pricing: Pricing::default(),
        }
    }
}

impl HarnessBuilder {
    pub fn try_build(self) -> Result<Harness> {
        let embedder = Arc::new(self.embedder);
        let store = Arc::new(self.store);
        let reranker = Arc::new(self.reranker);
        let llm = Arc::new(self.llm);

        let providers = Providers {
            embedder: embedder.clone(),
            store: store.clone(),
            reranker: reranker.clone(),
            llm: llm.clone(),
        };
        let chunker = TextChunker::new(Arc::new(WordTokenizer), self.chunk_size, self.overlap)?;
        let pipeline = Arc::new(RagPipeline::new(providers, chunker, self.pricing)?);

        Ok(Harness {
            embedder,
            store,
            reranker,
            llm,
            pipeline,
        })
    }

    pub fn build(self) -> Harness {
        self.try_build().expect("harness")
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::default().build()
}

/// `n` distinct words
pub fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
