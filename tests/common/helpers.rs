// Test helper functions and fakes

use docrag::chunking::{ChunkEnforcer, SizeLimits, SplitterRegistry, Tokenizer};
use docrag::core::config::Config;
use docrag::core::indexer::FileWalker;
use docrag::core::store::{cosine_similarity, VectorStore};
use docrag::{
    Embedder, HashingEmbedder, IngestionPipeline, RagError, Result, VectorMatch, VectorRecord,
};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::sync::Arc;

/// One token per character
#[allow(dead_code)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }

    fn decode_lossy(&self, tokens: &[u32]) -> String {
        tokens
            .iter()
            .map(|&t| char::from_u32(t).unwrap_or('\u{FFFD}'))
            .collect()
    }

    fn name(&self) -> &str {
        "chars"
    }
}

/// Calls observed by [`RecordingStore`]
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Delete,
    Create,
    Add(usize),
}

/// In-memory vector store that records every call
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingStore {
    pub events: RefCell<Vec<StoreEvent>>,
    pub records: RefCell<Vec<VectorRecord>>,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.borrow().clone()
    }

    /// Sizes of the upserted batches, in call order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                StoreEvent::Add(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &StoreEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }
}

impl VectorStore for RecordingStore {
    fn create_index(&self) -> Result<()> {
        self.events.borrow_mut().push(StoreEvent::Create);
        Ok(())
    }

    fn delete_index(&self) -> Result<()> {
        self.events.borrow_mut().push(StoreEvent::Delete);
        self.records.borrow_mut().clear();
        Ok(())
    }

    fn add_vectors(&self, records: &[VectorRecord]) -> Result<()> {
        self.events.borrow_mut().push(StoreEvent::Add(records.len()));
        self.records.borrow_mut().extend_from_slice(records);
        Ok(())
    }

    fn query_vectors(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        let mut matches: Vec<VectorMatch> = self
            .records
            .borrow()
            .iter()
            .map(|r| VectorMatch {
                key: r.key.clone(),
                distance: 1.0 - cosine_similarity(vector, &r.vector),
                metadata: r.metadata.clone(),
            })
            .collect();
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(top_k);
        Ok(matches)
    }
}

/// Hashing embedder that counts calls and can fail on demand
#[allow(dead_code)]
pub struct CountingEmbedder {
    inner: HashingEmbedder,
    pub calls: Cell<usize>,
    fail_after: Option<usize>,
}

#[allow(dead_code)]
impl CountingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: HashingEmbedder::new(dimension),
            calls: Cell::new(0),
            fail_after: None,
        }
    }

    /// Fail every call after the first `n`
    pub fn failing_after(dimension: usize, n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new(dimension)
        }
    }
}

impl Embedder for CountingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let calls = self.calls.get();
        if self.fail_after.is_some_and(|n| calls >= n) {
            return Err(RagError::Embedding("quota exceeded".to_string()));
        }
        self.calls.set(calls + 1);
        self.inner.embed(text)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn model_name(&self) -> &str {
        "counting"
    }
}

/// Pipeline over the default splitters with a character tokenizer
#[allow(dead_code)]
pub fn build_pipeline<E: Embedder, S: VectorStore>(
    embedder: E,
    store: S,
    limits: SizeLimits,
    batch_size: usize,
) -> IngestionPipeline<E, S> {
    let walker = FileWalker::new(vec!["md".to_string(), "pdf".to_string()], vec![], 10)
        .expect("Failed to create walker");
    let enforcer =
        ChunkEnforcer::new(Arc::new(CharTokenizer), limits).expect("Failed to create enforcer");

    IngestionPipeline::new(
        walker,
        SplitterRegistry::with_defaults(14.0),
        enforcer,
        embedder,
        store,
        batch_size,
    )
    .expect("Failed to create pipeline")
}

/// Configuration that needs no network: hashing embedder, index in `data_dir`
#[allow(dead_code)]
pub fn offline_config(data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.embedding.provider = "hashing".to_string();
    config.store.dimension = 128;
    config.store.data_dir = data_dir.to_path_buf();
    config
}
