//! Service container for docrag
//!
//! Builds the tokenizer, splitter registry, enforcer, embedder and
//! vector store from one validated [`Config`].

use crate::core::chunking::{
    BytesSplitter, ChunkEnforcer, SplitterRegistry, TiktokenTokenizer, TokenSplitter, Tokenizer,
};
use crate::core::config::Config;
use crate::core::embedding::{create_embedder, Embedder};
use crate::core::error::Result;
use crate::core::indexer::{FileWalker, IngestionPipeline};
use crate::core::store::LocalVectorStore;
use crate::core::types::SizedChunk;
use std::path::Path;
use std::sync::Arc;

/// Pipeline type used by the command-line adapter
pub type DefaultPipeline = IngestionPipeline<Box<dyn Embedder>, LocalVectorStore>;

/// Shared services built from configuration
#[derive(Clone)]
pub struct Services {
    /// Tokenizer used for counting and token windows
    pub tokenizer: Arc<dyn Tokenizer>,

    /// Extension-keyed structural splitters
    pub registry: Arc<SplitterRegistry>,

    /// Size ceiling enforcement
    pub enforcer: Arc<ChunkEnforcer>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Validate `config` and build the chunking services.
    ///
    /// Embedder and store are built per pipeline, so commands that
    /// only chunk never need provider credentials.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let tokenizer: Arc<dyn Tokenizer> =
            Arc::new(TiktokenTokenizer::new(&config.chunking.tokenizer)?);
        let registry = Arc::new(SplitterRegistry::with_defaults(
            config.chunking.min_header_font,
        ));
        let enforcer = Arc::new(ChunkEnforcer::new(
            Arc::clone(&tokenizer),
            config.size_limits(),
        )?);

        Ok(Self {
            tokenizer,
            registry,
            enforcer,
            config: Arc::new(config),
        })
    }

    /// Build the ingestion pipeline with the configured embedder and store
    pub fn create_pipeline(&self) -> Result<DefaultPipeline> {
        let walker = FileWalker::from_config(&self.config.indexing)?;
        let embedder = create_embedder(&self.config.embedding, self.config.store.dimension)?;
        let store = LocalVectorStore::from_config(&self.config.store);

        tracing::debug!(
            "Pipeline: model {}, index {:?}",
            embedder.model_name(),
            store.index_dir()
        );

        IngestionPipeline::new(
            walker,
            (*self.registry).clone(),
            (*self.enforcer).clone(),
            embedder,
            store,
            self.config.indexing.batch_size,
        )
    }

    /// Chunk one file without embedding it
    pub fn preview(&self, path: &Path) -> Result<Vec<SizedChunk>> {
        let splitter = self.registry.for_path(path)?;
        self.enforcer.produce(splitter, path)
    }

    /// Standalone byte splitter with the configured window
    pub fn bytes_splitter(&self) -> Result<BytesSplitter> {
        BytesSplitter::new(
            self.config.chunking.bytes_splitter_chunk_size,
            self.config.chunking.bytes_splitter_chunk_overlap,
        )
    }

    /// Standalone token splitter with the configured window
    pub fn token_splitter(&self) -> Result<TokenSplitter> {
        TokenSplitter::new(
            Arc::clone(&self.tokenizer),
            self.config.chunking.token_splitter_chunk_size,
            self.config.chunking.token_splitter_chunk_overlap,
        )
    }
}
