//! Ingestion pipeline orchestration.
//!
//! Coordinates the end-to-end ingestion workflow:
//! 1. Discover files (allow-list, excludes, size cap)
//! 2. Rebuild the target index (delete, then create)
//! 3. Structurally split each file and enforce size ceilings
//! 4. Embed every chunk and upsert records in fixed-size batches
//!
//! Chunks are produced lazily, one file at a time, so peak memory is
//! bounded by the largest file rather than the corpus.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::chunking::{ChunkEnforcer, SplitterRegistry};
use crate::core::embedding::Embedder;
use crate::core::error::{RagError, Result};
use crate::core::indexer::walker::{Discovery, FileWalker};
use crate::core::store::VectorStore;
use crate::core::types::{IngestStats, QueryResult, SizedChunk, VectorRecord};

/// Sized chunks produced from one file
#[derive(Debug, Clone)]
pub struct FileChunks {
    pub path: PathBuf,
    pub chunks: Vec<SizedChunk>,
}

/// Orchestrates ingestion into, and retrieval from, one vector index
pub struct IngestionPipeline<E: Embedder, S: VectorStore> {
    walker: FileWalker,
    registry: SplitterRegistry,
    enforcer: ChunkEnforcer,
    embedder: E,
    store: S,
    batch_size: usize,
}

impl<E: Embedder, S: VectorStore> IngestionPipeline<E, S> {
    pub fn new(
        walker: FileWalker,
        registry: SplitterRegistry,
        enforcer: ChunkEnforcer,
        embedder: E,
        store: S,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(RagError::ConfigError(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            walker,
            registry,
            enforcer,
            embedder,
            store,
            batch_size,
        })
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Consume the pipeline, returning its embedder and store
    pub fn into_parts(self) -> (E, S) {
        (self.embedder, self.store)
    }

    /// Files under `path` accepted for ingestion
    pub fn discover(&self, path: &Path) -> Result<Discovery> {
        self.walker.discover(path)
    }

    /// Lazily chunk `files`, yielding one item per file.
    ///
    /// Each file is loaded and split only when the iterator reaches it.
    pub fn chunk_stream<'a>(
        &'a self,
        files: &'a [PathBuf],
    ) -> impl Iterator<Item = Result<FileChunks>> + 'a {
        files.iter().map(move |path| {
            let chunks = self.preview(path)?;
            Ok(FileChunks {
                path: path.clone(),
                chunks,
            })
        })
    }

    /// Run only the chunking stages for one file
    pub fn preview(&self, path: &Path) -> Result<Vec<SizedChunk>> {
        let splitter = self.registry.for_path(path)?;
        self.enforcer.produce(splitter, path)
    }

    /// Rebuild the index from every accepted file under `path`.
    ///
    /// The index is deleted and recreated before any chunk is embedded.
    /// Any load, embedding or storage failure aborts the run.
    pub fn ingest(&self, path: &Path) -> Result<IngestStats> {
        let start = Instant::now();

        let discovery = self.discover(path)?;
        let mut stats = IngestStats {
            files_skipped: discovery.skipped,
            ..IngestStats::default()
        };

        self.store.delete_index()?;
        self.store.create_index()?;

        let mut batch: Vec<VectorRecord> = Vec::with_capacity(self.batch_size);

        for file in self.chunk_stream(&discovery.files) {
            let file = file?;
            tracing::debug!("Embedding {} chunks from {:?}", file.chunks.len(), file.path);

            for chunk in &file.chunks {
                let vector = self.embedder.embed(&chunk.content)?;
                batch.push(VectorRecord::from_chunk(chunk, vector));
                stats.chunks_embedded += 1;
                stats.total_tokens += chunk.num_tokens;
                stats.total_bytes += chunk.num_bytes;

                if batch.len() >= self.batch_size {
                    self.flush(&mut batch, &mut stats)?;
                }
            }

            stats.files_processed += 1;
        }

        if !batch.is_empty() {
            self.flush(&mut batch, &mut stats)?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Ingestion complete: {} files, {} chunks, {} batches in {}ms",
            stats.files_processed,
            stats.chunks_embedded,
            stats.upsert_batches,
            stats.duration_ms
        );

        Ok(stats)
    }

    fn flush(&self, batch: &mut Vec<VectorRecord>, stats: &mut IngestStats) -> Result<()> {
        let records = std::mem::take(batch);
        self.store.add_vectors(&records)?;
        stats.upsert_batches += 1;
        tracing::info!("Upserted batch of {} records", records.len());
        Ok(())
    }

    /// Embed `text` and return the `top_k` nearest records, closest first
    pub fn query(&self, text: &str, top_k: usize) -> Result<Vec<QueryResult>> {
        let vector = self.embedder.embed(text)?;
        let matches = self.store.query_vectors(&vector, top_k)?;

        tracing::info!("Query returned {} results", matches.len());
        Ok(matches.into_iter().map(QueryResult::from).collect())
    }
}
