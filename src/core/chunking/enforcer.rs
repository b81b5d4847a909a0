//! Chunk size enforcement.
//!
//! Runs a structural splitter end to end, measures every chunk, then
//! re-splits oversized chunks with the primitive splitters: one byte
//! pass followed by one token pass. The order matters. A chunk too
//! large in both metrics is first cut into byte-legal pieces, and
//! each piece is then checked against the token ceiling on its own.

use crate::core::chunking::primitive::{BytesSplitter, TextSplitter, TokenSplitter};
use crate::core::chunking::tokenizer::Tokenizer;
use crate::core::chunking::StructuralSplitter;
use crate::core::config::ChunkingConfig;
use crate::core::error::{RagError, Result};
use crate::core::types::{Chunk, SizedChunk};
use std::path::Path;
use std::sync::Arc;

/// Fixed headroom subtracted from both sub-splitter windows.
///
/// Re-encoding a decoded token window can yield a few more tokens
/// than the window held, and U+FFFD substitution grows a byte window
/// by a few bytes at each edge that cuts a character.
pub const WINDOW_SLACK: usize = 16;

/// Size ceilings and the margins reserved below them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub token_limit: usize,
    pub byte_limit: usize,
    pub token_overlap: usize,
    pub byte_overlap: usize,
    pub metadata_reserve_bytes: usize,
}

impl SizeLimits {
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self {
            token_limit: config.token_limit,
            byte_limit: config.byte_limit,
            token_overlap: config.token_overlap,
            byte_overlap: config.byte_overlap,
            metadata_reserve_bytes: config.metadata_reserve_bytes,
        }
    }

    /// Window handed to the token splitter:
    /// `token_limit - 2 * token_overlap - WINDOW_SLACK`
    pub fn token_window(&self) -> Result<usize> {
        self.token_overlap
            .checked_mul(2)
            .and_then(|reserved| reserved.checked_add(WINDOW_SLACK))
            .and_then(|reserved| self.token_limit.checked_sub(reserved))
            .filter(|&window| window > self.token_overlap)
            .ok_or_else(|| {
                RagError::ConfigError(format!(
                    "token_limit {} leaves no room for a window with overlap {}",
                    self.token_limit, self.token_overlap
                ))
            })
    }

    /// Window handed to the byte splitter:
    /// `byte_limit - metadata_reserve_bytes - 2 * byte_overlap - WINDOW_SLACK`
    pub fn byte_window(&self) -> Result<usize> {
        self.byte_overlap
            .checked_mul(2)
            .and_then(|reserved| reserved.checked_add(self.metadata_reserve_bytes))
            .and_then(|reserved| reserved.checked_add(WINDOW_SLACK))
            .and_then(|reserved| self.byte_limit.checked_sub(reserved))
            .filter(|&window| window > self.byte_overlap)
            .ok_or_else(|| {
                RagError::ConfigError(format!(
                    "byte_limit {} leaves no room for a window with overlap {} and {} reserved bytes",
                    self.byte_limit, self.byte_overlap, self.metadata_reserve_bytes
                ))
            })
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

/// Guarantees every emitted chunk fits both ceilings
#[derive(Debug, Clone)]
pub struct ChunkEnforcer {
    tokenizer: Arc<dyn Tokenizer>,
    limits: SizeLimits,
    bytes_splitter: BytesSplitter,
    token_splitter: TokenSplitter,
}

impl ChunkEnforcer {
    /// Build the enforcer and its sub-splitters; fails when the
    /// limits leave no usable window
    pub fn new(tokenizer: Arc<dyn Tokenizer>, limits: SizeLimits) -> Result<Self> {
        let bytes_splitter = BytesSplitter::new(limits.byte_window()?, limits.byte_overlap)?;
        let token_splitter =
            TokenSplitter::new(tokenizer.clone(), limits.token_window()?, limits.token_overlap)?;

        Ok(Self {
            tokenizer,
            limits,
            bytes_splitter,
            token_splitter,
        })
    }

    pub fn limits(&self) -> &SizeLimits {
        &self.limits
    }

    /// Load `path`, split it structurally and enforce both ceilings.
    ///
    /// Fails with [`RagError::EmptyDocument`] when the structural
    /// split yields no chunks.
    pub fn produce(
        &self,
        splitter: &dyn StructuralSplitter,
        path: &Path,
    ) -> Result<Vec<SizedChunk>> {
        let document = splitter.load(path)?;
        let chunks = splitter.split(&document)?;
        if chunks.is_empty() {
            return Err(RagError::EmptyDocument(path.to_path_buf()));
        }

        let sized = self.enforce(chunks);

        for chunk in &sized {
            tracing::debug!("Chunk metadata: {:?}", chunk.metadata);
        }
        let total_tokens: usize = sized.iter().map(|c| c.num_tokens).sum();
        let total_bytes: usize = sized.iter().map(|c| c.num_bytes).sum();
        tracing::info!(
            "Chunked {:?}: {} chunks, {} tokens, {} bytes",
            path,
            sized.len(),
            total_tokens,
            total_bytes
        );

        Ok(sized)
    }

    /// Measure chunks, then run the byte pass and the token pass
    pub fn enforce(&self, chunks: Vec<Chunk>) -> Vec<SizedChunk> {
        let sized = chunks.into_iter().map(|c| self.measure(c)).collect();
        let sized = self.filter_by_bytes(sized);
        self.filter_by_tokens(sized)
    }

    fn measure(&self, chunk: Chunk) -> SizedChunk {
        let num_tokens = self.tokenizer.count(&chunk.content);
        SizedChunk::new(chunk, num_tokens)
    }

    fn filter_by_bytes(&self, chunks: Vec<SizedChunk>) -> Vec<SizedChunk> {
        let limit = self.limits.byte_limit;
        self.resplit(chunks, &self.bytes_splitter, |c| c.num_bytes > limit)
    }

    fn filter_by_tokens(&self, chunks: Vec<SizedChunk>) -> Vec<SizedChunk> {
        let limit = self.limits.token_limit;
        self.resplit(chunks, &self.token_splitter, |c| c.num_tokens > limit)
    }

    /// Replace each oversized chunk by its sub-chunks. Each sub-chunk
    /// gets its own copy of the parent metadata; sizes are recomputed.
    fn resplit(
        &self,
        chunks: Vec<SizedChunk>,
        splitter: &dyn TextSplitter,
        oversized: impl Fn(&SizedChunk) -> bool,
    ) -> Vec<SizedChunk> {
        let mut out = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            if !oversized(&chunk) {
                out.push(chunk);
                continue;
            }

            let pieces = splitter.split_text(&chunk.content);
            tracing::debug!(
                "Re-split chunk of {} tokens / {} bytes into {} pieces",
                chunk.num_tokens,
                chunk.num_bytes,
                pieces.len()
            );
            out.extend(
                pieces
                    .into_iter()
                    .map(|piece| self.measure(Chunk::new(piece.content, chunk.metadata.clone()))),
            );
        }

        out
    }
}
