//! Sliding-window text splitters.
//!
//! Both splitters produce windows starting at offsets
//! `0, step, 2*step, ...` with `step = chunk_size - chunk_overlap`,
//! each spanning `[start, start + chunk_size)` units of their metric.
//! Windows stop once `start >= len`, so empty input yields nothing.
//!
//! The byte splitter cuts raw UTF-8, and the token splitter cuts the
//! token sequence. Either may land inside a multi-byte character;
//! decoding substitutes U+FFFD instead of failing, so both are total.
//!
//! # Example
//!
//! ```
//! use docrag::chunking::{BytesSplitter, TextSplitter};
//!
//! let splitter = BytesSplitter::new(4, 2).unwrap();
//! let chunks = splitter.split_text("abcdef");
//!
//! let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
//! assert_eq!(contents, vec!["abcd", "cdef", "ef"]);
//! ```

use crate::core::chunking::tokenizer::Tokenizer;
use crate::core::error::{RagError, Result};
use crate::core::types::{Chunk, Metadata, CHUNK_NUM_KEY};
use std::ops::Range;
use std::sync::Arc;

/// Split raw text into ordered, overlapping windows under one
/// size metric.
pub trait TextSplitter {
    /// Split `text`, tagging each window with `chunk_num`
    fn split_text(&self, text: &str) -> Vec<Chunk>;

    /// Window size in the splitter's unit
    fn chunk_size(&self) -> usize;

    /// Overlap between consecutive windows
    fn chunk_overlap(&self) -> usize;
}

/// Validated window geometry shared by both splitters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    size: usize,
    overlap: usize,
}

impl Window {
    fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(RagError::ConfigError(
                "chunk_size must be > 0".to_string(),
            ));
        }
        if overlap >= size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({overlap}) must be < chunk_size ({size})"
            )));
        }
        Ok(Self { size, overlap })
    }

    fn step(&self) -> usize {
        self.size - self.overlap
    }

    /// Half-open ranges covering `0..len`
    fn ranges(&self, len: usize) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..len)
            .step_by(self.step())
            .map(move |start| start..(start + self.size).min(len))
    }
}

fn numbered(index: usize, content: String) -> Chunk {
    let mut metadata = Metadata::new();
    metadata.insert(CHUNK_NUM_KEY.to_string(), index.into());
    Chunk::new(content, metadata)
}

/// Byte-bounded sliding window over the UTF-8 encoding
#[derive(Debug, Clone)]
pub struct BytesSplitter {
    window: Window,
}

impl BytesSplitter {
    /// Create a splitter; fails if `chunk_size` is 0 or
    /// `chunk_overlap >= chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Ok(Self {
            window: Window::new(chunk_size, chunk_overlap)?,
        })
    }
}

impl TextSplitter for BytesSplitter {
    fn split_text(&self, text: &str) -> Vec<Chunk> {
        let data = text.as_bytes();

        self.window
            .ranges(data.len())
            .enumerate()
            .map(|(i, range)| numbered(i, String::from_utf8_lossy(&data[range]).into_owned()))
            .collect()
    }

    fn chunk_size(&self) -> usize {
        self.window.size
    }

    fn chunk_overlap(&self) -> usize {
        self.window.overlap
    }
}

/// Token-bounded sliding window over a tokenizer's encoding
#[derive(Clone)]
pub struct TokenSplitter {
    window: Window,
    tokenizer: Arc<dyn Tokenizer>,
}

impl TokenSplitter {
    /// Create a splitter; fails if `chunk_size` is 0 or
    /// `chunk_overlap >= chunk_size`
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self> {
        Ok(Self {
            window: Window::new(chunk_size, chunk_overlap)?,
            tokenizer,
        })
    }
}

impl std::fmt::Debug for TokenSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSplitter")
            .field("window", &self.window)
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

impl TextSplitter for TokenSplitter {
    fn split_text(&self, text: &str) -> Vec<Chunk> {
        let tokens = self.tokenizer.encode(text);

        self.window
            .ranges(tokens.len())
            .enumerate()
            .map(|(i, range)| numbered(i, self.tokenizer.decode_lossy(&tokens[range])))
            .collect()
    }

    fn chunk_size(&self) -> usize {
        self.window.size
    }

    fn chunk_overlap(&self) -> usize {
        self.window.overlap
    }
}
