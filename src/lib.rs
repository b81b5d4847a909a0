//! docrag - document ingestion for retrieval-augmented generation
//!
//! Splits Markdown and PDF documents along their structure, bounds
//! every chunk by a token ceiling and a byte ceiling, embeds the
//! chunks and stores them in a vector index for nearest-neighbour
//! retrieval.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - chunking (structural splitters, sliding windows, enforcer)
//!   - indexer (file discovery, ingestion pipeline)
//!   - embedding (OpenAI-compatible and offline providers)
//!   - store (local vector index)
//!   - services (service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Example
//!
//! ```
//! use docrag::chunking::{BytesSplitter, TextSplitter};
//!
//! let splitter = BytesSplitter::new(4, 2).unwrap();
//! let chunks = splitter.split_text("abcdef");
//! let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
//! assert_eq!(texts, vec!["abcd", "cdef", "ef"]);
//! ```

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used modules and types for convenience
pub use core::chunking;
pub use core::config::Config;
pub use core::embedding::{Embedder, HashingEmbedder, OpenAiEmbedder};
pub use core::error::{RagError, Result};
pub use core::indexer::{FileChunks, IngestionPipeline};
pub use core::services::Services;
pub use core::store::{LocalVectorStore, VectorStore};
pub use core::types::*;
