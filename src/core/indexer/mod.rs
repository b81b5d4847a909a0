//! Document ingestion module.
//!
//! Handles file discovery and the ingestion pipeline that turns
//! documents into embedded, size-bounded vector records:
//!
//! - Extension allow-list with exclude patterns and a size cap
//! - Lazy per-file chunk stream
//! - Full index rebuild with batched upserts
//! - Query by embedding the text and searching the same index

pub mod pipeline;
pub mod walker;

pub use pipeline::{FileChunks, IngestionPipeline};
pub use walker::{Discovery, FileWalker};
