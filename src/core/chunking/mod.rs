//! Document chunking.
//!
//! Two layers of splitting:
//!
//! - Structural splitters (`markdown`, `pdf`) cut a loaded document
//!   along headers or font-size jumps.
//! - Primitive splitters (`primitive`) cut raw text into overlapping
//!   byte or token windows.
//!
//! The [`ChunkEnforcer`] chains them so that every emitted chunk fits
//! both the token ceiling and the byte ceiling.

pub mod enforcer;
pub mod markdown;
pub mod pdf;
pub mod primitive;
pub mod registry;
pub mod tokenizer;

use crate::core::error::Result;
use crate::core::types::{Chunk, Document};
use std::path::Path;

pub use enforcer::{ChunkEnforcer, SizeLimits};
pub use markdown::MarkdownSplitter;
pub use pdf::PdfSplitter;
pub use primitive::{BytesSplitter, TextSplitter, TokenSplitter};
pub use registry::{file_type, SplitterRegistry};
pub use tokenizer::{TiktokenTokenizer, Tokenizer};

/// Load a document and split it along its structure
pub trait StructuralSplitter: Send + Sync {
    /// Value recorded under the `type` metadata key
    fn doc_type(&self) -> &'static str;

    /// Read the document at `path`
    fn load(&self, path: &Path) -> Result<Document>;

    /// Split a loaded document into structural chunks
    fn split(&self, document: &Document) -> Result<Vec<Chunk>>;
}

impl std::fmt::Debug for dyn StructuralSplitter + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StructuralSplitter({})", self.doc_type())
    }
}
