//! Core data types for the docrag pipeline.
//!
//! Chunks carry their metadata by value. Every split boundary
//! clones the parent map, so sibling chunks never share state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Metadata key holding the source file path
pub const SOURCE_KEY: &str = "source";

/// Metadata key holding the document type (`pdf`, `MD`)
pub const TYPE_KEY: &str = "type";

/// Metadata key holding a primitive splitter's window number
pub const CHUNK_NUM_KEY: &str = "chunk_num";

/// Metadata key holding the chunk's token count
pub const NUM_TOKENS_KEY: &str = "num_tokens";

/// Metadata key holding the chunk's UTF-8 byte length
pub const NUM_BYTES_KEY: &str = "num_bytes";

/// Metadata key under which a vector record stores the chunk text
pub const CONTENT_KEY: &str = "content";

/// A single metadata value (string or number)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    /// Borrow the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as an integer, if it is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Integer(n) => write!(f, "{n}"),
            MetadataValue::Float(x) => write!(f, "{x}"),
            MetadataValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        MetadataValue::Integer(value as i64)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

/// Ordered metadata map. Ordering keeps serialized preambles and
/// stored records deterministic.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// One text span on a PDF page: a run drawn with a single font size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpan {
    pub text: String,
    /// Effective font size in points
    pub size: f32,
}

/// A line of spans
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

/// A text block (one `BT`..`ET` object)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

/// A parsed PDF page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PdfPage {
    pub blocks: Vec<TextBlock>,
}

/// Loaded content of a source document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentContent {
    /// Decoded text (Markdown)
    Text(String),
    /// Page/block/line/span layout (PDF)
    Pages(Vec<PdfPage>),
}

/// A loaded source document plus provenance metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: PathBuf,
    pub content: DocumentContent,
    pub metadata: Metadata,
}

/// A chunk of content plus metadata, as produced by a splitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: Metadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// A chunk whose token and byte sizes have been measured.
///
/// The counts are mirrored into `metadata` under
/// [`NUM_TOKENS_KEY`] and [`NUM_BYTES_KEY`] so they travel with
/// the vector record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedChunk {
    pub content: String,
    pub metadata: Metadata,
    pub num_tokens: usize,
    pub num_bytes: usize,
}

impl SizedChunk {
    /// Attach measured sizes to a chunk
    pub fn new(chunk: Chunk, num_tokens: usize) -> Self {
        let Chunk {
            content,
            mut metadata,
        } = chunk;
        let num_bytes = content.len();
        metadata.insert(NUM_TOKENS_KEY.to_string(), num_tokens.into());
        metadata.insert(NUM_BYTES_KEY.to_string(), num_bytes.into());

        Self {
            content,
            metadata,
            num_tokens,
            num_bytes,
        }
    }

    /// Source path recorded in the metadata, if any
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(MetadataValue::as_str)
    }
}

/// A (key, vector, metadata) triple stored in the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub key: String,
    pub vector: Vec<f32>,
    pub metadata: Metadata,
}

impl VectorRecord {
    /// Wrap an embedded chunk with a fresh key.
    ///
    /// The record metadata is a copy of the chunk metadata plus the
    /// full chunk text under [`CONTENT_KEY`].
    pub fn from_chunk(chunk: &SizedChunk, vector: Vec<f32>) -> Self {
        let mut metadata = chunk.metadata.clone();
        metadata.insert(CONTENT_KEY.to_string(), chunk.content.clone().into());

        Self {
            key: Uuid::new_v4().simple().to_string(),
            vector,
            metadata,
        }
    }
}

/// Raw nearest-neighbour hit returned by a vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub key: String,
    pub distance: f32,
    pub metadata: Metadata,
}

/// A query hit as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub key: String,
    pub score: f32,
    pub metadata: Metadata,
}

impl QueryResult {
    /// Chunk text stored with the record
    pub fn content(&self) -> Option<&str> {
        self.metadata.get(CONTENT_KEY).and_then(MetadataValue::as_str)
    }
}

impl From<VectorMatch> for QueryResult {
    fn from(hit: VectorMatch) -> Self {
        Self {
            key: hit.key,
            score: hit.distance,
            metadata: hit.metadata,
        }
    }
}

/// Statistics about one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Files that produced chunks
    pub files_processed: usize,

    /// Files skipped at discovery time
    pub files_skipped: usize,

    /// Sized chunks embedded and upserted
    pub chunks_embedded: usize,

    /// Number of upsert calls issued
    pub upsert_batches: usize,

    /// Total tokens across all chunks
    pub total_tokens: usize,

    /// Total bytes across all chunks
    pub total_bytes: usize,

    /// Duration in milliseconds
    pub duration_ms: u64,
}
