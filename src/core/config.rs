//! Configuration management for docrag.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults for all settings. The
//! resulting [`Config`] is passed explicitly to every constructor.

use crate::core::chunking::enforcer::SizeLimits;
use crate::core::chunking::tokenizer::SUPPORTED_TOKENIZERS;
use crate::core::error::{RagError, Result};
use crate::core::store::DistanceMetric;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Embedding providers accepted by `embedding.provider`
pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "hashing"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chunk size ceilings and splitter windows
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Token ceiling imposed by the embedding model
    #[serde(default = "default_token_limit")]
    pub token_limit: usize,

    /// Byte ceiling imposed by the vector store metadata
    #[serde(default = "default_byte_limit")]
    pub byte_limit: usize,

    /// BPE encoding used for counting
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,

    /// Overlap of the enforcer's token re-split windows
    #[serde(default = "default_token_overlap")]
    pub token_overlap: usize,

    /// Overlap of the enforcer's byte re-split windows
    #[serde(default = "default_byte_overlap")]
    pub byte_overlap: usize,

    /// Bytes kept free for metadata stored next to the content
    #[serde(default = "default_metadata_reserve_bytes")]
    pub metadata_reserve_bytes: usize,

    /// PDF spans at or above this size (points) start a new chunk
    #[serde(default = "default_min_header_font")]
    pub min_header_font: f32,

    /// Standalone token splitter window
    #[serde(default = "default_token_splitter_chunk_size")]
    pub token_splitter_chunk_size: usize,

    #[serde(default = "default_token_splitter_chunk_overlap")]
    pub token_splitter_chunk_overlap: usize,

    /// Standalone byte splitter window
    #[serde(default = "default_bytes_splitter_chunk_size")]
    pub bytes_splitter_chunk_size: usize,

    #[serde(default = "default_bytes_splitter_chunk_overlap")]
    pub bytes_splitter_chunk_overlap: usize,
}

/// File discovery and batching
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Accepted file types (compared case-insensitively)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Records per upsert call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

/// Embedding provider settings. The API key is read from
/// `OPENAI_API_KEY` and never stored here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// `openai` or `hashing`
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Requested output dimensions (model default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Vector store settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Root directory for local indexes
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Vector dimension of the index
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default)]
    pub distance_metric: DistanceMetric,
}

/// Logging settings (`RUST_LOG` takes precedence over `level`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable logs
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_token_limit() -> usize {
    8192
}

fn default_byte_limit() -> usize {
    40960
}

fn default_tokenizer() -> String {
    "cl100k_base".to_string()
}

fn default_token_overlap() -> usize {
    1000
}

fn default_byte_overlap() -> usize {
    1000
}

fn default_metadata_reserve_bytes() -> usize {
    1024
}

fn default_min_header_font() -> f32 {
    14.0
}

fn default_token_splitter_chunk_size() -> usize {
    5000
}

fn default_token_splitter_chunk_overlap() -> usize {
    1000
}

fn default_bytes_splitter_chunk_size() -> usize {
    30000
}

fn default_bytes_splitter_chunk_overlap() -> usize {
    5000
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["pdf".to_string(), "md".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ]
}

fn default_batch_size() -> usize {
    40
}

fn default_max_file_size() -> usize {
    100
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "text-embedding-3-large".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_index_name() -> String {
    "docrag-index".to_string()
}

fn default_dimension() -> usize {
    3072
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            token_limit: default_token_limit(),
            byte_limit: default_byte_limit(),
            tokenizer: default_tokenizer(),
            token_overlap: default_token_overlap(),
            byte_overlap: default_byte_overlap(),
            metadata_reserve_bytes: default_metadata_reserve_bytes(),
            min_header_font: default_min_header_font(),
            token_splitter_chunk_size: default_token_splitter_chunk_size(),
            token_splitter_chunk_overlap: default_token_splitter_chunk_overlap(),
            bytes_splitter_chunk_size: default_bytes_splitter_chunk_size(),
            bytes_splitter_chunk_overlap: default_bytes_splitter_chunk_overlap(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            exclude_patterns: default_exclude_patterns(),
            batch_size: default_batch_size(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            dimensions: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_name: default_index_name(),
            dimension: default_dimension(),
            distance_metric: DistanceMetric::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RagError::ConfigError(format!("Failed to read config file {path:?}: {e}"))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg, None)
    }

    /// Load config with explicit XDG directories
    ///
    /// File priority:
    /// 1. `explicit` (the `--config` flag)
    /// 2. DOCRAG_CONFIG env var, else the XDG config file
    ///    (~/.config/docrag/config.toml) when it exists
    /// 3. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs, explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let xdg_config = xdg.config_file();
                if env::var("DOCRAG_CONFIG").is_ok() || xdg_config.exists() {
                    Self::from_file(xdg_config)?
                } else {
                    Self::default()
                }
            }
        };

        // Keep indexes under the XDG data directory unless set explicitly
        if env::var("DOCRAG_DATA_DIR").is_err() && config.store.data_dir == default_data_dir() {
            config.store.data_dir = xdg.indexes_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Chunking configuration
        if let Some(limit) = parse_env("DOCRAG_TOKEN_LIMIT") {
            self.chunking.token_limit = limit;
        }
        if let Some(limit) = parse_env("DOCRAG_BYTE_LIMIT") {
            self.chunking.byte_limit = limit;
        }
        if let Ok(tokenizer) = env::var("DOCRAG_TOKENIZER") {
            self.chunking.tokenizer = tokenizer;
        }

        // Indexing configuration
        if let Some(size) = parse_env("DOCRAG_BATCH_SIZE") {
            self.indexing.batch_size = size;
        }

        // Embedding configuration
        if let Ok(provider) = env::var("DOCRAG_EMBEDDING_PROVIDER") {
            self.embedding.provider = provider;
        }
        if let Ok(model) = env::var("DOCRAG_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }

        // Store configuration
        if let Ok(data_dir) = env::var("DOCRAG_DATA_DIR") {
            self.store.data_dir = PathBuf::from(data_dir).join("indexes");
        }
        if let Ok(name) = env::var("DOCRAG_INDEX_NAME") {
            self.store.index_name = name;
        }

        // Logging configuration
        if let Ok(level) = env::var("DOCRAG_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Size limits handed to the chunk enforcer
    pub fn size_limits(&self) -> SizeLimits {
        SizeLimits::from_config(&self.chunking)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let chunking = &self.chunking;

        if chunking.token_limit == 0 || chunking.byte_limit == 0 {
            return Err(RagError::ConfigError(
                "Token and byte limits must be non-zero".to_string(),
            ));
        }

        // Both enforcer windows must exist and exceed their overlaps
        let limits = self.size_limits();
        limits.token_window()?;
        limits.byte_window()?;

        if chunking.token_splitter_chunk_overlap >= chunking.token_splitter_chunk_size {
            return Err(RagError::ConfigError(
                "Token splitter overlap must be less than its chunk size".to_string(),
            ));
        }

        if chunking.bytes_splitter_chunk_overlap >= chunking.bytes_splitter_chunk_size {
            return Err(RagError::ConfigError(
                "Bytes splitter overlap must be less than its chunk size".to_string(),
            ));
        }

        if !SUPPORTED_TOKENIZERS.contains(&chunking.tokenizer.as_str()) {
            return Err(RagError::ConfigError(format!(
                "Unknown tokenizer '{}'. Supported: {}",
                chunking.tokenizer,
                SUPPORTED_TOKENIZERS.join(", ")
            )));
        }

        if !(chunking.min_header_font > 0.0) {
            return Err(RagError::ConfigError(
                "Minimum header font must be positive".to_string(),
            ));
        }

        // Validate indexing config
        if self.indexing.allowed_extensions.is_empty() {
            return Err(RagError::ConfigError(
                "At least one allowed extension is required".to_string(),
            ));
        }

        if self.indexing.batch_size == 0 {
            return Err(RagError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        // Validate embedding config
        if !SUPPORTED_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(RagError::ConfigError(format!(
                "Unknown embedding provider '{}'. Supported: {}",
                self.embedding.provider,
                SUPPORTED_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.timeout_secs == 0 {
            return Err(RagError::ConfigError(
                "Embedding timeout must be non-zero".to_string(),
            ));
        }

        if let Some(dimensions) = self.embedding.dimensions {
            if dimensions != self.store.dimension {
                return Err(RagError::ConfigError(format!(
                    "embedding.dimensions ({dimensions}) must match store.dimension ({})",
                    self.store.dimension
                )));
            }
        }

        // Validate store config
        if self.store.dimension == 0 {
            return Err(RagError::ConfigError(
                "Vector dimension must be non-zero".to_string(),
            ));
        }

        if self.store.index_name.trim().is_empty() {
            return Err(RagError::ConfigError(
                "Index name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (the API key is never part of it)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Token limit: {}", self.chunking.token_limit);
        tracing::info!("  Byte limit: {}", self.chunking.byte_limit);
        tracing::info!("  Tokenizer: {}", self.chunking.tokenizer);
        tracing::info!(
            "  Allowed extensions: {:?}",
            self.indexing.allowed_extensions
        );
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.indexing.exclude_patterns.len()
        );
        tracing::info!("  Batch size: {}", self.indexing.batch_size);
        tracing::info!(
            "  Embedding: {} ({})",
            self.embedding.provider,
            self.embedding.model
        );
        tracing::info!("  Data dir: {:?}", self.store.data_dir);
        tracing::info!("  Index: {}", self.store.index_name);
        tracing::info!(
            "  Dimension: {} ({:?})",
            self.store.dimension,
            self.store.distance_metric
        );
    }
}
