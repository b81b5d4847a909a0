//! Error types and error handling for the docrag pipeline.
//!
//! Every failure in the core is fail-fast: loaders, splitters,
//! embedders and the vector store all surface a [`RagError`] and
//! nothing retries. The CLI adapter turns these into a single
//! `Error: ...` line and a non-zero exit code.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for docrag operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Main error type for the docrag pipeline
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Failed to load {path:?}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("No chunks were created from the file: {0:?}")]
    EmptyDocument(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Invalid source path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    Storage(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl RagError {
    /// Build a load failure for `path`
    pub fn load(path: &Path, reason: impl ToString) -> Self {
        RagError::LoadFailed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, RagError::InvalidPath(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            RagError::InvalidQuery(_)
                | RagError::UnsupportedFileType(_)
                | RagError::ConfigError(_)
        )
    }

    /// Check if the failure came from a remote collaborator
    /// (embedding provider or vector store)
    pub fn is_remote(&self) -> bool {
        matches!(self, RagError::Embedding(_) | RagError::Storage(_))
    }
}
