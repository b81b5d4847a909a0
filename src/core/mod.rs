//! Core domain logic (adapter-agnostic)
//!
//! This module contains all ingestion and retrieval logic that is
//! independent of the command-line surface.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **chunking**: Structural and primitive splitters, size enforcement
//! - **indexer**: File discovery and the ingestion pipeline
//! - **embedding**: Embedding providers
//! - **store**: Vector index storage and nearest-neighbour search
//! - **services**: Service container built from configuration

pub mod chunking;
pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{RagError, Result};
pub use services::Services;
