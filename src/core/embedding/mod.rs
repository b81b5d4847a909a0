//! Text embedding providers.
//!
//! - [`OpenAiEmbedder`]: remote OpenAI-compatible `/embeddings` API
//! - [`HashingEmbedder`]: offline, deterministic feature hashing

pub mod hashing;
pub mod openai;

use crate::core::config::EmbeddingConfig;
use crate::core::error::{RagError, Result};
use std::time::Duration;

pub use hashing::HashingEmbedder;
pub use openai::OpenAiEmbedder;

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Maps text to a fixed-length vector
pub trait Embedder {
    /// Embed one text. Provider failures are returned, never retried.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Length of every returned vector
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Build the configured provider.
///
/// `dimension` is the vector store's dimension; it is used when the
/// provider has no explicit `dimensions` setting.
pub fn create_embedder(config: &EmbeddingConfig, dimension: usize) -> Result<Box<dyn Embedder>> {
    match config.provider.as_str() {
        "openai" => {
            let api_key = std::env::var(OPENAI_API_KEY_ENV).map_err(|_| {
                RagError::ConfigError(format!(
                    "{OPENAI_API_KEY_ENV} must be set to use the openai embedding provider"
                ))
            })?;
            let embedder = OpenAiEmbedder::new(
                &api_key,
                &config.base_url,
                &config.model,
                config.dimensions,
                dimension,
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Box::new(embedder))
        }
        "hashing" => Ok(Box::new(HashingEmbedder::new(
            config.dimensions.unwrap_or(dimension),
        ))),
        other => Err(RagError::ConfigError(format!(
            "Unknown embedding provider '{other}'"
        ))),
    }
}
