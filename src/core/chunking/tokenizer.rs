//! Token encoding used for counting and token-window splitting.

use crate::core::error::{RagError, Result};
use tiktoken_rs::CoreBPE;

/// Tokenizers accepted by the `chunking.tokenizer` setting
pub const SUPPORTED_TOKENIZERS: &[&str] = &["cl100k_base", "o200k_base", "p50k_base", "r50k_base"];

/// Text to token-id encoding.
///
/// Implementations must be total: `decode_lossy` never fails, even
/// when the id slice ends in the middle of a multi-byte character.
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode token ids, substituting U+FFFD for invalid UTF-8
    fn decode_lossy(&self, tokens: &[u32]) -> String;

    /// Number of tokens in `text`
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// Identifier of the encoding
    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tokenizer({})", self.name())
    }
}

/// BPE tokenizer backed by `tiktoken-rs`
pub struct TiktokenTokenizer {
    name: String,
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load a named encoding (`cl100k_base`, `o200k_base`, ...)
    pub fn new(name: &str) -> Result<Self> {
        let bpe = match name {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            other => {
                return Err(RagError::Tokenizer(format!(
                    "Unknown tokenizer '{other}'. Supported: {}",
                    SUPPORTED_TOKENIZERS.join(", ")
                )))
            }
        }
        .map_err(|e| RagError::Tokenizer(format!("Failed to load {name}: {e}")))?;

        tracing::debug!("Loaded tokenizer {}", name);

        Ok(Self {
            name: name.to_string(),
            bpe,
        })
    }
}

impl std::fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("name", &self.name)
            .finish()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text)
    }

    fn decode_lossy(&self, tokens: &[u32]) -> String {
        let bytes: Vec<u8> = self
            .bpe
            ._decode_native_and_split(tokens.to_vec())
            .flatten()
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
