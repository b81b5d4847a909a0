// Chunk enforcer tests: ceilings, pass ordering, metadata isolation

use crate::common::CharTokenizer;
use docrag::chunking::{
    BytesSplitter, ChunkEnforcer, SizeLimits, TextSplitter, TiktokenTokenizer, TokenSplitter,
    Tokenizer,
};
use docrag::{Chunk, Metadata, MetadataValue, NUM_BYTES_KEY, NUM_TOKENS_KEY, SOURCE_KEY};
use std::sync::Arc;

fn sourced(content: &str) -> Chunk {
    let mut metadata = Metadata::new();
    metadata.insert(SOURCE_KEY.to_string(), "manual.md".into());
    metadata.insert("Doc Section level 1".to_string(), "Intro".into());
    Chunk::new(content, metadata)
}

/// Token window 40, byte window 180
fn char_limits() -> SizeLimits {
    SizeLimits {
        token_limit: 60,
        byte_limit: 200,
        token_overlap: 2,
        byte_overlap: 2,
        metadata_reserve_bytes: 0,
    }
}

#[test]
fn test_ceilings_hold_with_bpe_tokenizer() {
    let tokenizer: Arc<dyn Tokenizer> = Arc::new(TiktokenTokenizer::new("cl100k_base").unwrap());
    let limits = SizeLimits {
        token_limit: 200,
        byte_limit: 600,
        token_overlap: 10,
        byte_overlap: 20,
        metadata_reserve_bytes: 50,
    };
    let enforcer = ChunkEnforcer::new(tokenizer, limits).unwrap();

    let text = "Ownership rules 所有権 🦀 borrow checker émigré, lifetimes σ∑ and traits. ".repeat(300);
    let chunks = enforcer.enforce(vec![sourced(&text), sourced("short and fine")]);

    assert!(chunks.len() > 2);
    for chunk in &chunks {
        assert!(
            chunk.num_bytes <= limits.byte_limit,
            "chunk of {} bytes exceeds {}",
            chunk.num_bytes,
            limits.byte_limit
        );
        assert!(
            chunk.num_tokens <= limits.token_limit,
            "chunk of {} tokens exceeds {}",
            chunk.num_tokens,
            limits.token_limit
        );
    }
}

#[test]
fn test_byte_pass_runs_before_token_pass() {
    let tokenizer: Arc<dyn Tokenizer> = Arc::new(CharTokenizer);
    let limits = char_limits();
    let enforcer = ChunkEnforcer::new(Arc::clone(&tokenizer), limits).unwrap();

    // 300 chars, 600 bytes: over both ceilings
    let text = "é".repeat(300);
    let byte_first = enforcer.enforce(vec![sourced(&text)]);

    // Reverse order by hand: token windows, then byte windows
    let token_splitter = TokenSplitter::new(tokenizer, 40, 2).unwrap();
    let bytes_splitter = BytesSplitter::new(180, 2).unwrap();
    let token_first: Vec<Chunk> = token_splitter
        .split_text(&text)
        .into_iter()
        .flat_map(|piece| {
            if piece.content.len() > limits.byte_limit {
                bytes_splitter.split_text(&piece.content)
            } else {
                vec![piece]
            }
        })
        .collect();

    assert_eq!(byte_first.len(), 10);
    assert_eq!(token_first.len(), 8);
}

#[test]
fn test_compliant_chunk_passes_through() {
    let enforcer = ChunkEnforcer::new(Arc::new(CharTokenizer), char_limits()).unwrap();

    let chunks = enforcer.enforce(vec![sourced("already small")]);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "already small");
    assert_eq!(chunks[0].metadata[NUM_TOKENS_KEY], MetadataValue::Integer(13));
    assert_eq!(chunks[0].metadata[NUM_BYTES_KEY], MetadataValue::Integer(13));
    assert_eq!(chunks[0].metadata["Doc Section level 1"].as_str(), Some("Intro"));
}

#[test]
fn test_sub_chunks_have_independent_metadata() {
    let enforcer = ChunkEnforcer::new(Arc::new(CharTokenizer), char_limits()).unwrap();

    let mut chunks = enforcer.enforce(vec![sourced(&"a".repeat(500))]);
    assert!(chunks.len() > 2);

    chunks[0]
        .metadata
        .insert(SOURCE_KEY.to_string(), "mutated.md".into());

    for sibling in &chunks[1..] {
        assert_eq!(sibling.metadata[SOURCE_KEY].as_str(), Some("manual.md"));
    }
}

#[test]
fn test_sub_chunks_are_remeasured() {
    let enforcer = ChunkEnforcer::new(Arc::new(CharTokenizer), char_limits()).unwrap();

    let chunks = enforcer.enforce(vec![sourced(&"ab".repeat(150))]);

    for chunk in &chunks {
        let tokens = chunk.content.chars().count();
        assert_eq!(chunk.num_tokens, tokens);
        assert_eq!(chunk.num_bytes, chunk.content.len());
        assert_eq!(
            chunk.metadata[NUM_TOKENS_KEY],
            MetadataValue::Integer(tokens as i64)
        );
    }
}

#[test]
fn test_order_of_chunks_is_preserved() {
    let enforcer = ChunkEnforcer::new(Arc::new(CharTokenizer), char_limits()).unwrap();

    let first = "x".repeat(100);
    let chunks = enforcer.enforce(vec![sourced(&first), sourced("tail")]);

    assert_eq!(chunks.last().unwrap().content, "tail");
    assert!(chunks[..chunks.len() - 1]
        .iter()
        .all(|c| c.content.chars().all(|ch| ch == 'x')));
}

#[test]
fn test_limits_without_room_are_rejected() {
    let limits = SizeLimits {
        token_limit: 20,
        byte_limit: 200,
        token_overlap: 2,
        byte_overlap: 2,
        metadata_reserve_bytes: 0,
    };
    assert!(ChunkEnforcer::new(Arc::new(CharTokenizer), limits).is_err());
}
