//! Chunk command - show how a file would be chunked

use crate::cli::output::{colors, format_bytes, print_excerpt, print_json};
use crate::cli::OutputFormat;
use crate::core::chunking::TextSplitter;
use crate::core::error::RagError;
use crate::core::services::Services;
use crate::core::types::{Metadata, SizedChunk};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Standalone sliding window to apply instead of the full pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WindowKind {
    /// Byte-bounded windows (`bytes_splitter_chunk_size`)
    Bytes,
    /// Token-bounded windows (`token_splitter_chunk_size`)
    Tokens,
}

/// Arguments for the chunk command
#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// File to chunk
    pub file: PathBuf,

    /// Split the raw file text with one sliding window instead of the
    /// structural splitter and size enforcement
    #[arg(long, value_enum)]
    pub window: Option<WindowKind>,

    /// Print the full chunk content instead of an excerpt
    #[arg(long)]
    pub full: bool,
}

/// One chunk in the output
#[derive(Debug, Serialize)]
pub struct ChunkItem {
    pub index: usize,
    pub num_tokens: usize,
    pub num_bytes: usize,
    pub metadata: Metadata,
    pub content: String,
}

/// Chunk response
#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    pub file: String,
    pub mode: String,
    pub total_chunks: usize,
    pub chunks: Vec<ChunkItem>,
}

/// Execute the chunk command
pub fn execute(
    args: ChunkArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mode, chunks) = match args.window {
        None => ("structural", services.preview(&args.file)?),
        Some(kind) => {
            let bytes = fs::read(&args.file)
                .map_err(|e| RagError::load(&args.file, e.to_string()))?;
            let text = String::from_utf8_lossy(&bytes);
            let pieces = match kind {
                WindowKind::Bytes => services.bytes_splitter()?.split_text(&text),
                WindowKind::Tokens => services.token_splitter()?.split_text(&text),
            };
            let sized = pieces
                .into_iter()
                .map(|chunk| {
                    let num_tokens = services.tokenizer.count(&chunk.content);
                    SizedChunk::new(chunk, num_tokens)
                })
                .collect();
            let mode = match kind {
                WindowKind::Bytes => "bytes",
                WindowKind::Tokens => "tokens",
            };
            (mode, sized)
        }
    };

    let response = ChunkResponse {
        file: args.file.to_string_lossy().into_owned(),
        mode: mode.to_string(),
        total_chunks: chunks.len(),
        chunks: chunks
            .into_iter()
            .enumerate()
            .map(|(index, c)| ChunkItem {
                index,
                num_tokens: c.num_tokens,
                num_bytes: c.num_bytes,
                metadata: c.metadata,
                content: c.content,
            })
            .collect(),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} chunk(s) from {} ({})\n",
                colors::success("Produced"),
                colors::number(&response.total_chunks.to_string()),
                colors::file_path(&response.file),
                colors::dim(&response.mode)
            );
            for chunk in &response.chunks {
                println!(
                    "[{}] {} tokens, {}",
                    colors::rank(&chunk.index.to_string()),
                    colors::number(&chunk.num_tokens.to_string()),
                    colors::number(&format_bytes(chunk.num_bytes as u64))
                );
                if args.full {
                    println!("{}", chunk.content);
                } else {
                    print_excerpt(&chunk.content, 3);
                }
                println!();
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
