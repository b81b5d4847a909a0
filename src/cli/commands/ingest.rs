//! Ingest command - rebuild the index from a file or directory

use crate::cli::output::{colors, format_bytes, format_duration, print_json, print_warning};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// File or directory to ingest (.md and .pdf by default)
    pub path: PathBuf,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Ingestion result response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub path: String,
    pub index: String,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub chunks_embedded: usize,
    pub upsert_batches: usize,
    pub total_tokens: usize,
    pub total_bytes: usize,
    pub duration_secs: f64,
}

/// Execute the ingest command
pub fn execute(
    args: IngestArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = services.create_pipeline()?;
    let index = services.config.store.index_name.clone();

    if !args.quiet && format == OutputFormat::Human {
        print_warning(&format!(
            "index '{index}' is rebuilt from scratch; existing records are deleted"
        ));
        eprintln!(
            "Ingesting {} into '{}'...",
            colors::file_path(&args.path.display().to_string()),
            colors::key(&index)
        );
    }

    let stats = pipeline.ingest(&args.path)?;

    let response = IngestResponse {
        path: args.path.to_string_lossy().into_owned(),
        index,
        files_processed: stats.files_processed,
        files_skipped: stats.files_skipped,
        chunks_embedded: stats.chunks_embedded,
        upsert_batches: stats.upsert_batches,
        total_tokens: stats.total_tokens,
        total_bytes: stats.total_bytes,
        duration_secs: stats.duration_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} files ({} chunks, {} batches) in {}",
                colors::success("Ingested"),
                colors::number(&response.files_processed.to_string()),
                colors::number(&response.chunks_embedded.to_string()),
                colors::number(&response.upsert_batches.to_string()),
                colors::number(&format_duration(response.duration_secs))
            );
            println!(
                "Tokens: {}  Size: {}  Skipped: {}",
                colors::number(&response.total_tokens.to_string()),
                colors::number(&format_bytes(response.total_bytes as u64)),
                colors::number(&response.files_skipped.to_string())
            );
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
