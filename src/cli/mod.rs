//! CLI adapter for docrag
//!
//! Provides the command-line interface over the ingestion pipeline.
//! Depends on `core/`; nothing in `core/` depends on it.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     core/        |
//! |  (domain logic)  |
//! +--------+---------+
//!          |
//!          v
//! +------------------+
//! |      cli/        |
//! | (clap adapter)   |
//! +------------------+
//! ```

pub mod commands;
pub mod output;

use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// docrag - Document ingestion for retrieval-augmented generation
///
/// Split Markdown and PDF documents into size-bounded chunks, embed
/// them and store them in a local vector index, then query it.
#[derive(Parser, Debug)]
#[command(name = "docrag")]
#[command(version)]
#[command(about = "Document chunking, embedding and retrieval", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (overrides DOCRAG_CONFIG and the XDG config file)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the index from a file or directory
    Ingest(commands::IngestArgs),

    /// Query the index with free text
    Query(commands::QueryArgs),

    /// Chunk one file and print the chunks without embedding them
    Chunk(commands::ChunkArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docrag completions bash > ~/.local/share/bash-completion/completions/docrag
    ///   zsh:   docrag completions zsh > ~/.zfunc/_docrag
    ///   fish:  docrag completions fish > ~/.config/fish/completions/docrag.fish
    Completions(commands::CompletionsArgs),
}

/// Load configuration for a CLI invocation
pub fn load_config(explicit: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;
    Ok(Config::load_with_xdg(&xdg, explicit)?)
}

/// Follow-up advice printed under a failed command's error line
pub fn error_hint(err: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    use crate::core::error::RagError;

    let err = err.downcast_ref::<RagError>()?;
    if err.is_not_found() {
        Some("pass an existing file or directory")
    } else if err.is_bad_request() {
        Some("check the arguments and `docrag show-config`")
    } else {
        None
    }
}

/// Run a command with an already loaded configuration
pub fn run(cli: Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::services::Services;

    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let services = Services::new(config)?;

    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &services, cli.format),
        Commands::Query(args) => commands::query::execute(args, &services, cli.format),
        Commands::Chunk(args) => commands::chunk::execute(args, &services, cli.format),
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
