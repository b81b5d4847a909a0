//! docrag CLI - ingest documents into a vector index and query it
//!
//! # Examples
//!
//! ```bash
//! # Rebuild the index from a directory of Markdown and PDF files
//! docrag ingest ./docs
//!
//! # Query it
//! docrag query "how are chunks bounded?" -k 3
//!
//! # Inspect how one file is chunked
//! docrag chunk ./docs/guide.md
//!
//! # Show configuration
//! docrag show-config
//! ```

use clap::Parser;
use docrag::cli::{error_hint, load_config, run, Cli, Commands};
use docrag::core::config::LoggingConfig;
use docrag::core::xdg::XdgDirs;
use tracing_subscriber::EnvFilter;

/// Initialize logging on stderr; RUST_LOG wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docrag={}", logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    if logging.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = start(cli) {
        eprintln!("Error: {e}");
        if let Some(hint) = error_hint(e.as_ref()) {
            eprintln!("  hint: {hint}");
        }
        std::process::exit(1);
    }
}

fn start(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Completions need neither config nor logging
    if !matches!(cli.command, Commands::Completions(_)) {
        let config = load_config(cli.config.as_deref())?;
        init_tracing(&config.logging);
        XdgDirs::new().log_paths();
        config.log_config();
        return run(cli, config);
    }

    run(cli, Default::default())
}
