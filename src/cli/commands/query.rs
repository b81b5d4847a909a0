//! Query command - nearest-neighbour search over the index

use crate::cli::output::{colors, print_excerpt, print_json};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::{Metadata, CONTENT_KEY, SOURCE_KEY};
use clap::Args;
use serde::Serialize;

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query text
    pub text: String,

    /// Number of results to return
    #[arg(long = "top-k", short = 'k', default_value = "5")]
    pub top_k: usize,

    /// Print the full chunk content instead of an excerpt
    #[arg(long)]
    pub full: bool,
}

/// Query result item
#[derive(Debug, Serialize)]
pub struct QueryResultItem {
    pub rank: usize,
    pub key: String,
    pub score: f32,
    pub metadata: Metadata,
}

/// Query response
#[derive(Debug, Serialize)]
pub struct QueryResponseOutput {
    pub query: String,
    pub index: String,
    pub total_results: usize,
    pub results: Vec<QueryResultItem>,
}

/// Execute the query command
pub fn execute(
    args: QueryArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = services.create_pipeline()?;
    let results = pipeline.query(&args.text, args.top_k)?;

    let output = QueryResponseOutput {
        query: args.text.clone(),
        index: services.config.store.index_name.clone(),
        total_results: results.len(),
        results: results
            .into_iter()
            .enumerate()
            .map(|(i, r)| QueryResultItem {
                rank: i + 1,
                key: r.key,
                score: r.score,
                metadata: r.metadata,
            })
            .collect(),
    };

    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!(
                    "No results for '{}' in '{}'",
                    colors::label(&output.query),
                    colors::key(&output.index)
                );
                return Ok(());
            }

            println!(
                "Found {} result(s) in '{}':\n",
                colors::number(&output.total_results.to_string()),
                colors::key(&output.index)
            );
            for result in &output.results {
                let source = result
                    .metadata
                    .get(SOURCE_KEY)
                    .and_then(|v| v.as_str())
                    .unwrap_or("<unknown>");
                println!(
                    "[{}] {} {}",
                    colors::rank(&result.rank.to_string()),
                    colors::file_path(source),
                    colors::score(&format!("(distance: {:.4})", result.score))
                );
                let content = result
                    .metadata
                    .get(CONTENT_KEY)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                if args.full {
                    println!("{content}");
                } else {
                    print_excerpt(content, 5);
                }
                println!();
            }
        }
        OutputFormat::Json => print_json(&output)?,
    }

    Ok(())
}
