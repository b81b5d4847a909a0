//! Config command - show current configuration

use crate::cli::output::{colors, print_header, print_json};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Only print the config file path that would be read
    #[arg(long)]
    pub path: bool,
}

/// Windows the enforcer hands to its sub-splitters
#[derive(Debug, Serialize)]
pub struct DerivedWindows {
    pub token_window: usize,
    pub byte_window: usize,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub config: Config,
    pub windows: DerivedWindows,
}

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_file = XdgDirs::new().config_file().to_string_lossy().into_owned();

    if args.path {
        match format {
            OutputFormat::Human => println!("{config_file}"),
            OutputFormat::Json => print_json(&serde_json::json!({ "config_file": config_file }))?,
        }
        return Ok(());
    }

    let limits = services.enforcer.limits();
    let response = ConfigResponse {
        config_file,
        config: (*services.config).clone(),
        windows: DerivedWindows {
            token_window: limits.token_window()?,
            byte_window: limits.byte_window()?,
        },
    };

    match format {
        OutputFormat::Human => {
            print_header("Configuration:");
            println!(
                "  {} {}",
                colors::label("config file:"),
                colors::file_path(&response.config_file)
            );
            println!(
                "  {} token {}, byte {}\n",
                colors::label("re-split windows:"),
                colors::number(&response.windows.token_window.to_string()),
                colors::number(&response.windows.byte_window.to_string())
            );
            print!("{}", toml::to_string_pretty(&response.config)?);
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
