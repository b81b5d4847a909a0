//! CLI test helpers
//!
//! Offline services over a scratch data directory, matching the
//! execute() signatures of the CLI commands.

use crate::common::{offline_config, TestCorpus};
use docrag::core::services::Services;

/// Services with a hashing embedder and the index under `data`
pub fn create_cli_test_services(data: &TestCorpus) -> Services {
    Services::new(offline_config(data.path())).expect("Failed to create services")
}

/// Documents used by the ingest and query tests
pub fn doc_files() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "guide.md",
            "# Install\nDownload the archive and unpack it.\n\n# Usage\nRun the binary with a config file.\n",
        ),
        (
            "faq/questions.md",
            "# Licensing\nThe project is Apache licensed.\n",
        ),
        ("notes.txt", "Not a supported document type."),
    ]
}
