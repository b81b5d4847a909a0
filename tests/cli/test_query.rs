//! Tests for the query command

use super::test_helpers::{create_cli_test_services, doc_files};
use crate::common::TestCorpus;
use docrag::cli::commands::{ingest, query};
use docrag::cli::OutputFormat;

fn ingested(data: &TestCorpus, docs: &TestCorpus) -> docrag::Services {
    let services = create_cli_test_services(data);
    let args = ingest::IngestArgs {
        path: docs.path().to_path_buf(),
        quiet: true,
    };
    ingest::execute(args, &services, OutputFormat::Json).unwrap();
    services
}

#[test]
fn test_query_after_ingest() {
    let data = TestCorpus::new();
    let docs = TestCorpus::with_files(&doc_files());
    let services = ingested(&data, &docs);

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = query::QueryArgs {
            text: "how do I install it".to_string(),
            top_k: 2,
            full: false,
        };
        query::execute(args, &services, format).unwrap();
    }
}

#[test]
fn test_query_full_content() {
    let data = TestCorpus::new();
    let docs = TestCorpus::with_files(&doc_files());
    let services = ingested(&data, &docs);

    let args = query::QueryArgs {
        text: "license".to_string(),
        top_k: 10,
        full: true,
    };
    query::execute(args, &services, OutputFormat::Human).unwrap();
}

#[test]
fn test_query_without_index_fails() {
    let data = TestCorpus::new();
    let services = create_cli_test_services(&data);

    let args = query::QueryArgs {
        text: "anything".to_string(),
        top_k: 3,
        full: false,
    };
    let err = query::execute(args, &services, OutputFormat::Json).unwrap_err();

    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_query_zero_top_k_fails() {
    let data = TestCorpus::new();
    let docs = TestCorpus::with_files(&doc_files());
    let services = ingested(&data, &docs);

    let args = query::QueryArgs {
        text: "install".to_string(),
        top_k: 0,
        full: false,
    };
    let err = query::execute(args, &services, OutputFormat::Json).unwrap_err();

    assert!(err.to_string().contains("top_k"));
}
