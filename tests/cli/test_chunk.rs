//! Tests for the chunk command

use super::test_helpers::create_cli_test_services;
use crate::common::{PdfLine, TestCorpus};
use docrag::cli::commands::chunk::{execute, ChunkArgs, WindowKind};
use docrag::cli::OutputFormat;

fn args(file: std::path::PathBuf, window: Option<WindowKind>) -> ChunkArgs {
    ChunkArgs {
        file,
        window,
        full: false,
    }
}

#[test]
fn test_chunk_markdown_structural() {
    let data = TestCorpus::new();
    let docs = TestCorpus::with_files(&[("a.md", "# One\nFirst.\n\n# Two\nSecond.\n")]);
    let services = create_cli_test_services(&data);

    for format in [OutputFormat::Human, OutputFormat::Json] {
        execute(args(docs.join("a.md"), None), &services, format).unwrap();
    }
    // Chunking never touches the index
    assert!(!data.join(&services.config.store.index_name).exists());
}

#[test]
fn test_chunk_pdf_structural() {
    let data = TestCorpus::new();
    let docs = TestCorpus::new();
    let path = docs.add_pdf(
        "r.pdf",
        &[PdfLine::new("Title", 20), PdfLine::new("Body text.", 10)],
    );
    let services = create_cli_test_services(&data);

    execute(args(path, None), &services, OutputFormat::Json).unwrap();
}

#[test]
fn test_chunk_with_windows_accepts_any_text_file() {
    let data = TestCorpus::new();
    let text = "word ".repeat(2000);
    let docs = TestCorpus::with_files(&[("plain.txt", text.as_str())]);
    let services = create_cli_test_services(&data);

    for window in [WindowKind::Bytes, WindowKind::Tokens] {
        execute(args(docs.join("plain.txt"), Some(window)), &services, OutputFormat::Json)
            .unwrap();
    }
}

#[test]
fn test_chunk_unsupported_type_fails() {
    let data = TestCorpus::new();
    let docs = TestCorpus::with_files(&[("plain.txt", "hello")]);
    let services = create_cli_test_services(&data);

    let err = execute(args(docs.join("plain.txt"), None), &services, OutputFormat::Human)
        .unwrap_err();

    assert!(err.to_string().contains("Unsupported file type"));
}

#[test]
fn test_chunk_missing_file_fails() {
    let data = TestCorpus::new();
    let services = create_cli_test_services(&data);

    let result = execute(
        args(data.join("missing.md"), Some(WindowKind::Bytes)),
        &services,
        OutputFormat::Human,
    );

    assert!(result.is_err());
}
