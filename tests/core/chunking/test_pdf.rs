// PDF structural splitting of generated documents

use crate::common::{CharTokenizer, PdfLine, TestCorpus};
use docrag::chunking::pdf::PDF_TYPE;
use docrag::chunking::{ChunkEnforcer, PdfSplitter, SizeLimits, StructuralSplitter};
use docrag::{DocumentContent, RagError, SOURCE_KEY, TYPE_KEY};
use std::sync::Arc;

fn report(corpus: &TestCorpus) -> std::path::PathBuf {
    corpus.add_pdf(
        "report.pdf",
        &[
            PdfLine::new("Summary", 18),
            PdfLine::new("Revenue grew this quarter.", 11),
            PdfLine::new("Costs were flat.", 11),
            PdfLine::new("Outlook", 18),
            PdfLine::new("Growth continues.", 11),
        ],
    )
}

#[test]
fn test_load_reads_spans_with_sizes() {
    let corpus = TestCorpus::new();
    let path = report(&corpus);

    let document = PdfSplitter::default().load(&path).unwrap();

    assert_eq!(document.metadata[TYPE_KEY].as_str(), Some(PDF_TYPE));
    let DocumentContent::Pages(pages) = &document.content else {
        panic!("expected page content");
    };
    assert_eq!(pages.len(), 1);

    let spans: Vec<(&str, f32)> = pages[0]
        .blocks
        .iter()
        .flat_map(|b| b.lines.iter())
        .flat_map(|l| l.spans.iter())
        .map(|s| (s.text.as_str(), s.size))
        .collect();
    assert_eq!(spans.len(), 5);
    assert_eq!(spans[0], ("Summary", 18.0));
    assert_eq!(spans[1], ("Revenue grew this quarter.", 11.0));
}

#[test]
fn test_split_at_large_fonts() {
    let corpus = TestCorpus::new();
    let path = report(&corpus);
    let splitter = PdfSplitter::new(14.0);

    let chunks = splitter.split(&splitter.load(&path).unwrap()).unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(
        chunks[0].content,
        "Summary\nRevenue grew this quarter.\nCosts were flat."
    );
    assert_eq!(chunks[1].content, "Outlook\nGrowth continues.");
    for chunk in &chunks {
        assert_eq!(chunk.metadata.len(), 1);
        assert!(chunk.metadata.contains_key(SOURCE_KEY));
    }
}

#[test]
fn test_threshold_controls_boundaries() {
    let corpus = TestCorpus::new();
    let path = report(&corpus);
    let splitter = PdfSplitter::new(24.0);

    let chunks = splitter.split(&splitter.load(&path).unwrap()).unwrap();

    assert_eq!(chunks.len(), 1);
}

#[test]
fn test_pdf_without_text_is_empty_document() {
    let corpus = TestCorpus::new();
    let path = corpus.add_pdf("blank.pdf", &[]);
    let enforcer = ChunkEnforcer::new(Arc::new(CharTokenizer), SizeLimits::default()).unwrap();

    let err = enforcer.produce(&PdfSplitter::default(), &path).unwrap_err();

    assert!(matches!(err, RagError::EmptyDocument(_)));
}
