// Test fixtures: scratch document corpora

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One line of PDF text at a given font size
#[allow(dead_code)]
pub struct PdfLine<'a> {
    pub text: &'a str,
    pub size: i64,
}

#[allow(dead_code)]
impl<'a> PdfLine<'a> {
    pub fn new(text: &'a str, size: i64) -> Self {
        Self { text, size }
    }
}

/// Temporary directory of documents
#[allow(dead_code)]
pub struct TestCorpus {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestCorpus {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Corpus with the given text files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let corpus = Self::new();
        for (name, content) in files {
            corpus.add_file(name, content);
        }
        corpus
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a text file, creating parent directories
    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write a single-page PDF with one text block per line
    pub fn add_pdf(&self, name: &str, lines: &[PdfLine]) -> PathBuf {
        let path = self.join(name);
        write_pdf(&path, lines);
        path
    }
}

/// Write a one-page PDF using a standard Type1 font
#[allow(dead_code)]
pub fn write_pdf(path: &Path, lines: &[PdfLine]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    let mut y: i64 = 800;
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), line.size.into()]));
        operations.push(Operation::new("Td", vec![50.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(line.text)]));
        operations.push(Operation::new("ET", vec![]));
        y -= 30;
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("Failed to encode content"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("Failed to save PDF");
}
