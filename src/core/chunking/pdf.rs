//! PDF font-size structural splitter.
//!
//! Loading walks each page's content stream with `lopdf` and rebuilds
//! a page -> block -> line -> span layout. Splitting then starts a new
//! chunk at every span drawn at or above the header font size.

use crate::core::chunking::StructuralSplitter;
use crate::core::error::{RagError, Result};
use crate::core::types::{
    Chunk, Document, DocumentContent, Metadata, PdfPage, TextBlock, TextLine, TextSpan, SOURCE_KEY,
    TYPE_KEY,
};
use lopdf::content::Operation;
use lopdf::{Encoding, Object};
use std::collections::BTreeMap;
use std::path::Path;

/// Document type recorded for PDF files
pub const PDF_TYPE: &str = "pdf";

/// Default header threshold in points
pub const DEFAULT_MIN_HEADER_FONT: f32 = 14.0;

/// Group spans into chunks at header boundaries.
///
/// A span with `size >= min_header_font` flushes the accumulated
/// lines as one chunk and then opens the next one, so the header is
/// the first line of the chunk it introduces. Whitespace-only spans
/// are ignored.
pub fn extract_header_chunks(pages: &[PdfPage], min_header_font: f32) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    let spans = pages
        .iter()
        .flat_map(|page| &page.blocks)
        .flat_map(|block| &block.lines)
        .flat_map(|line| &line.spans);

    for span in spans {
        let text = span.text.trim();
        // Blank spans never open a section, whatever their size
        if text.is_empty() {
            continue;
        }
        if span.size >= min_header_font && !current.is_empty() {
            chunks.push(current.join("\n"));
            current.clear();
        }
        current.push(text);
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

/// PDF structural splitter
#[derive(Debug, Clone)]
pub struct PdfSplitter {
    min_header_font: f32,
}

impl PdfSplitter {
    pub fn new(min_header_font: f32) -> Self {
        Self { min_header_font }
    }

    pub fn min_header_font(&self) -> f32 {
        self.min_header_font
    }
}

impl Default for PdfSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_HEADER_FONT)
    }
}

impl StructuralSplitter for PdfSplitter {
    fn doc_type(&self) -> &'static str {
        PDF_TYPE
    }

    fn load(&self, path: &Path) -> Result<Document> {
        let pdf = lopdf::Document::load(path).map_err(|e| RagError::load(path, e))?;

        let mut pages = Vec::new();
        for (page_num, page_id) in pdf.get_pages() {
            let page = read_page(&pdf, page_id)
                .map_err(|e| RagError::load(path, format!("page {page_num}: {e}")))?;
            pages.push(page);
        }
        tracing::debug!("Loaded {} pages from {:?}", pages.len(), path);

        let mut metadata = Metadata::new();
        metadata.insert(SOURCE_KEY.to_string(), path.display().to_string().into());
        metadata.insert(TYPE_KEY.to_string(), PDF_TYPE.into());

        Ok(Document {
            path: path.to_path_buf(),
            content: DocumentContent::Pages(pages),
            metadata,
        })
    }

    fn split(&self, document: &Document) -> Result<Vec<Chunk>> {
        let DocumentContent::Pages(pages) = &document.content else {
            return Err(RagError::load(
                &document.path,
                "PDF splitter expects page content",
            ));
        };
        let source = document.path.display().to_string();

        Ok(extract_header_chunks(pages, self.min_header_font)
            .into_iter()
            .map(|text| {
                let mut metadata = Metadata::new();
                metadata.insert(SOURCE_KEY.to_string(), source.clone().into());
                Chunk::new(text, metadata)
            })
            .collect())
    }
}

/// Decode one page's content stream into its text layout
fn read_page(pdf: &lopdf::Document, page_id: lopdf::ObjectId) -> lopdf::Result<PdfPage> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = pdf
        .get_page_fonts(page_id)?
        .into_iter()
        .filter_map(|(name, font)| font.get_font_encoding(pdf).ok().map(|enc| (name, enc)))
        .collect();
    let content = pdf.get_and_decode_page_content(page_id)?;

    let mut layout = LayoutBuilder::new(&encodings);
    for operation in &content.operations {
        layout.apply(operation);
    }
    Ok(layout.finish())
}

/// Text state machine over content stream operators
struct LayoutBuilder<'m, 'd> {
    encodings: &'m BTreeMap<Vec<u8>, Encoding<'d>>,
    blocks: Vec<TextBlock>,
    block: Option<TextBlock>,
    line: TextLine,
    font: Option<Vec<u8>>,
    font_size: f32,
    matrix_scale: f32,
}

impl<'m, 'd> LayoutBuilder<'m, 'd> {
    fn new(encodings: &'m BTreeMap<Vec<u8>, Encoding<'d>>) -> Self {
        Self {
            encodings,
            blocks: Vec::new(),
            block: None,
            line: TextLine::default(),
            font: None,
            font_size: 0.0,
            matrix_scale: 1.0,
        }
    }

    fn apply(&mut self, op: &Operation) {
        match op.operator.as_str() {
            "BT" => {
                self.end_block();
                self.block = Some(TextBlock::default());
                self.matrix_scale = 1.0;
            }
            "ET" => self.end_block(),
            "Tf" => {
                self.font = op.operands.first().and_then(|o| o.as_name().ok()).map(<[u8]>::to_vec);
                if let Some(size) = op.operands.get(1).and_then(|o| o.as_float().ok()) {
                    self.font_size = size;
                }
            }
            "Tm" => {
                let m: Vec<f32> = op.operands.iter().filter_map(|o| o.as_float().ok()).collect();
                if m.len() == 6 {
                    self.matrix_scale = m[2].hypot(m[3]);
                }
                self.end_line();
            }
            "Td" | "TD" | "T*" => self.end_line(),
            "Tj" | "TJ" => self.show(&op.operands),
            "'" => {
                self.end_line();
                self.show(&op.operands[..op.operands.len().min(1)]);
            }
            "\"" => {
                self.end_line();
                if let Some(text) = op.operands.get(2) {
                    self.show(std::slice::from_ref(text));
                }
            }
            _ => {}
        }
    }

    fn show(&mut self, operands: &[Object]) {
        let mut text = String::new();
        for operand in operands {
            self.decode_into(&mut text, operand);
        }
        if text.is_empty() {
            return;
        }

        self.line.spans.push(TextSpan {
            text,
            size: self.font_size * self.matrix_scale,
        });
    }

    fn decode_into(&self, out: &mut String, operand: &Object) {
        match operand {
            Object::String(bytes, _) => {
                let encoding = self.font.as_ref().and_then(|f| self.encodings.get(f));
                let decoded = encoding
                    .and_then(|enc| lopdf::Document::decode_text(enc, bytes).ok())
                    .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned());
                out.push_str(&decoded);
            }
            Object::Array(items) => {
                for item in items {
                    self.decode_into(out, item);
                }
            }
            _ => {}
        }
    }

    fn end_line(&mut self) {
        if self.line.spans.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.line);
        self.block.get_or_insert_with(TextBlock::default).lines.push(line);
    }

    fn end_block(&mut self) {
        self.end_line();
        if let Some(block) = self.block.take() {
            if !block.lines.is_empty() {
                self.blocks.push(block);
            }
        }
    }

    fn finish(mut self) -> PdfPage {
        self.end_block();
        PdfPage {
            blocks: self.blocks,
        }
    }
}
