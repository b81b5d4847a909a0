//! Extension-keyed lookup of structural splitters.

use crate::core::chunking::markdown::MarkdownSplitter;
use crate::core::chunking::pdf::PdfSplitter;
use crate::core::chunking::StructuralSplitter;
use crate::core::error::{RagError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// File type of `path`: the text after the last `.` in the file name,
/// lowercased, trailing whitespace removed. A name without a dot is
/// its own type.
pub fn file_type(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());

    name.rsplit('.')
        .next()
        .unwrap_or_default()
        .trim_end()
        .to_lowercase()
}

/// Strict registry: unknown file types are an error, never a fallback
#[derive(Clone, Default)]
pub struct SplitterRegistry {
    splitters: BTreeMap<String, Arc<dyn StructuralSplitter>>,
}

impl SplitterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Markdown (`md`) and PDF (`pdf`) splitters
    pub fn with_defaults(min_header_font: f32) -> Self {
        let mut registry = Self::new();
        registry.register("md", Arc::new(MarkdownSplitter::new()));
        registry.register("pdf", Arc::new(PdfSplitter::new(min_header_font)));
        registry
    }

    /// Register `splitter` for a file type (case-insensitive)
    pub fn register(&mut self, file_type: &str, splitter: Arc<dyn StructuralSplitter>) {
        self.splitters
            .insert(file_type.trim_end().to_lowercase(), splitter);
    }

    /// Look up the splitter for a file type
    pub fn get(&self, file_type: &str) -> Result<&dyn StructuralSplitter> {
        self.splitters
            .get(&file_type.trim_end().to_lowercase())
            .map(|s| s.as_ref())
            .ok_or_else(|| RagError::UnsupportedFileType(file_type.to_string()))
    }

    /// Look up the splitter for a file by its extension
    pub fn for_path(&self, path: &Path) -> Result<&dyn StructuralSplitter> {
        self.get(&file_type(path))
    }

    /// Registered file types, sorted
    pub fn file_types(&self) -> Vec<&str> {
        self.splitters.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for SplitterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitterRegistry")
            .field("file_types", &self.file_types())
            .finish()
    }
}
