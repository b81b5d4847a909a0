//! Markdown header-based structural splitter.
//!
//! Splits on ATX headers of levels 1 to 3. Each emitted chunk holds
//! one header section; the active header titles are recorded in the
//! chunk metadata and repeated as a JSON preamble at the top of the
//! chunk content. Header lines stay in the content.

use crate::core::chunking::StructuralSplitter;
use crate::core::error::{RagError, Result};
use crate::core::types::{Chunk, Document, DocumentContent, Metadata, SOURCE_KEY, TYPE_KEY};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Document type recorded for Markdown files
pub const MARKDOWN_TYPE: &str = "MD";

/// Metadata key prefix for header titles (`Doc Section level 1`, ...)
pub const SECTION_KEY_PREFIX: &str = "Doc Section level";

/// Joiner used when adjacent runs are merged into one section
const SECTION_JOINER: &str = "  \n";

/// `#`, `##` or `###`, followed by a space or end of line
static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,3})(?: (.*))?$").unwrap());

/// Metadata key for a header level
pub fn section_key(level: usize) -> String {
    format!("{SECTION_KEY_PREFIX} {level}")
}

/// Parse a trimmed line as a header, returning (level, title)
fn parse_header(line: &str) -> Option<(usize, &str)> {
    let captures = HEADER_RE.captures(line)?;
    let level = captures.get(1)?.as_str().len();
    let title = captures.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    Some((level, title))
}

/// A run of lines sharing one header context
#[derive(Debug, Clone, PartialEq)]
struct Section {
    content: String,
    headers: Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    Backticks,
    Tildes,
}

impl Fence {
    fn marker(self) -> &'static str {
        match self {
            Fence::Backticks => "```",
            Fence::Tildes => "~~~",
        }
    }

    fn opening(line: &str) -> Option<Self> {
        if line.starts_with("```") && line.matches("```").count() == 1 {
            Some(Fence::Backticks)
        } else if line.starts_with("~~~") {
            Some(Fence::Tildes)
        } else {
            None
        }
    }
}

/// Line-level scan: splits text into runs at headers and blank
/// lines, tracking the header stack for each run.
fn scan_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_headers = Metadata::new();
    let mut active_headers = Metadata::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut fence: Option<Fence> = None;

    let flush = |lines: &mut Vec<String>, headers: &Metadata, out: &mut Vec<Section>| {
        if !lines.is_empty() {
            out.push(Section {
                content: lines.join("\n"),
                headers: headers.clone(),
            });
            lines.clear();
        }
    };

    for raw in text.split('\n') {
        let line: String = raw.trim().chars().filter(|c| !c.is_control()).collect();

        match fence {
            None => fence = Fence::opening(&line),
            Some(open) if line.starts_with(open.marker()) => fence = None,
            Some(_) => {}
        }

        if fence.is_some() {
            current.push(line);
            continue;
        }

        if let Some((level, title)) = parse_header(&line) {
            while stack.last().is_some_and(|&top| top >= level) {
                if let Some(popped) = stack.pop() {
                    active_headers.remove(&section_key(popped));
                }
            }
            stack.push(level);
            active_headers.insert(section_key(level), title.into());

            flush(&mut current, &current_headers, &mut sections);
            current.push(line);
        } else if !line.is_empty() {
            current.push(line);
        } else {
            flush(&mut current, &current_headers, &mut sections);
        }

        current_headers = active_headers.clone();
    }
    flush(&mut current, &current_headers, &mut sections);

    sections
}

/// Merge adjacent runs: equal header context joins, and a run that
/// ends on a header line absorbs a following deeper sub-section.
fn aggregate_sections(runs: Vec<Section>) -> Vec<Section> {
    let mut merged: Vec<Section> = Vec::new();

    for run in runs {
        if let Some(last) = merged.last_mut() {
            if last.headers == run.headers {
                last.content.push_str(SECTION_JOINER);
                last.content.push_str(&run.content);
                continue;
            }

            let ends_on_header = last
                .content
                .rsplit('\n')
                .next()
                .is_some_and(|l| l.starts_with('#'));
            if last.headers.len() < run.headers.len() && ends_on_header {
                last.content.push_str(SECTION_JOINER);
                last.content.push_str(&run.content);
                last.headers = run.headers;
                continue;
            }
        }
        merged.push(run);
    }

    merged
}

/// Header sections of a Markdown text, as (content, header metadata)
/// pairs. Contents have no preamble yet.
pub fn split_sections(text: &str) -> Vec<(String, Metadata)> {
    aggregate_sections(scan_sections(text))
        .into_iter()
        .map(|s| (s.content, s.headers))
        .collect()
}

/// Markdown structural splitter
#[derive(Debug, Clone, Default)]
pub struct MarkdownSplitter;

impl MarkdownSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl StructuralSplitter for MarkdownSplitter {
    fn doc_type(&self) -> &'static str {
        MARKDOWN_TYPE
    }

    fn load(&self, path: &Path) -> Result<Document> {
        let bytes = std::fs::read(path).map_err(|e| RagError::load(path, e))?;
        let text = String::from_utf8_lossy(&bytes).into_owned();

        let mut metadata = Metadata::new();
        metadata.insert(SOURCE_KEY.to_string(), path.display().to_string().into());
        metadata.insert(TYPE_KEY.to_string(), MARKDOWN_TYPE.into());

        Ok(Document {
            path: path.to_path_buf(),
            content: DocumentContent::Text(text),
            metadata,
        })
    }

    fn split(&self, document: &Document) -> Result<Vec<Chunk>> {
        let DocumentContent::Text(text) = &document.content else {
            return Err(RagError::load(
                &document.path,
                "Markdown splitter expects text content",
            ));
        };
        let source = document.path.display().to_string();

        split_sections(text)
            .into_iter()
            .map(|(body, mut metadata)| {
                metadata.insert(SOURCE_KEY.to_string(), source.clone().into());
                let preamble = serde_json::to_string(&metadata)?;
                Ok(Chunk::new(format!("{preamble}\n\n{body}"), metadata))
            })
            .collect()
    }
}
