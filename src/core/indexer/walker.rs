//! File discovery with extension allow-list and exclude patterns.
//!
//! A source path is either a single file, checked against the
//! allow-list, or a directory walked recursively. Disallowed files are
//! skipped with a warning; walk errors (permission denied, etc.) are
//! logged and the walk continues.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::chunking::file_type;
use crate::core::config::IndexingConfig;
use crate::core::error::{RagError, Result};

/// Files accepted for ingestion, in walk order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovery {
    pub files: Vec<PathBuf>,

    /// Files seen but rejected (type, size or pattern)
    pub skipped: usize,
}

/// File system walker with allow-list filtering
#[derive(Debug, Clone)]
pub struct FileWalker {
    /// Allowed file types, lowercase without the dot
    allowed_extensions: Vec<String>,

    /// Patterns to exclude (e.g., "**/.git/**")
    exclude_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// Fails on an invalid exclude pattern or an empty allow-list.
    pub fn new(
        allowed_extensions: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
    ) -> Result<Self> {
        let allowed: Vec<String> = allowed_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if allowed.is_empty() {
            return Err(RagError::ConfigError(
                "At least one allowed extension is required".to_string(),
            ));
        }

        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    RagError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            allowed_extensions: allowed,
            exclude_patterns: exclude,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    pub fn from_config(config: &IndexingConfig) -> Result<Self> {
        Self::new(
            config.allowed_extensions.clone(),
            config.exclude_patterns.clone(),
            config.max_file_size_mb,
        )
    }

    /// Whether the file type of `path` is on the allow-list
    pub fn is_allowed(&self, path: &Path) -> bool {
        let ext = file_type(path);
        self.allowed_extensions.iter().any(|a| *a == ext)
    }

    /// Resolve `path` into the files to ingest.
    ///
    /// Fails with [`RagError::InvalidPath`] when `path` is neither a
    /// file nor a directory.
    pub fn discover(&self, path: &Path) -> Result<Discovery> {
        if path.is_file() {
            let mut discovery = Discovery::default();
            if self.accept_file(path, std::fs::metadata(path).ok().map(|m| m.len())) {
                discovery.files.push(path.to_path_buf());
            } else {
                discovery.skipped += 1;
            }
            return Ok(discovery);
        }

        if path.is_dir() {
            return Ok(self.collect_files(path));
        }

        Err(RagError::InvalidPath(path.to_path_buf()))
    }

    /// Collect all accepted files below `root`, sorted by name within
    /// each directory
    fn collect_files(&self, root: &Path) -> Discovery {
        let mut discovery = Discovery::default();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, root))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if self.is_excluded(path) {
                        tracing::debug!("Skipping excluded file: {:?}", path);
                        discovery.skipped += 1;
                        continue;
                    }

                    let size = entry.metadata().ok().map(|m| m.len());
                    if self.accept_file(path, size) {
                        discovery.files.push(path.to_path_buf());
                    } else {
                        discovery.skipped += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        tracing::info!(
            "Discovered {} files under {:?} ({} skipped)",
            discovery.files.len(),
            root,
            discovery.skipped
        );
        discovery
    }

    fn accept_file(&self, path: &Path, size: Option<u64>) -> bool {
        if !self.is_allowed(path) {
            tracing::warn!(
                "Skipping {:?}: file type '{}' is not one of {:?}",
                path,
                file_type(path),
                self.allowed_extensions
            );
            return false;
        }

        if let Some(size) = size {
            if size > self.max_file_size_bytes {
                tracing::warn!("Skipping large file: {:?} ({} bytes)", path, size);
                return false;
            }
        }

        true
    }

    /// Prune excluded directories early; never filters the root
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root || !entry.file_type().is_dir() {
            return true;
        }

        // "**/target/**" should also prune the "target" directory itself
        let probe = path.join("_");
        if self.is_excluded(path) || self.is_excluded(&probe) {
            tracing::debug!("Skipping excluded directory: {:?}", path);
            return false;
        }

        true
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude_patterns.iter().any(|p| p.matches_path(path))
    }
}
