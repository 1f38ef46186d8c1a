//! Markdown file discovery.
//!
//! Walks the source root recursively and returns every file whose extension is
//! one of the configured Markdown extensions. The walk follows symlinks and has
//! no depth limit. Entries are sorted by file name at every directory level so
//! that the dataset comes out in the same order on every run and platform.
//!
//! ```text
//! source/
//! ├── config.toml           # ignored (not markdown)
//! ├── public/
//! │   ├── 01-basics.md      # → public/01-basics.md
//! │   └── combat/
//! │       └── melee.md      # → public/combat/melee.md
//! └── gm/
//!     └── secrets.md        # → gm/secrets.md
//! ```
//!
//! Any error from the walk (missing root, unreadable directory, symlink loop)
//! is fatal: no partial list is returned.

use crate::config::BuildConfig;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A discovered Markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path on disk.
    pub path: PathBuf,
    /// Path segments relative to the source root, folders first.
    pub segments: Vec<String>,
}

impl SourceFile {
    /// Build from an absolute path under `root`. Returns `None` if `path` is
    /// not inside `root`.
    pub fn new(root: &Path, path: PathBuf) -> Option<Self> {
        let rel = path.strip_prefix(root).ok()?;
        let segments: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self { path, segments })
    }

    /// Relative path joined with `/`, used as the chunk `source`.
    pub fn relative_path(&self) -> String {
        self.segments.join("/")
    }
}

/// Recursively collect the Markdown files under `root`, in sorted walk order.
pub fn discover(root: &Path, config: &BuildConfig) -> Result<Vec<SourceFile>, DiscoverError> {
    if !root.is_dir() {
        return Err(DiscoverError::SourceNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_markdown = entry
            .path()
            .extension()
            .map(|e| config.is_markdown_extension(&e.to_string_lossy()))
            .unwrap_or(false);
        if !is_markdown {
            continue;
        }
        if let Some(file) = SourceFile::new(root, entry.into_path()) {
            tracing::trace!(source = %file.relative_path(), "discovered");
            files.push(file);
        }
    }

    tracing::debug!(root = %root.display(), count = files.len(), "discovery finished");
    Ok(files)
}
