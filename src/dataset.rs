//! Dataset assembly: the chunking pipeline end to end.
//!
//! For every discovered file, in discovery order:
//!
//! ```text
//! read → default level (access) → blocks (segment) → chunks (splitter) → append
//! ```
//!
//! The result is one flat [`Dataset`] written as pretty-printed JSON. No
//! deduplication, no sorting; the order is discovery order, then block order,
//! then heading order. Nothing time-dependent goes into the output, so an
//! unchanged source tree always produces byte-identical files.
//!
//! ## Unreadable Files
//!
//! With [`ReadErrorPolicy::Abort`] (the default) the first unreadable file
//! fails the build. With [`ReadErrorPolicy::Skip`] it is left out and listed in
//! [`BuildReport::skipped`].

use crate::access;
use crate::config::{BuildConfig, ReadErrorPolicy};
use crate::discover::{self, DiscoverError, SourceFile};
use crate::segment;
use crate::splitter::{HeadingSplitter, MarkdownHeadingSplitter};
use crate::types::{AccessLevel, Chunk, ChunkMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The ordered chunk sequence. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    chunks: Vec<Chunk>,
}

impl Dataset {
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Pretty-printed JSON, two-space indent.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Chunks cut from one source file, in order.
    pub fn chunks_for<'a>(&'a self, source: &str) -> impl Iterator<Item = &'a Chunk> {
        self.chunks.iter().filter(move |c| c.metadata.source == source)
    }
}

impl From<Vec<Chunk>> for Dataset {
    fn from(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }
}

/// What happened to one processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: String,
    pub blocks: usize,
    pub chunks: usize,
    /// Distinct levels among the file's chunks, ascending.
    pub levels: Vec<AccessLevel>,
}

/// A file left out under [`ReadErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub files: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
}

impl BuildReport {
    /// Number of Markdown files found, processed or skipped.
    pub fn discovered(&self) -> usize {
        self.files.len() + self.skipped.len()
    }
}

/// Progress events, sent while the pipeline runs.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    Discovered { count: usize },
    FileProcessed(FileReport),
    FileSkipped(SkippedFile),
}

#[derive(Debug)]
pub struct BuildOutput {
    pub dataset: Dataset,
    pub report: BuildReport,
}

/// Run the pipeline over `root` with the stock Markdown heading splitter.
pub fn build(
    root: &Path,
    config: &BuildConfig,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildOutput, BuildError> {
    let splitter = MarkdownHeadingSplitter::from_config(config);
    build_with_splitter(&splitter, root, config, events)
}

/// Run the pipeline with a specific splitter (allows testing with a stub).
pub fn build_with_splitter(
    splitter: &impl HeadingSplitter,
    root: &Path,
    config: &BuildConfig,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildOutput, BuildError> {
    let emit = |event: BuildEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is printing progress.
            let _ = tx.send(event);
        }
    };

    let files = discover::discover(root, config)?;
    emit(BuildEvent::Discovered { count: files.len() });

    let mut chunks = Vec::new();
    let mut report = BuildReport::default();

    for file in &files {
        let source = file.relative_path();
        let content = match fs::read_to_string(&file.path) {
            Ok(content) => content,
            Err(err) if config.on_read_error == ReadErrorPolicy::Skip => {
                tracing::warn!(%source, error = %err, "skipping unreadable file");
                let skipped = SkippedFile {
                    source,
                    reason: err.to_string(),
                };
                emit(BuildEvent::FileSkipped(skipped.clone()));
                report.skipped.push(skipped);
                continue;
            }
            Err(err) => {
                return Err(BuildError::Read {
                    path: file.path.clone(),
                    source: err,
                });
            }
        };

        let (file_chunks, blocks) = chunk_file(file, &content, config, splitter);
        let file_report = FileReport {
            source,
            blocks,
            chunks: file_chunks.len(),
            levels: distinct_levels(&file_chunks),
        };
        tracing::debug!(
            source = %file_report.source,
            blocks = file_report.blocks,
            chunks = file_report.chunks,
            "processed"
        );
        emit(BuildEvent::FileProcessed(file_report.clone()));
        report.files.push(file_report);
        chunks.extend(file_chunks);
    }

    Ok(BuildOutput {
        dataset: Dataset::from(chunks),
        report,
    })
}

/// Chunk one file's content. Returns the chunks and the number of blocks.
pub fn chunk_file(
    file: &SourceFile,
    content: &str,
    config: &BuildConfig,
    splitter: &impl HeadingSplitter,
) -> (Vec<Chunk>, usize) {
    let source = file.relative_path();
    let default_level = access::default_level(&file.segments, config);
    let segmented = segment::segment(content, default_level);
    let chunks = segmented
        .blocks
        .iter()
        .flat_map(|block| {
            let base = ChunkMetadata::new(&source, block.level);
            splitter.split(&segmented.text, block.range.clone(), &base)
        })
        .collect();
    (chunks, segmented.blocks.len())
}

fn distinct_levels(chunks: &[Chunk]) -> Vec<AccessLevel> {
    chunks
        .iter()
        .map(|c| c.metadata.access_level)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Write the dataset into `output_dir`, creating it. Returns the file path.
pub fn write_dataset(
    dataset: &Dataset,
    output_dir: &Path,
    config: &BuildConfig,
) -> Result<PathBuf, BuildError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&config.output.file_name);
    fs::write(&path, dataset.to_json()?)?;
    tracing::debug!(path = %path.display(), chunks = dataset.len(), "dataset written");
    Ok(path)
}
