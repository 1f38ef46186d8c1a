//! # Rulebook Chunker
//!
//! Build tool for a static tabletop-RPG rulebook site. Your source tree is the
//! data source: Markdown files are cut into heading-scoped chunks, each tagged
//! with who may read it, and written as one flat JSON dataset that the site's
//! browser scripts load for menus, content, and retrieval.
//!
//! # Architecture: One Batch Pipeline
//!
//! ```text
//! source/  →  discover  →  access  →  segment  →  splitter  →  dataset  →  dist/rag_database.json
//!             (files)      (default   (marker      (heading      (ordered
//!                           level)     blocks)      chunks)       JSON array)
//! ```
//!
//! Files are processed one at a time, in sorted discovery order, and their
//! chunks are appended in document order. The same tree always produces the
//! same bytes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Walks the source root for Markdown files |
//! | [`access`] | Default access level from the folder; `levelN` token parsing |
//! | [`segment`] | Splits file text into blocks at `<!-- SECRET: levelN -->` markers |
//! | [`splitter`] | Splits blocks into chunks at headings, recording the heading path |
//! | [`dataset`] | Runs the pipeline, assembles and writes the dataset |
//! | [`archive`] | Optional ZIP packaging of the written dataset |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | The serialized chunk shape shared with the browser scripts |
//! | [`output`] | CLI output formatting |
//!
//! # Access Levels
//!
//! Level 0 is public; 1 and up are secret tiers. A file under the public
//! folder (`source/public/...`) starts at 0, any other file at the configured
//! default secret level (1). An inline marker changes the level for all text
//! after it:
//!
//! ```text
//! Shared with players.
//! <!-- SECRET: level2 -->
//! Only for tier-2 game masters.
//! ```
//!
//! The dataset is a static file served to trusted client code. Nothing here
//! enforces access at read time; the levels are labels for the consumer.

pub mod access;
pub mod archive;
pub mod config;
pub mod dataset;
pub mod discover;
pub mod output;
pub mod segment;
pub mod splitter;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
