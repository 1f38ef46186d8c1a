//! Shared test utilities for the rulebook-chunker unit tests.
//!
//! Provides fixture setup and extractors over built chunks.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let output = build(tmp.path(), &BuildConfig::default(), None).unwrap();
//!
//! for (level, text) in levels_and_text(output.dataset.chunks()) {
//!     assert!(!text.is_empty());
//! }
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{AccessLevel, Chunk};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/source/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/source");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Chunk extractors
// =========================================================================

/// `(access_level, trimmed content)` for every chunk, in order.
pub fn levels_and_text(chunks: &[Chunk]) -> Vec<(AccessLevel, String)> {
    chunks
        .iter()
        .map(|c| (c.metadata.access_level, c.page_content.trim().to_string()))
        .collect()
}
