//! ZIP packaging of the written dataset.
//!
//! The archive holds a single entry, the dataset file under its own name,
//! deflate-compressed. Entry timestamps are the ZIP epoch default rather than
//! the wall clock, so the same dataset always yields the same archive bytes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Dataset path has no file name: {0}")]
    NoFileName(PathBuf),
}

/// Package `dataset_path` into a new ZIP at `archive_path`.
pub fn write_archive(dataset_path: &Path, archive_path: &Path) -> Result<(), ArchiveError> {
    let name = dataset_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ArchiveError::NoFileName(dataset_path.to_path_buf()))?;
    let bytes = fs::read(dataset_path)?;

    if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    zip.start_file(name, options)?;
    zip.write_all(&bytes)?;
    zip.finish()?;

    tracing::debug!(archive = %archive_path.display(), bytes = bytes.len(), "archive written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn archive_contains_dataset() {
        let tmp = TempDir::new().unwrap();
        let dataset = tmp.path().join("rag_database.json");
        fs::write(&dataset, "[]").unwrap();

        let archive_path = tmp.path().join("out/rulebook.zip");
        write_archive(&dataset, &archive_path).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_name("rag_database.json").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn archive_is_reproducible() {
        let tmp = TempDir::new().unwrap();
        let dataset = tmp.path().join("rag_database.json");
        fs::write(&dataset, r#"[{"pageContent":"x"}]"#).unwrap();

        let a = tmp.path().join("a.zip");
        let b = tmp.path().join("b.zip");
        write_archive(&dataset, &a).unwrap();
        write_archive(&dataset, &b).unwrap();
        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
    }

    #[test]
    fn missing_dataset_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = write_archive(&tmp.path().join("nope.json"), &tmp.path().join("a.zip"));
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }
}
