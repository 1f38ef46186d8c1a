//! CLI output formatting.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Progress (one event at a time)
//!
//! ```text
//! Found 4 markdown files
//! 001 gm/npcs.md (3 chunks)
//!     Levels: 1
//! 002 public/01-basics.md (3 chunks)
//!     Levels: 0
//! 003 public/bad.md (skipped)
//!     Reason: stream did not contain valid UTF-8
//! ```
//!
//! ## Report (`check`, after the build)
//!
//! ```text
//! Files
//! 001 gm/npcs.md (3 chunks)
//!     Levels: 1
//! 002 public/rules/combat.md (5 chunks)
//!     Levels: 0, 2
//!     Blocks: 3
//! ```
//!
//! ## Summary
//!
//! ```text
//! Access levels
//!     0 public: 8 chunks
//!     1 secret: 3 chunks
//!     3 secret: 2 chunks
//!
//! Wrote 13 chunks from 4 files → dist/rag_database.json
//! ```

use crate::dataset::{BuildEvent, BuildReport, Dataset, FileReport, SkippedFile};
use crate::types::{Access, AccessLevel};
use std::collections::BTreeMap;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn join_levels(levels: &[AccessLevel]) -> String {
    levels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn file_lines(index: usize, file: &FileReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} ({})",
        format_index(index),
        file.source,
        plural(file.chunks, "chunk")
    )];
    if !file.levels.is_empty() {
        lines.push(format!("    Levels: {}", join_levels(&file.levels)));
    }
    if file.blocks > 1 {
        lines.push(format!("    Blocks: {}", file.blocks));
    }
    lines
}

fn skipped_lines(index: usize, skipped: &SkippedFile) -> Vec<String> {
    vec![
        format!("{} {} (skipped)", format_index(index), skipped.source),
        format!("    Reason: {}", skipped.reason),
    ]
}

// ============================================================================
// Progress events
// ============================================================================

/// Tracks the running file index across progress events.
#[derive(Debug, Default)]
pub struct EventFormatter {
    seen: usize,
}

impl EventFormatter {
    /// Format a single progress event as display lines.
    pub fn format(&mut self, event: &BuildEvent) -> Vec<String> {
        match event {
            BuildEvent::Discovered { count } => {
                vec![format!("Found {}", plural(*count, "markdown file"))]
            }
            BuildEvent::FileProcessed(file) => {
                self.seen += 1;
                file_lines(self.seen, file)
            }
            BuildEvent::FileSkipped(skipped) => {
                self.seen += 1;
                skipped_lines(self.seen, skipped)
            }
        }
    }
}

// ============================================================================
// Whole-build report
// ============================================================================

/// Format the per-file report of a finished build, processed files first.
pub fn format_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Files".to_string()];
    for (i, file) in report.files.iter().enumerate() {
        lines.extend(file_lines(i + 1, file));
    }
    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for (i, skipped) in report.skipped.iter().enumerate() {
            lines.extend(skipped_lines(i + 1, skipped));
        }
    }
    lines
}

/// Print the per-file report to stdout.
pub fn print_report(report: &BuildReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

/// Format the chunk count per access level plus a closing line.
///
/// `written` is the dataset path when the dataset was written to disk.
pub fn format_summary(dataset: &Dataset, report: &BuildReport, written: Option<&Path>) -> Vec<String> {
    if report.discovered() == 0 {
        return vec!["No markdown files found; nothing to write".to_string()];
    }

    let mut per_level: BTreeMap<AccessLevel, usize> = BTreeMap::new();
    for chunk in dataset.chunks() {
        *per_level.entry(chunk.metadata.access_level).or_default() += 1;
    }

    let mut lines = vec!["Access levels".to_string()];
    for (level, count) in &per_level {
        lines.push(format!(
            "    {} {}: {}",
            level,
            Access::from_level(*level),
            plural(*count, "chunk")
        ));
    }
    lines.push(String::new());

    let totals = format!(
        "{} from {}",
        plural(dataset.len(), "chunk"),
        plural(report.files.len(), "file")
    );
    match written {
        Some(path) => lines.push(format!("Wrote {} → {}", totals, path.display())),
        None => lines.push(format!("Checked {}", totals)),
    }
    if !report.skipped.is_empty() {
        lines.push(format!("Skipped {}", plural(report.skipped.len(), "file")));
    }
    lines
}

/// Print the summary to stdout.
pub fn print_summary(dataset: &Dataset, report: &BuildReport, written: Option<&Path>) {
    for line in format_summary(dataset, report, written) {
        println!("{}", line);
    }
}
