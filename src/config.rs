//! Build configuration module.
//!
//! Handles loading, validating, and merging the `config.toml` found in the
//! source root. Stock defaults are the base layer; the user file only needs the
//! keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! public_folder = "public"    # First path segment that marks public content
//! default_secret_level = 1    # Level for files outside the public folder
//! extensions = ["md"]         # Markdown file extensions (case-insensitive)
//! on_read_error = "abort"     # "abort" or "skip" unreadable files
//!
//! [output]
//! file_name = "rag_database.json"
//!
//! [[headers]]
//! marker = "#"
//! label = "Header1"
//!
//! [[headers]]
//! marker = "##"
//! label = "Header2"
//!
//! [[headers]]
//! marker = "###"
//! label = "Header3"
//! ```
//!
//! `headers` is an array: a user file that sets it replaces the whole list.
//! Unknown keys are rejected to catch typos early.

use crate::types::AccessLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Metadata keys owned by the pipeline; heading labels may not reuse them.
const RESERVED_KEYS: &[&str] = &["source", "access", "access_level"];

/// Build configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Top-level folder whose files default to level 0.
    pub public_folder: String,
    /// Default level for every file outside `public_folder`.
    pub default_secret_level: AccessLevel,
    /// File extensions treated as Markdown, without the dot.
    pub extensions: Vec<String>,
    /// What to do when a discovered file cannot be read.
    pub on_read_error: ReadErrorPolicy,
    /// Heading markers that start a new chunk, in order.
    pub headers: Vec<HeaderRule>,
    /// Dataset file settings.
    pub output: OutputConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            public_folder: "public".to_string(),
            default_secret_level: 1,
            extensions: vec!["md".to_string()],
            on_read_error: ReadErrorPolicy::default(),
            headers: vec![
                HeaderRule::new("#", "Header1"),
                HeaderRule::new("##", "Header2"),
                HeaderRule::new("###", "Header3"),
            ],
            output: OutputConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let folder = self.public_folder.as_str();
        if folder.is_empty() || folder == "." || folder == ".." || folder.contains(['/', '\\'])
        {
            return Err(ConfigError::Validation(
                "public_folder must be a single folder name".into(),
            ));
        }
        if self.default_secret_level == 0 {
            return Err(ConfigError::Validation(
                "default_secret_level must be at least 1 (0 is public)".into(),
            ));
        }
        if self.extensions.is_empty() || self.extensions.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::Validation(
                "extensions must be a non-empty list of non-empty names".into(),
            ));
        }
        if self.output.file_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.file_name must not be empty".into(),
            ));
        }

        let mut levels = HashSet::new();
        let mut labels = HashSet::new();
        for rule in &self.headers {
            let level = rule.level().ok_or_else(|| {
                ConfigError::Validation(format!(
                    "header marker {:?} must be 1-6 '#' characters",
                    rule.marker
                ))
            })?;
            if !levels.insert(level) {
                return Err(ConfigError::Validation(format!(
                    "header marker {:?} is listed twice",
                    rule.marker
                )));
            }
            if rule.label.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "header marker {:?} has an empty label",
                    rule.marker
                )));
            }
            if RESERVED_KEYS.contains(&rule.label.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "header label {:?} collides with a reserved metadata key",
                    rule.label
                )));
            }
            if !labels.insert(rule.label.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "header label {:?} is used twice",
                    rule.label
                )));
            }
        }
        Ok(())
    }

    /// Whether `ext` (no dot) is one of the configured Markdown extensions.
    pub fn is_markdown_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Policy for files that are discovered but cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Stop the build on the first unreadable file.
    #[default]
    Abort,
    /// Leave the file out of the dataset and report it.
    Skip,
}

/// A heading marker (`"##"`) and the metadata label it records (`"Header2"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderRule {
    pub marker: String,
    pub label: String,
}

impl HeaderRule {
    pub fn new(marker: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            label: label.into(),
        }
    }

    /// Heading depth the marker stands for, or `None` if the marker is not
    /// 1 to 6 `#` characters.
    pub fn level(&self) -> Option<usize> {
        let n = self.marker.len();
        ((1..=6).contains(&n) && self.marker.bytes().all(|b| b == b'#')).then_some(n)
    }
}

/// Dataset file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// File name of the dataset inside the output directory.
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: "rag_database.json".to_string(),
        }
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// Load config from `config.toml` in the source root.
///
/// The user file is merged key by key over the stock defaults, so it only
/// needs the keys it changes. Unknown keys are rejected and the merged result
/// is validated. A missing file yields the defaults.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    let defaults =
        toml::Value::try_from(BuildConfig::default()).expect("default config must serialize");
    let config_path = root.join("config.toml");
    let merged = if config_path.exists() {
        let user: toml::Value = toml::from_str(&fs::read_to_string(&config_path)?)?;
        merge_toml(defaults, user)
    } else {
        defaults
    };

    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    tracing::debug!(?config, "resolved build config");
    Ok(config)
}

/// Overlay tables key by key; any other overlay value, arrays included,
/// replaces the base value.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                let merged = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, overlay) => overlay,
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r####"# Rulebook Chunker Configuration
# ==============================
# Place this file at the root of the source directory as `config.toml`.
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Files whose first folder under the source root has this name are public
# (access_level 0) until an inline marker says otherwise.
public_folder = "public"

# Level given to every file outside the public folder. Must be 1 or more.
# Inline markers override it for the text that follows them:
#   <!-- SECRET: level3 -->
default_secret_level = 1

# File extensions treated as Markdown (case-insensitive, no dot).
extensions = ["md"]

# What to do with a file that cannot be read (permissions, invalid UTF-8):
#   "abort" - stop the build, write nothing
#   "skip"  - leave the file out and list it in the build report
on_read_error = "abort"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Dataset file written inside the output directory.
file_name = "rag_database.json"

# ---------------------------------------------------------------------------
# Heading split rules
# ---------------------------------------------------------------------------
# Each heading at one of these depths starts a new chunk, and its text is
# recorded in the chunk metadata under `label`. Setting `headers` replaces
# the whole list.
[[headers]]
marker = "#"
label = "Header1"

[[headers]]
marker = "##"
label = "Header2"

[[headers]]
marker = "###"
label = "Header3"
"####
}
