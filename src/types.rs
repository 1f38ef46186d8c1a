//! Shared types written to the dataset.
//!
//! The browser-side menus read `rag_database.json` directly, so the serialized
//! shape of [`Chunk`] is the contract with the presentation layer. Field names
//! (`pageContent`, `metadata.access_level`, `metadata.Header1`, ...) must not
//! change without updating those consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric access tier. `0` is public; `1` and above are secret tiers.
pub type AccessLevel = u32;

/// Coarse public/secret classification, derived from an [`AccessLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Secret,
}

impl Access {
    pub fn from_level(level: AccessLevel) -> Self {
        if level == 0 {
            Access::Public
        } else {
            Access::Secret
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Secret => "secret",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to every chunk.
///
/// `source`, `access` and `access_level` come from the block the chunk was cut
/// from. `headers` holds the heading path (`Header1` → "Combat", ...) and is
/// flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Path relative to the source root, always `/`-separated.
    pub source: String,
    pub access: Access,
    pub access_level: AccessLevel,
    #[serde(flatten)]
    pub headers: BTreeMap<String, String>,
}

impl ChunkMetadata {
    /// Base metadata for a block: no heading fields yet.
    pub fn new(source: impl Into<String>, access_level: AccessLevel) -> Self {
        Self {
            source: source.into(),
            access: Access::from_level(access_level),
            access_level,
            headers: BTreeMap::new(),
        }
    }

    /// Heading value recorded under `label`, if any.
    pub fn header(&self, label: &str) -> Option<&str> {
        self.headers.get(label).map(String::as_str)
    }
}

/// One persisted unit of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(rename = "pageContent")]
    pub page_content: String,
    pub metadata: ChunkMetadata,
}
