//! Heading-based chunking.
//!
//! The pipeline is generic over [`HeadingSplitter`] so that a different
//! tokenizer can be dropped in without touching classification. The stock
//! implementation, [`MarkdownHeadingSplitter`], locates headings with
//! pulldown-cmark, which keeps `# comments` inside code fences from being
//! taken as headings and recognizes setext (`===` / `---`) headings as well.
//!
//! ## Chunk Boundaries
//!
//! Each top-level heading whose depth has a rule starts a new chunk. The chunk
//! runs from the heading line up to the next such heading or the end of the
//! block, so the heading text stays in the content and the chunks of a block
//! concatenate back to the block. Text before the first heading of the
//! document becomes a chunk without heading fields. Whitespace-only chunks are
//! dropped.
//!
//! The splitter parses the whole document, not just the block. A block that
//! starts mid-section opens with the heading path in force at its first byte,
//! and a code fence cut by a block boundary is still read as a fence.
//!
//! ## Heading Path
//!
//! ```text
//! # Combat             → Header1 = "Combat"
//! ## Melee             → Header1 = "Combat", Header2 = "Melee"
//! ### Grappling        → ..., Header2 = "Melee", Header3 = "Grappling"
//! ## Ranged            → Header1 = "Combat", Header2 = "Ranged"
//! ```
//!
//! A heading clears every recorded heading at its depth or deeper.

use crate::config::{BuildConfig, HeaderRule};
use crate::types::{Chunk, ChunkMetadata};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::collections::BTreeMap;
use std::iter;
use std::ops::Range;

/// Splits one block of a document into chunks, copying `base` onto each.
///
/// `block` is a byte range into `document`; text outside it only provides
/// context and is never emitted.
pub trait HeadingSplitter {
    fn split(&self, document: &str, block: Range<usize>, base: &ChunkMetadata) -> Vec<Chunk>;
}

/// CommonMark heading splitter driven by `#`-marker rules.
#[derive(Debug, Clone)]
pub struct MarkdownHeadingSplitter {
    /// Heading depth → metadata label.
    labels: BTreeMap<usize, String>,
}

/// A chunk start: byte offset and the heading path in force from there.
struct Section {
    start: usize,
    headers: BTreeMap<String, String>,
}

/// A rule-matching heading whose text is still being collected.
struct PendingHeading {
    depth: usize,
    start: usize,
    text: String,
}

impl MarkdownHeadingSplitter {
    /// Rules with invalid markers are ignored; config validation reports them.
    pub fn new(rules: &[HeaderRule]) -> Self {
        let labels = rules
            .iter()
            .filter_map(|r| r.level().map(|depth| (depth, r.label.clone())))
            .collect();
        Self { labels }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(&config.headers)
    }

    /// Find every chunk start in `text`, in order.
    fn sections(&self, text: &str) -> Vec<Section> {
        let mut sections = vec![Section {
            start: 0,
            headers: BTreeMap::new(),
        }];
        // depth → (label, heading text)
        let mut path: BTreeMap<usize, (String, String)> = BTreeMap::new();
        let mut pending: Option<PendingHeading> = None;
        let mut nesting = 0usize;

        for (event, range) in Parser::new(text).into_offset_iter() {
            match event {
                Event::Start(tag) => {
                    if let Tag::Heading { level, .. } = tag {
                        let depth = level as usize;
                        if nesting == 0 && self.labels.contains_key(&depth) {
                            pending = Some(PendingHeading {
                                depth,
                                start: range.start,
                                text: String::new(),
                            });
                        }
                    }
                    nesting += 1;
                }
                Event::End(tag_end) => {
                    nesting = nesting.saturating_sub(1);
                    if let (TagEnd::Heading(_), 0) = (tag_end, nesting) {
                        if let Some(heading) = pending.take() {
                            if let Some(label) = self.labels.get(&heading.depth) {
                                path.retain(|&d, _| d < heading.depth);
                                path.insert(
                                    heading.depth,
                                    (label.clone(), heading.text.trim().to_string()),
                                );
                            }
                            sections.push(Section {
                                start: heading.start,
                                headers: path.values().cloned().collect(),
                            });
                        }
                    }
                }
                Event::Text(t) | Event::Code(t) => {
                    if let Some(heading) = pending.as_mut() {
                        heading.text.push_str(&t);
                    }
                }
                _ => {}
            }
        }
        sections
    }
}

impl HeadingSplitter for MarkdownHeadingSplitter {
    fn split(&self, document: &str, block: Range<usize>, base: &ChunkMetadata) -> Vec<Chunk> {
        let sections = self.sections(document);
        // The first section starts at 0, so one always covers the block start.
        let opening = sections
            .iter()
            .rposition(|s| s.start <= block.start)
            .unwrap_or(0);
        let starts: Vec<(usize, &BTreeMap<String, String>)> =
            iter::once((block.start, &sections[opening].headers))
                .chain(
                    sections[opening + 1..]
                        .iter()
                        .take_while(|s| s.start < block.end)
                        .map(|s| (s.start, &s.headers)),
                )
                .collect();
        let ends = starts
            .iter()
            .skip(1)
            .map(|(start, _)| *start)
            .chain(iter::once(block.end));

        starts
            .iter()
            .zip(ends)
            .filter_map(|(&(start, headers), end)| {
                let content = &document[start..end];
                if content.trim().is_empty() {
                    return None;
                }
                let mut metadata = base.clone();
                metadata.headers.extend(headers.clone());
                Some(Chunk {
                    page_content: content.to_string(),
                    metadata,
                })
            })
            .collect()
    }
}
