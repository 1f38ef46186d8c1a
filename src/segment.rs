//! Block segmentation at inline access markers.
//!
//! A marker is an HTML comment that switches the access level for all text
//! after it:
//!
//! ```text
//! Everyone can read this.
//! <!-- SECRET: level2 -->
//! Only tier-2 readers see this.
//! <!-- SECRET: level0 -->
//! Public again.
//! ```
//!
//! Whitespace inside the comment delimiters is free (`<!--SECRET:level2-->`
//! works). The token must be `level` followed by digits; anything else is not
//! a marker and stays in the text verbatim. The token cannot contain `<` or
//! `>`, so an unterminated `<!-- SECRET:` never swallows a later marker.
//!
//! Segmentation runs a two-state automaton over the marker matches: the state
//! is the level in force and the offset where its block began. A marker closes
//! the current block (under the *old* level) and opens a new one under the
//! marker's level. Blocks that contain only whitespace are dropped.
//!
//! The result is the document with every marker removed plus the block ranges
//! into it. Heading splitting reads the whole stripped document, so a heading
//! path carries across marker boundaries. A marker placed inside a code fence
//! still ends its block there: the fence text is divided between two chunks,
//! though its lines are never read as headings.

use crate::access::parse_level_token;
use crate::types::AccessLevel;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*SECRET:\s*([^\s<>]+?)\s*-->").expect("marker pattern is valid")
});

/// A run of text sharing one access level, as a byte range into
/// [`Segmented::text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub level: AccessLevel,
    pub range: Range<usize>,
}

/// A document with its markers removed, cut into blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmented {
    /// The document minus every recognized marker.
    pub text: String,
    /// Non-blank blocks in document order.
    pub blocks: Vec<Block>,
}

impl Segmented {
    pub fn block_text(&self, block: &Block) -> &str {
        &self.text[block.range.clone()]
    }
}

/// A recognized marker: its span in the source and the level it sets.
struct Marker {
    start: usize,
    end: usize,
    level: AccessLevel,
}

/// Automaton state: the level in force and where its text starts.
#[derive(Debug, Clone, Copy)]
struct InBlock {
    level: AccessLevel,
    start: usize,
}

struct Scan {
    out: Segmented,
    current: InBlock,
    /// Source offset up to which text has been copied.
    consumed: usize,
}

impl Scan {
    fn close_block(&mut self) {
        let range = self.current.start..self.out.text.len();
        if !self.out.text[range.clone()].trim().is_empty() {
            self.out.blocks.push(Block {
                level: self.current.level,
                range,
            });
        }
    }
}

fn markers(content: &str) -> impl Iterator<Item = Marker> {
    MARKER.captures_iter(content).filter_map(|caps| {
        let whole = caps.get(0)?;
        let level = parse_level_token(caps.get(1)?.as_str())?;
        Some(Marker {
            start: whole.start(),
            end: whole.end(),
            level,
        })
    })
}

/// Split `content` into blocks, starting at `default_level`.
pub fn segment(content: &str, default_level: AccessLevel) -> Segmented {
    let initial = Scan {
        out: Segmented {
            text: String::with_capacity(content.len()),
            blocks: Vec::new(),
        },
        current: InBlock {
            level: default_level,
            start: 0,
        },
        consumed: 0,
    };
    let mut scan = markers(content).fold(initial, |mut scan, marker| {
        scan.out.text.push_str(&content[scan.consumed..marker.start]);
        scan.close_block();
        scan.current = InBlock {
            level: marker.level,
            start: scan.out.text.len(),
        };
        scan.consumed = marker.end;
        scan
    });
    scan.out.text.push_str(&content[scan.consumed..]);
    scan.close_block();

    tracing::trace!(blocks = scan.out.blocks.len(), "segmented");
    scan.out
}

/// `content` with every recognized marker removed.
pub fn strip_markers(content: &str) -> String {
    segment(content, 0).text
}
