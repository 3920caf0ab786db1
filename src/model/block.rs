//! Structural blocks: headings, paragraphs, and list items.

use serde::{Deserialize, Serialize};

use super::line::normalize;
use super::run::RunBuilder;
use super::{Line, TextRun, TextStyle};

/// Deepest heading level the pipeline emits.
pub const MAX_HEADING_LEVEL: u8 = 3;

/// Structural role of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockRole {
    /// A heading, level 1 (largest) to 3
    Heading {
        /// Heading level
        level: u8,
    },
    /// A regular paragraph
    Paragraph,
    /// A list item with its captured marker (e.g. "-", "•", "3.")
    ListItem {
        /// Marker text as it appeared in the source
        marker: String,
    },
}

impl BlockRole {
    /// Create a heading role, clamping the level into 1..=3.
    pub fn heading(level: u8) -> Self {
        BlockRole::Heading {
            level: level.clamp(1, MAX_HEADING_LEVEL),
        }
    }

    /// Create a list item role.
    pub fn list_item(marker: impl Into<String>) -> Self {
        BlockRole::ListItem {
            marker: marker.into(),
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockRole::Heading { .. })
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        matches!(self, BlockRole::ListItem { .. })
    }

    /// List kind for list items, `None` otherwise.
    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            BlockRole::ListItem { marker } => Some(ListKind::from_marker(marker)),
            _ => None,
        }
    }
}

/// Ordered (numbered) or unordered (bulleted) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Digit-dot markers
    Ordered,
    /// Bullet glyph markers
    Unordered,
}

impl ListKind {
    /// Classify a captured marker.
    pub fn from_marker(marker: &str) -> Self {
        let is_numbered = marker
            .strip_suffix('.')
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
        if is_numbered {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        }
    }
}

/// One or more consecutive lines forming a single structural unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Stable position in the logical document (assigned by the builder)
    pub index: usize,
    /// Lines of the block, in reading order
    pub lines: Vec<Line>,
    /// Structural role
    pub role: BlockRole,
    /// Page of the first line
    pub page_index: usize,
    /// Byte length of the list marker prefix stripped from the first line
    #[serde(default)]
    pub(crate) marker_len: usize,
}

impl Block {
    /// Create a paragraph or heading block.
    pub fn new(lines: Vec<Line>, role: BlockRole) -> Self {
        let page_index = lines.first().map(Line::page_index).unwrap_or(0);
        Self {
            index: 0,
            lines,
            role,
            page_index,
            marker_len: 0,
        }
    }

    /// Create a list item block whose first line starts with a marker prefix
    /// of `marker_len` bytes (marker plus trailing whitespace).
    pub fn list_item(lines: Vec<Line>, marker: impl Into<String>, marker_len: usize) -> Self {
        let mut block = Self::new(lines, BlockRole::list_item(marker));
        block.marker_len = marker_len;
        block
    }

    /// Rendered text of each line, list marker removed.
    pub fn line_texts(&self) -> Vec<String> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let text = line.text();
                if i == 0 && self.marker_len > 0 {
                    text.get(self.marker_len..).unwrap_or("").to_string()
                } else {
                    text
                }
            })
            .collect()
    }

    /// Rendered text of the block with lines joined by spaces.
    pub fn text(&self) -> String {
        self.line_texts().join(" ")
    }

    /// Character count of the rendered text.
    pub fn char_count(&self) -> usize {
        self.text().chars().count()
    }

    /// Check if the block renders no visible text.
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Styled runs of each line, aligned with the source fragments and with
    /// the list marker prefix removed. Adjacent fragments with identical
    /// style share a run.
    pub fn line_runs(&self) -> Vec<Vec<TextRun>> {
        let mut skip = self.marker_len;

        self.lines
            .iter()
            .map(|line| {
                let mut builder = RunBuilder::default();
                for (space, frag) in line.pieces() {
                    let style = TextStyle {
                        bold: frag.is_bold,
                        italic: frag.is_italic,
                    };
                    let mut piece = normalize(&frag.text);
                    if space {
                        piece.insert(0, ' ');
                    }
                    if skip > 0 {
                        let cut = skip.min(piece.len());
                        skip -= cut;
                        piece = piece.get(cut..).unwrap_or("").to_string();
                    }
                    builder.push(&piece, style);
                }
                builder.finish()
            })
            .collect()
    }

    /// Styled runs of the whole block, lines joined by spaces.
    pub fn runs(&self) -> Vec<TextRun> {
        let mut builder = RunBuilder::default();
        for (line_no, runs) in self.line_runs().into_iter().enumerate() {
            if line_no > 0 {
                builder.push_plain(" ");
            }
            for run in runs {
                builder.push(&run.text, run.style);
            }
        }
        builder.finish()
    }

    /// Absorb the lines of another block (same page, following this one).
    pub(crate) fn absorb(&mut self, other: Block) {
        self.lines.extend(other.lines);
    }
}
