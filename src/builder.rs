//! Logical document assembly from analyzed blocks.

use serde::{Deserialize, Serialize};

use crate::model::{Block, BlockRole, LogicalDocument};

/// Combined character count below which adjacent short paragraphs merge.
pub const MIN_PARAGRAPH_CHARS: usize = 40;

/// Options for building the logical document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// See [`MIN_PARAGRAPH_CHARS`]
    pub min_paragraph_chars: usize,

    /// Whether to run the anti-fragmentation pass at all
    pub merge_fragments: bool,
}

impl BuildOptions {
    /// Create new build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimal-content threshold.
    pub fn with_min_paragraph_chars(mut self, chars: usize) -> Self {
        self.min_paragraph_chars = chars;
        self
    }

    /// Enable or disable merging of short adjacent paragraphs.
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge_fragments = merge;
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            min_paragraph_chars: MIN_PARAGRAPH_CHARS,
            merge_fragments: true,
        }
    }
}

/// Builds a [`LogicalDocument`] from blocks in reading order.
///
/// Blocks are never reordered. Adjacent paragraphs on the same page whose
/// combined text is shorter than the threshold are merged, then every block
/// receives its sequence index.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    options: BuildOptions,
}

impl DocumentBuilder {
    /// Create a new builder.
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build the logical document.
    pub fn build(&self, blocks: Vec<Block>) -> LogicalDocument {
        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());

        for block in blocks {
            if block.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if self.options.merge_fragments && self.should_merge(prev, &block) => {
                    log::debug!(
                        "Merging short paragraph on page {} into previous",
                        block.page_index
                    );
                    prev.absorb(block);
                }
                _ => merged.push(block),
            }
        }

        for (index, block) in merged.iter_mut().enumerate() {
            block.index = index;
        }

        let page_count = merged.last().map(|b| b.page_index + 1).unwrap_or(0);
        LogicalDocument {
            blocks: merged,
            page_count,
        }
    }

    fn should_merge(&self, prev: &Block, next: &Block) -> bool {
        prev.role == BlockRole::Paragraph
            && next.role == BlockRole::Paragraph
            && prev.page_index == next.page_index
            && prev.char_count() + next.char_count() < self.options.min_paragraph_chars
    }
}
