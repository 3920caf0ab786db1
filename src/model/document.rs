//! Document-level types.

use serde::{Deserialize, Serialize};

use super::{Block, BlockRole};

/// The ordered, page-independent projection of a whole source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogicalDocument {
    /// Blocks in reading order across all pages
    pub blocks: Vec<Block>,

    /// Number of source pages consumed, empty pages included
    pub page_count: usize,
}

impl LogicalDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the blocks in reading order.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Number of heading blocks.
    pub fn heading_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.role.is_heading()).count()
    }

    /// Number of list item blocks.
    pub fn list_item_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.role.is_list_item()).count()
    }

    /// Plain text of the document, blocks separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match &block.role {
                BlockRole::ListItem { marker } => format!("{} {}", marker, block.text()),
                _ => block.text(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl<'a> IntoIterator for &'a LogicalDocument {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
