//! JSON dump of the reconstructed document structure.
//!
//! The dump is a flattened view for inspection: one entry per block with its
//! role, rendered lines, and styled runs. Fragment geometry is left out.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Block, BlockRole, LogicalDocument, TextRun};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct DocumentDump<'a> {
    page_count: usize,
    block_count: usize,
    heading_count: usize,
    list_item_count: usize,
    blocks: Vec<BlockDump<'a>>,
}

#[derive(Serialize)]
struct BlockDump<'a> {
    index: usize,
    page_index: usize,
    role: &'a BlockRole,
    lines: Vec<String>,
    runs: Vec<TextRun>,
}

impl<'a> From<&'a Block> for BlockDump<'a> {
    fn from(block: &'a Block) -> Self {
        Self {
            index: block.index,
            page_index: block.page_index,
            role: &block.role,
            lines: block.line_texts(),
            runs: block.runs(),
        }
    }
}

/// Dump the document structure as JSON.
pub fn to_json(doc: &LogicalDocument, format: JsonFormat) -> Result<String> {
    let dump = DocumentDump {
        page_count: doc.page_count,
        block_count: doc.len(),
        heading_count: doc.heading_count(),
        list_item_count: doc.list_item_count(),
        blocks: doc.iter().map(BlockDump::from).collect(),
    };

    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&dump),
        JsonFormat::Compact => serde_json::to_string(&dump),
    };
    result.map_err(|e| Error::Serialization(format!("JSON dump: {}", e)))
}
