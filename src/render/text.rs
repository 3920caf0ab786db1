//! Plain text rendering.

use crate::error::Result;
use crate::model::{BlockRole, LogicalDocument};

use super::RenderOptions;

/// Convert a document to plain text.
///
/// Each source line of a block becomes one output line (unless reflow is
/// enabled), every block ends with a newline and blocks are separated by
/// one blank line. List items are prefixed with their marker; headings are written
/// bare. An empty document renders as an empty string.
pub fn to_text(doc: &LogicalDocument, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    for (i, block) in doc.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        let lines = if options.reflow_text {
            vec![block.text()]
        } else {
            block.line_texts()
        };

        for (line_no, line) in lines.iter().enumerate() {
            if line_no == 0 {
                if let BlockRole::ListItem { marker } = &block.role {
                    output.push_str(marker);
                    output.push(' ');
                }
            }
            output.push_str(line);
            output.push('\n');
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Block, Line, TextFragment};

    fn block(lines: &[&str], role: BlockRole) -> Block {
        let lines = lines
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let y = 100.0 + i as f32 * 14.0;
                let frag = TextFragment::new(*t, 0, BBox::new(0.0, y - 12.0, 100.0, y), 12.0);
                Line::from_fragments(vec![frag], 0.3).unwrap()
            })
            .collect();
        Block::new(lines, role)
    }

    #[test]
    fn test_to_text() {
        let doc = LogicalDocument {
            blocks: vec![
                block(&["Title"], BlockRole::heading(1)),
                block(&["Hello,", "world!"], BlockRole::Paragraph),
                block(&["item"], BlockRole::list_item("-")),
            ],
            page_count: 1,
        };

        let result = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(result, "Title\n\nHello,\nworld!\n\n- item\n");
    }

    #[test]
    fn test_to_text_reflow() {
        let doc = LogicalDocument {
            blocks: vec![block(&["first", "second"], BlockRole::Paragraph)],
            page_count: 1,
        };

        let options = RenderOptions::new().with_reflow(true);
        let result = to_text(&doc, &options).unwrap();
        assert_eq!(result, "first second\n");
    }

    #[test]
    fn test_to_text_empty() {
        let result = to_text(&LogicalDocument::new(), &RenderOptions::default()).unwrap();
        assert!(result.is_empty());
    }
}
