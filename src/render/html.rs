//! HTML rendering.

use std::fmt::Write as _;

use html_escape::encode_quoted_attribute;

use crate::error::Result;
use crate::model::{Block, BlockRole, ListKind, LogicalDocument, MAX_HEADING_LEVEL};

use super::RenderOptions;

/// Convert a document to a standalone HTML document.
///
/// Headings become `<h1>`..`<h3>`, paragraphs `<p>`, and runs of consecutive
/// list items of the same kind are wrapped in a single `<ul>` or `<ol>`.
/// All text is escaped.
pub fn to_html(doc: &LogicalDocument, options: &RenderOptions) -> Result<String> {
    let mut body = String::new();
    let mut open_list: Option<ListKind> = None;

    for block in doc {
        let kind = block.role.list_kind();
        if open_list.is_some() && open_list != kind {
            close_list(&mut body, open_list.take());
        }

        match &block.role {
            BlockRole::Heading { level } => {
                let level = (*level).clamp(1, MAX_HEADING_LEVEL);
                let _ = writeln!(body, "<h{level}>{}</h{level}>", inline(block, options));
            }
            BlockRole::Paragraph => {
                let _ = writeln!(body, "<p>{}</p>", inline(block, options));
            }
            BlockRole::ListItem { .. } => {
                if open_list.is_none() {
                    body.push_str(list_tag(kind, true));
                    body.push('\n');
                    open_list = kind;
                }
                let _ = writeln!(body, "<li>{}</li>", inline(block, options));
            }
        }
    }
    close_list(&mut body, open_list);

    let mut output = String::with_capacity(body.len() + 128);
    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(output, "<title>{}</title>", encode_quoted_attribute(&options.title));
    output.push_str("</head>\n<body>");
    if !body.is_empty() {
        output.push('\n');
        output.push_str(&body);
    }
    output.push_str("</body>\n</html>\n");

    Ok(output)
}

fn inline(block: &Block, options: &RenderOptions) -> String {
    let separator = if options.preserve_line_breaks { "<br>" } else { " " };
    block
        .line_texts()
        .iter()
        .map(|line| encode_quoted_attribute(line).into_owned())
        .collect::<Vec<_>>()
        .join(separator)
}

fn close_list(body: &mut String, kind: Option<ListKind>) {
    if kind.is_some() {
        body.push_str(list_tag(kind, false));
        body.push('\n');
    }
}

fn list_tag(kind: Option<ListKind>, open: bool) -> &'static str {
    match (kind, open) {
        (Some(ListKind::Ordered), true) => "<ol>",
        (Some(ListKind::Ordered), false) => "</ol>",
        (_, true) => "<ul>",
        (_, false) => "</ul>",
    }
}
