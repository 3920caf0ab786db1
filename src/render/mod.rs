//! Serializers turning a logical document into output bytes.
//!
//! Every serializer is pure: the same document and options always produce
//! byte-identical output.

mod docx;
mod format;
mod html;
mod json;
mod options;
mod text;

pub use docx::{to_docx, LIST_STYLE};
pub use format::TargetFormat;
pub use html::to_html;
pub use json::{to_json, JsonFormat};
pub use options::{RenderOptions, DEFAULT_TITLE};
pub use text::to_text;

use crate::error::Result;
use crate::model::LogicalDocument;

/// Serialize a document into the bytes of the requested format.
pub fn render(doc: &LogicalDocument, format: TargetFormat, options: &RenderOptions) -> Result<Vec<u8>> {
    log::debug!("Rendering {} blocks as {}", doc.len(), format);
    match format {
        TargetFormat::Txt => to_text(doc, options).map(String::into_bytes),
        TargetFormat::Html => to_html(doc, options).map(String::into_bytes),
        TargetFormat::Docx => to_docx(doc, options),
    }
}
