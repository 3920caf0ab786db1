//! DOCX (WordprocessingML) rendering.
//!
//! The package is written with fixed entry timestamps so that identical
//! documents produce byte-identical archives.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{Error, Result};
use crate::model::{Block, BlockRole, LogicalDocument, TextRun, MAX_HEADING_LEVEL};

use super::RenderOptions;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_DOC_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// Paragraph style used for list items.
pub const LIST_STYLE: &str = "ListParagraph";

/// Convert a document to a DOCX package.
///
/// Headings use the built-in `Heading1`..`Heading3` styles, list items the
/// `ListParagraph` style with their marker written as leading text, and
/// every other block the `Normal` style. Bold and italic runs are kept.
pub fn to_docx(doc: &LogicalDocument, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    add_part(&mut zip, "[Content_Types].xml", &content_types(), file_options)?;
    add_part(&mut zip, "_rels/.rels", &package_rels(), file_options)?;
    add_part(&mut zip, "word/document.xml", &document_xml(doc, options), file_options)?;
    add_part(&mut zip, "word/styles.xml", &styles_xml(), file_options)?;
    add_part(
        &mut zip,
        "word/_rels/document.xml.rels",
        &document_rels(),
        file_options,
    )?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn add_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    content: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(content.as_bytes())
        .map_err(|e| Error::Serialization(format!("DOCX part {}: {}", name, e)))
}

fn content_types() -> String {
    format!(
        "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
</Types>"
    )
}

fn package_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{REL_NS}\">\
<Relationship Id=\"rId1\" Type=\"{OFFICE_DOC_REL}\" Target=\"word/document.xml\"/>\
</Relationships>"
    )
}

fn document_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{REL_NS}\">\
<Relationship Id=\"rId1\" Type=\"{STYLES_REL}\" Target=\"styles.xml\"/>\
</Relationships>"
    )
}

fn document_xml(doc: &LogicalDocument, options: &RenderOptions) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(&format!("<w:document xmlns:w=\"{WORD_NS}\"><w:body>"));

    for block in doc {
        write_paragraph(&mut xml, block, options);
    }

    // US Letter, one inch margins
    xml.push_str(
        "<w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
<w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
    );
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, block: &Block, options: &RenderOptions) {
    xml.push_str("<w:p>");

    let style = match &block.role {
        BlockRole::Heading { level } => {
            Some(format!("Heading{}", (*level).clamp(1, MAX_HEADING_LEVEL)))
        }
        BlockRole::ListItem { .. } => Some(LIST_STYLE.to_string()),
        BlockRole::Paragraph => None,
    };
    if let Some(style) = style {
        xml.push_str(&format!("<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>", style));
    }

    if let BlockRole::ListItem { marker } = &block.role {
        write_run(xml, &TextRun::new(format!("{} ", marker)));
    }

    if options.preserve_line_breaks {
        for (i, runs) in block.line_runs().iter().enumerate() {
            if i > 0 {
                xml.push_str("<w:r><w:br/></w:r>");
            }
            for run in runs {
                write_run(xml, run);
            }
        }
    } else {
        for run in block.runs() {
            write_run(xml, &run);
        }
    }

    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &TextRun) {
    if run.is_empty() {
        return;
    }
    xml.push_str("<w:r>");
    if run.style.has_styling() {
        xml.push_str("<w:rPr>");
        if run.style.bold {
            xml.push_str("<w:b/>");
        }
        if run.style.italic {
            xml.push_str("<w:i/>");
        }
        xml.push_str("</w:rPr>");
    }
    xml.push_str("<w:t xml:space=\"preserve\">");
    xml.push_str(&escape(run.text.as_str()));
    xml.push_str("</w:t></w:r>");
}

fn styles_xml() -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(&format!("<w:styles xmlns:w=\"{WORD_NS}\">"));
    xml.push_str(
        "<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">\
<w:name w:val=\"Normal\"/><w:qFormat/>\
<w:pPr><w:spacing w:after=\"160\"/></w:pPr>\
<w:rPr><w:sz w:val=\"22\"/></w:rPr></w:style>",
    );

    // Half-point sizes for levels 1..=3
    for (level, size) in [(1, 32), (2, 28), (3, 24)] {
        xml.push_str(&format!(
            "<w:style w:type=\"paragraph\" w:styleId=\"Heading{level}\">\
<w:name w:val=\"heading {level}\"/><w:basedOn w:val=\"Normal\"/>\
<w:next w:val=\"Normal\"/><w:qFormat/>\
<w:pPr><w:keepNext/><w:spacing w:before=\"240\" w:after=\"120\"/>\
<w:outlineLvl w:val=\"{outline}\"/></w:pPr>\
<w:rPr><w:b/><w:sz w:val=\"{size}\"/></w:rPr></w:style>",
            outline = level - 1,
        ));
    }

    xml.push_str(&format!(
        "<w:style w:type=\"paragraph\" w:styleId=\"{LIST_STYLE}\">\
<w:name w:val=\"List Paragraph\"/><w:basedOn w:val=\"Normal\"/><w:qFormat/>\
<w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/><w:contextualSpacing/></w:pPr></w:style>"
    ));
    xml.push_str("</w:styles>");
    xml
}
