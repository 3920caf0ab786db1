//! Target output formats.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// Plain UTF-8 text
    Txt,
    /// Standalone HTML document
    Html,
    /// Word-processing document (Office Open XML)
    Docx,
}

impl TargetFormat {
    /// All supported formats.
    pub const ALL: [TargetFormat; 3] = [TargetFormat::Txt, TargetFormat::Html, TargetFormat::Docx];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Txt => "txt",
            TargetFormat::Html => "html",
            TargetFormat::Docx => "docx",
        }
    }

    /// MIME type of the serialized output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::Txt => "text/plain",
            TargetFormat::Html => "text/html",
            TargetFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Output path next to the source: same stem, this format's extension.
    pub fn default_output_path(&self, source: &Path) -> PathBuf {
        source.with_extension(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(TargetFormat::Txt),
            "html" | "htm" => Ok(TargetFormat::Html),
            "docx" => Ok(TargetFormat::Docx),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}
