//! Error types for the pdfweave library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Alias used by the conversion entry points.
pub type ConversionError = Error;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the source or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The fragment source is malformed or unreadable.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A serializer could not encode the document or flush its output.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The requested output format is not one of txt, html, docx.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The job already reached a terminal state.
    #[error("Conversion job has already run")]
    JobAlreadyRun,

    /// The job was cancelled between pages.
    #[error("Conversion cancelled")]
    Cancelled,

    /// The background worker running a job panicked or was aborted.
    #[error("Conversion worker failed: {0}")]
    Worker(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::Decode(err.to_string())
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Serialization(format!("DOCX container: {}", err))
    }
}
