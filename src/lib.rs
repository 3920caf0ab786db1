//! # pdfweave
//!
//! Reconstructs reading-order documents from positioned PDF text fragments
//! and exports them as plain text, HTML, or DOCX.
//!
//! The pipeline has four stages:
//!
//! 1. a [`FragmentSource`] yields the positioned text of each page,
//! 2. the [`LayoutAnalyzer`] groups fragments into lines and lines into
//!    headings, paragraphs, and list items,
//! 3. the [`DocumentBuilder`] assembles the [`LogicalDocument`],
//! 4. a serializer in [`render`] produces the output bytes.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdfweave::Result<()> {
//!     // report.jsonl holds one JSON page object per line
//!     let output = pdfweave::convert("report.jsonl", "html", None)?;
//!     println!("wrote {}", output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout reconstruction**: lines, paragraphs, headings (three levels),
//!   bulleted and numbered lists
//! - **Multiple output formats**: plain text, HTML, DOCX, JSON dump
//! - **Atomic output**: no partial files on failure
//! - **Background jobs**: progress over a channel, cooperative cancellation
//! - **Async**: `convert_async` on tokio with the `async` feature

pub mod builder;
pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use builder::{BuildOptions, DocumentBuilder};
pub use convert::{
    CancelToken, ConversionHandle, ConversionJob, ConvertOptions, Converter, JobState,
    OutputWriter, ProgressEvent, ProgressSink,
};
pub use error::{ConversionError, Error, Result};
pub use layout::{LayoutAnalyzer, LayoutOptions};
pub use model::{BBox, Block, BlockRole, Line, LogicalDocument, TextFragment, TextRun, TextStyle};
pub use render::{JsonFormat, RenderOptions, TargetFormat};
pub use source::{FragmentSource, JsonLinesSource, MemorySource, SourcePage};

#[cfg(feature = "async")]
pub use convert::convert_async;

use std::path::{Path, PathBuf};

use convert::{AtomicFileWriter, LogProgress};

/// Convert a JSON-lines fragment file to the given format.
///
/// `target_format` is parsed before any work is done. Without an explicit
/// `output_path` the output lands next to the source with the format's
/// extension. Progress is logged.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// let out = pdfweave::convert("paper.jsonl", "docx", Some(Path::new("out/paper.docx"))).unwrap();
/// assert!(out.ends_with("paper.docx"));
/// ```
pub fn convert<P: AsRef<Path>>(
    source_path: P,
    target_format: &str,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let format: TargetFormat = target_format.parse()?;
    let source_path = source_path.as_ref();

    let mut job = ConversionJob::new(source_path, format);
    if let Some(output) = output_path {
        job = job.with_output(output);
    }

    let mut source = JsonLinesSource::open(source_path)?;
    convert_with(
        &mut source,
        &mut job,
        ConvertOptions::default(),
        LogProgress,
        AtomicFileWriter,
    )
}

/// Run a job with a custom source, progress sink, and output writer.
///
/// # Example
///
/// ```no_run
/// use pdfweave::convert::{AtomicFileWriter, CollectProgress};
/// use pdfweave::{convert_with, ConversionJob, ConvertOptions, MemorySource, TargetFormat};
/// use std::sync::Arc;
///
/// let progress = Arc::new(CollectProgress::new());
/// let mut job = ConversionJob::new("empty.jsonl", TargetFormat::Txt);
/// convert_with(
///     &mut MemorySource::default(),
///     &mut job,
///     ConvertOptions::default(),
///     progress.clone(),
///     AtomicFileWriter,
/// )
/// .unwrap();
/// assert_eq!(progress.lines().last().unwrap(), "Conversion Finished!");
/// ```
pub fn convert_with<S, P, W>(
    source: &mut S,
    job: &mut ConversionJob,
    options: ConvertOptions,
    progress: P,
    writer: W,
) -> Result<PathBuf>
where
    S: FragmentSource + ?Sized,
    P: ProgressSink + 'static,
    W: OutputWriter + 'static,
{
    Converter::new(options)
        .with_progress(progress)
        .with_writer(writer)
        .run(job, source)
}

/// Plain text of the reconstructed document, for previews.
///
/// # Example
///
/// ```no_run
/// use pdfweave::{preview_text, JsonLinesSource};
///
/// let mut source = JsonLinesSource::open("paper.jsonl").unwrap();
/// println!("{}", preview_text(&mut source).unwrap());
/// ```
pub fn preview_text<S: FragmentSource + ?Sized>(source: &mut S) -> Result<String> {
    Pdfweave::new().load(source)?.to_text()
}

/// Builder for reconstructing and exporting documents.
///
/// # Example
///
/// ```no_run
/// use pdfweave::{JsonLinesSource, Pdfweave, TargetFormat};
///
/// let mut source = JsonLinesSource::open("paper.jsonl")?;
/// let html = Pdfweave::new()
///     .with_title("Quarterly report")
///     .without_lists()
///     .load(&mut source)?
///     .render(TargetFormat::Html)?;
/// # Ok::<(), pdfweave::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdfweave {
    options: ConvertOptions,
}

impl Pdfweave {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a full set of options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the HTML document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.render = self.options.render.with_title(title);
        self
    }

    /// Keep line breaks inside HTML and DOCX blocks.
    pub fn with_line_breaks(mut self) -> Self {
        self.options.render = self.options.render.with_line_breaks(true);
        self
    }

    /// Disable list detection.
    pub fn without_lists(mut self) -> Self {
        self.options.layout = self.options.layout.with_lists(false);
        self
    }

    /// Disable merging of short paragraphs.
    pub fn without_merging(mut self) -> Self {
        self.options.build = self.options.build.with_merge(false);
        self
    }

    /// Reconstruct the document from a source.
    pub fn load<S: FragmentSource + ?Sized>(self, source: &mut S) -> Result<WeaveResult> {
        let document = convert::reconstruct(source, &self.options)?;
        Ok(WeaveResult {
            document,
            render_options: self.options.render,
        })
    }
}

/// A reconstructed document ready for export.
#[derive(Debug, Clone)]
pub struct WeaveResult {
    /// The logical document
    pub document: LogicalDocument,
    /// Render options to use
    render_options: RenderOptions,
}

impl WeaveResult {
    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to HTML.
    pub fn to_html(&self) -> Result<String> {
        render::to_html(&self.document, &self.render_options)
    }

    /// Convert to DOCX bytes.
    pub fn to_docx(&self) -> Result<Vec<u8>> {
        render::to_docx(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Serialize into the given format.
    pub fn render(&self, format: TargetFormat) -> Result<Vec<u8>> {
        render::render(&self.document, format, &self.render_options)
    }

    /// Serialize and write atomically to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: TargetFormat) -> Result<()> {
        let bytes = self.render(format)?;
        convert::write_output(&AtomicFileWriter, path.as_ref(), &bytes)
    }

    /// Get the document.
    pub fn document(&self) -> &LogicalDocument {
        &self.document
    }
}
