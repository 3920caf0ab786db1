//! Conversion orchestration: source pages in, a written output file out.
//!
//! A [`ConversionJob`] names the source, the target format, and the output
//! path. A [`Converter`] runs it once, pulling pages from a
//! [`FragmentSource`], reporting progress to a [`ProgressSink`] and writing
//! the result through an [`OutputWriter`].
//!
//! # Example
//!
//! ```no_run
//! use pdfweave::convert::{ConversionJob, Converter, ConvertOptions};
//! use pdfweave::source::JsonLinesSource;
//! use pdfweave::TargetFormat;
//!
//! fn main() -> pdfweave::Result<()> {
//!     let mut job = ConversionJob::new("report.jsonl", TargetFormat::Html);
//!     let mut source = JsonLinesSource::open("report.jsonl")?;
//!
//!     let output = Converter::new(ConvertOptions::default()).run(&mut job, &mut source)?;
//!     println!("wrote {}", output.display());
//!     Ok(())
//! }
//! ```

mod progress;
mod worker;
mod writer;

pub use progress::{ChannelProgress, CollectProgress, LogProgress, ProgressEvent, ProgressSink};
pub use worker::{spawn, CancelToken, ConversionHandle};
pub use writer::{AtomicFileWriter, OutputWriter};
pub(crate) use writer::write_output;

#[cfg(feature = "async")]
pub use worker::convert_async;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::{BuildOptions, DocumentBuilder};
use crate::error::{Error, Result};
use crate::layout::{LayoutAnalyzer, LayoutOptions};
use crate::model::LogicalDocument;
use crate::render::{self, RenderOptions, TargetFormat};
use crate::source::{FragmentSource, SourcePage};

/// Options for document conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Layout analysis thresholds
    pub layout: LayoutOptions,

    /// Logical document assembly
    pub build: BuildOptions,

    /// Serializer options
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Decode(format!("options: {}", e)))
    }

    /// Set layout options.
    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout = options;
        self
    }

    /// Set build options.
    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

/// Lifecycle of a conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Not started
    Pending,
    /// Currently executing
    Running,
    /// Output written
    Succeeded,
    /// Stopped with an error; nothing was written
    Failed,
}

impl JobState {
    /// Check if the state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// A single-use conversion request.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    source_path: PathBuf,
    format: TargetFormat,
    output_path: PathBuf,
    state: JobState,
}

impl ConversionJob {
    /// Create a job writing next to the source, with the format's extension.
    pub fn new(source_path: impl Into<PathBuf>, format: TargetFormat) -> Self {
        let source_path = source_path.into();
        let output_path = format.default_output_path(&source_path);
        Self {
            source_path,
            format,
            output_path,
            state: JobState::Pending,
        }
    }

    /// Set an explicit output path.
    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Path of the source document.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Target format.
    pub fn format(&self) -> TargetFormat {
        self.format
    }

    /// Destination path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Current state.
    pub fn state(&self) -> JobState {
        self.state
    }

    fn display_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// Runs conversion jobs.
pub struct Converter {
    options: ConvertOptions,
    progress: Box<dyn ProgressSink>,
    writer: Box<dyn OutputWriter>,
    cancel: CancelToken,
}

impl Converter {
    /// Create a converter that logs progress and writes files atomically.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            progress: Box::new(LogProgress),
            writer: Box::new(AtomicFileWriter),
            cancel: CancelToken::new(),
        }
    }

    /// Set the progress sink.
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(sink);
        self
    }

    /// Set the output writer.
    pub fn with_writer(mut self, writer: impl OutputWriter + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    /// Set the cancellation token checked between pages.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Token that cancels jobs run by this converter.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Run a job to completion.
    ///
    /// The job moves from `Pending` through `Running` to `Succeeded` or
    /// `Failed`. A job that has already run is rejected with
    /// [`Error::JobAlreadyRun`] and left untouched.
    pub fn run<S: FragmentSource + ?Sized>(
        &self,
        job: &mut ConversionJob,
        source: &mut S,
    ) -> Result<PathBuf> {
        if job.state != JobState::Pending {
            return Err(Error::JobAlreadyRun);
        }

        job.state = JobState::Running;
        log::info!(
            "Converting {} to {}",
            job.source_path.display(),
            job.output_path.display()
        );

        match self.execute(job, source) {
            Ok(path) => {
                job.state = JobState::Succeeded;
                self.progress.emit("Conversion Finished!");
                Ok(path)
            }
            Err(e) => {
                job.state = JobState::Failed;
                log::warn!("Conversion of {} failed: {}", job.source_path.display(), e);
                self.progress.emit(&e.to_string());
                Err(e)
            }
        }
    }

    fn execute<S: FragmentSource + ?Sized>(
        &self,
        job: &ConversionJob,
        source: &mut S,
    ) -> Result<PathBuf> {
        self.progress
            .emit(&format!("Starting conversion of {}...", job.display_name()));
        self.progress.emit(&format!("Target format: {}", job.format));
        self.progress.emit("Processing file...");

        let doc = reconstruct_with(source, &self.options, Some(&self.cancel))?;
        let bytes = render::render(&doc, job.format, &self.options.render)?;

        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        write_output(&*self.writer, &job.output_path, &bytes)?;

        Ok(job.output_path.clone())
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Reconstruct the logical document from every page of a source.
pub fn reconstruct<S: FragmentSource + ?Sized>(
    source: &mut S,
    options: &ConvertOptions,
) -> Result<LogicalDocument> {
    reconstruct_with(source, options, None)
}

fn reconstruct_with<S: FragmentSource + ?Sized>(
    source: &mut S,
    options: &ConvertOptions,
    cancel: Option<&CancelToken>,
) -> Result<LogicalDocument> {
    let mut analyzer = LayoutAnalyzer::new(options.layout.clone());
    let mut lines = Vec::new();
    let mut page_count = 0;
    let mut last_index: Option<usize> = None;

    loop {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(Error::Cancelled);
        }
        let Some(mut page) = source.next_page()? else {
            break;
        };
        // Lines are split into pages by index, so indices must increase
        if let Some(last) = last_index.filter(|last| page.page_index <= *last) {
            log::warn!(
                "Page index {} does not follow page {}; renumbering as {}",
                page.page_index,
                last,
                last + 1
            );
            page = SourcePage::new(last + 1, page.fragments);
        }
        last_index = Some(page.page_index);
        log::debug!(
            "Page {}: {} fragments",
            page.page_index,
            page.fragments.len()
        );
        page_count = page_count.max(page.page_index + 1);
        lines.extend(analyzer.analyze(page.fragments));
    }

    if !analyzer.warnings().is_empty() {
        log::warn!("Skipped {} malformed fragments", analyzer.warnings().len());
    }

    let blocks = analyzer.group_lines(lines);
    let mut doc = DocumentBuilder::new(options.build.clone()).build(blocks);
    doc.page_count = page_count;
    Ok(doc)
}
