//! Background execution of conversion jobs.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;

use super::{ChannelProgress, ConversionJob, Converter, ProgressEvent};
use crate::error::{Error, Result};
use crate::source::FragmentSource;

/// Cooperative cancellation flag, checked between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to a job running on its own thread.
#[derive(Debug)]
pub struct ConversionHandle {
    progress: Receiver<ProgressEvent>,
    cancel: CancelToken,
    thread: JoinHandle<Result<PathBuf>>,
}

impl ConversionHandle {
    /// Progress events. The last event is always `Finished` or `Failed`,
    /// after which the channel disconnects.
    pub fn progress(&self) -> &Receiver<ProgressEvent> {
        &self.progress
    }

    /// Ask the job to stop at the next page boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check if the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the job and return its outcome.
    pub fn join(self) -> Result<PathBuf> {
        self.thread
            .join()
            .map_err(|_| Error::Worker("conversion thread panicked".to_string()))?
    }
}

/// Run a job on a dedicated thread.
///
/// Progress lines go to the returned handle's channel instead of the
/// converter's own sink.
pub fn spawn<S>(converter: Converter, mut job: ConversionJob, mut source: S) -> Result<ConversionHandle>
where
    S: FragmentSource + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded();
    let cancel = converter.cancel_token().clone();
    let converter = converter.with_progress(ChannelProgress::new(tx.clone()));

    let thread = thread::Builder::new()
        .name("pdfweave-worker".to_string())
        .spawn(move || {
            let result = converter.run(&mut job, &mut source);
            let event = match &result {
                Ok(path) => ProgressEvent::Finished(path.clone()),
                Err(e) => ProgressEvent::Failed(e.to_string()),
            };
            // The converter holds the other sender; drop it so the channel
            // disconnects right after the outcome.
            drop(converter);
            let _ = tx.send(event);
            result
        })?;

    Ok(ConversionHandle {
        progress: rx,
        cancel,
        thread,
    })
}

/// Run a job on tokio's blocking thread pool.
#[cfg(feature = "async")]
pub async fn convert_async<S>(converter: Converter, mut job: ConversionJob, mut source: S) -> Result<PathBuf>
where
    S: FragmentSource + Send + 'static,
{
    tokio::task::spawn_blocking(move || converter.run(&mut job, &mut source))
        .await
        .map_err(|e| Error::Worker(e.to_string()))?
}
