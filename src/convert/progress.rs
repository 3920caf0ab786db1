//! Progress reporting for conversion jobs.

use std::path::PathBuf;
use std::sync::Mutex;

use crossbeam_channel::Sender;

/// Receives human-readable progress lines from a running job.
///
/// Emission is fire-and-forget: a sink must never fail the job.
pub trait ProgressSink: Send + Sync {
    /// Report one progress line.
    fn emit(&self, line: &str);
}

/// Discards all progress.
impl ProgressSink for () {
    fn emit(&self, _line: &str) {}
}

impl<T: ProgressSink + ?Sized> ProgressSink for Box<T> {
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }
}

impl<T: ProgressSink + ?Sized> ProgressSink for std::sync::Arc<T> {
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }
}

/// Forwards progress to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn emit(&self, line: &str) {
        log::info!("{}", line);
    }
}

/// Event delivered over a progress channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A progress line
    Message(String),
    /// The job succeeded and wrote the given file
    Finished(PathBuf),
    /// The job failed with the given error text
    Failed(String),
}

impl ProgressEvent {
    /// Check if this is a terminal event.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Message(_))
    }
}

/// Sends progress lines over a crossbeam channel.
///
/// A disconnected receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: Sender<ProgressEvent>,
}

impl ChannelProgress {
    /// Wrap a sender.
    pub fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn emit(&self, line: &str) {
        let _ = self.sender.send(ProgressEvent::Message(line.to_string()));
    }
}

/// Collects progress lines in memory.
#[derive(Debug, Default)]
pub struct CollectProgress {
    lines: Mutex<Vec<String>>,
}

impl CollectProgress {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines collected so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ProgressSink for CollectProgress {
    fn emit(&self, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_progress() {
        let sink = CollectProgress::new();
        sink.emit("one");
        sink.emit("two");
        assert_eq!(sink.lines(), vec!["one", "two"]);
    }

    #[test]
    fn test_channel_progress() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = ChannelProgress::new(tx);
        sink.emit("hello");
        assert_eq!(rx.try_recv().unwrap(), ProgressEvent::Message("hello".into()));
    }

    #[test]
    fn test_channel_progress_ignores_disconnect() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        ChannelProgress::new(tx).emit("nobody listening");
    }

    #[test]
    fn test_terminal_events() {
        assert!(!ProgressEvent::Message("x".into()).is_terminal());
        assert!(ProgressEvent::Finished(PathBuf::from("a.txt")).is_terminal());
        assert!(ProgressEvent::Failed("boom".into()).is_terminal());
    }
}
