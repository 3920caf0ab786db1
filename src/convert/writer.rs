//! Atomic output writing.

use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Writes the serialized output of a job.
///
/// Implementations must be atomic: after a failed write no file exists at
/// `path`, and after a successful one it holds exactly `bytes`.
pub trait OutputWriter: Send + Sync {
    /// Write `bytes` to `path`.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

impl<T: OutputWriter + ?Sized> OutputWriter for Box<T> {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        (**self).write(path, bytes)
    }
}

/// Write through `writer`, reporting a failure as a serialization error.
pub(crate) fn write_output<W: OutputWriter + ?Sized>(
    writer: &W,
    path: &Path,
    bytes: &[u8],
) -> Result<()> {
    writer
        .write(path, bytes)
        .map_err(|e| Error::Serialization(format!("writing {}: {}", path.display(), e)))
}

/// Writes to a temporary file in the destination directory and renames it
/// into place once the content is flushed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicFileWriter;

impl OutputWriter for AtomicFileWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropped (and removed) on any early return
        let mut tmp = tempfile::Builder::new()
            .prefix(".pdfweave-")
            .suffix(".part")
            .tempfile_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        AtomicFileWriter.write(&path, b"hello").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old").unwrap();

        AtomicFileWriter.write(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        assert!(AtomicFileWriter.write(&path, b"data").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_output_failure_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let err = write_output(&AtomicFileWriter, &path, b"data").unwrap_err();
        assert!(matches!(err, Error::Serialization(ref msg) if msg.starts_with("writing ")));
    }
}
