//! The `FileSink` trait and its filesystem implementation.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

/// Whether a write extends or replaces the destination file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Append,
    Overwrite,
}

/// Persists one complete text blob per call.
///
/// Implementations must be shareable with a background export thread.
pub trait FileSink: Send + Sync {
    /// Write `text` to `path`, creating the file if it does not exist.
    fn write(&self, path: &Path, mode: WriteMode, text: &str) -> std::io::Result<()>;
}

/// [`FileSink`] backed by the local filesystem.
///
/// Missing parent directories are created.  Writes are not retried.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsSink;

impl FileSink for FsSink {
    fn write(&self, path: &Path, mode: WriteMode, text: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Append => options.append(true),
            WriteMode::Overwrite => options.write(true).truncate(true),
        };
        let mut file = options.open(path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        debug!(path = %path.display(), bytes = text.len(), ?mode, "wrote log text");
        Ok(())
    }
}
