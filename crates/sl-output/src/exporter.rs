//! `TableExporter` — header + body text to a [`FileSink`].
//!
//! # Snapshot before export
//!
//! [`spawn_write_all`](TableExporter::spawn_write_all) copies the table on the
//! caller's thread and moves the copy to the writer thread.  The producer can
//! keep logging (or clear the store) immediately; the file always reflects
//! the table as it was at the call.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use sl_store::{LogStore, TableSnapshot};

use crate::job::JobHandle;
use crate::{ExportConfig, FileSink, FsSink, OutputResult, WriteMode};

/// Writes one log collection to one file.
///
/// The destination is fixed at construction; a label-derived path is
/// timestamped, so two exporters for the same label never share a file
/// unless built with [`with_path`](Self::with_path).
pub struct TableExporter<S: FileSink = FsSink> {
    path: PathBuf,
    sink: Arc<S>,
}

impl TableExporter<FsSink> {
    /// Exporter for `label` writing to the local filesystem.
    pub fn new(config: &ExportConfig, label: &str) -> Self {
        Self::with_sink(config.path_for(label), Arc::new(FsSink))
    }

    /// Exporter writing to an explicit `path` on the local filesystem.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::with_sink(path.into(), Arc::new(FsSink))
    }
}

impl<S: FileSink + 'static> TableExporter<S> {
    pub fn with_sink(path: PathBuf, sink: Arc<S>) -> Self {
        Self { path, sink }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commit the store's pending row, then append header + body to the file.
    pub fn write_all(&self, store: &mut LogStore) -> OutputResult<()> {
        let snapshot = store.export_snapshot()?;
        self.write_snapshot(&snapshot)
    }

    /// Like [`write_all`](Self::write_all), but serialization and the write run
    /// on a background thread.  The snapshot is taken before this returns.
    pub fn spawn_write_all(&self, store: &mut LogStore) -> OutputResult<JobHandle<PathBuf>> {
        let snapshot = store.export_snapshot()?;
        let worker = Self { path: self.path.clone(), sink: Arc::clone(&self.sink) };
        JobHandle::spawn("export", move || {
            worker.write_snapshot(&snapshot).inspect_err(|e| {
                error!(label = snapshot.label(), path = %worker.path.display(), "export failed: {e}");
            })?;
            Ok(worker.path)
        })
    }

    /// Append header + body of `snapshot` to the file.
    pub fn write_snapshot(&self, snapshot: &TableSnapshot) -> OutputResult<()> {
        let started = Instant::now();
        let text = snapshot.to_text()?;
        debug!(
            label = snapshot.label(),
            rows = snapshot.nb_lines(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "log text generated"
        );

        let started = Instant::now();
        self.sink.write(&self.path, WriteMode::Append, &text)?;
        info!(
            label = snapshot.label(),
            rows = snapshot.nb_lines(),
            path = %self.path.display(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "log written"
        );
        Ok(())
    }

    /// Append just the header line of `store`.
    pub fn write_headers(&self, store: &LogStore) -> OutputResult<()> {
        let mut line = store.header_line()?;
        line.push(char::from(store.format().line_terminator));
        self.sink.write(&self.path, WriteMode::Append, &line)?;
        Ok(())
    }

    /// Write `text` as-is.  [`WriteMode::Overwrite`] replaces the file.
    pub fn write_line(&self, text: &str, mode: WriteMode) -> OutputResult<()> {
        self.sink.write(&self.path, mode, text)?;
        Ok(())
    }
}
