//! `LogStore` — the row-oriented, schema-evolving log accumulator.
//!
//! # Row lifecycle
//!
//! ```text
//!   add_field("speed", 3.5)      ┐
//!   add_field("lane", "left")    ├─ pending row  {speed, lane}
//!   terminate_row()              ┘  + Timestamp, Framecount, SessionID, Email
//!                                   → one cell appended to *every* column
//! ```
//!
//! Columns are created the first time a name is seen.  A column that appears
//! after rows were committed is backfilled with NULL for each of them, so
//! after every termination `column.len() == nb_lines()` for all columns.
//!
//! # Export modes
//!
//! [`ExportMode::Buffered`] regenerates text from the columns on each export.
//! [`ExportMode::Streaming`] appends a line per committed row and hands that
//! text back unchanged.  Because the streamed lines cannot be rewritten, a
//! streaming store rejects new columns once a row has been committed
//! ([`LogError::SchemaDrift`]).

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use sl_core::{HostClock, LineWriter, LogError, LogResult, LogValue, NULL, TextFormat};

use crate::column::{Column, ColumnSet, render_rows};
use crate::pending::PendingRow;
use crate::{Export, ExportKind, ExportMode, MetaColumns, RowAdvance, TableSnapshot};

/// Accumulates rows of named, formatted values for one log collection.
///
/// Create via [`LogStoreBuilder`][crate::LogStoreBuilder].
///
/// A store is driven by a single producer thread.  To write it out from
/// another thread, take a [`TableSnapshot`] first with
/// [`export_snapshot`](Self::export_snapshot).
pub struct LogStore {
    pub(crate) label:      String,
    pub(crate) columns:    ColumnSet,
    pub(crate) pending:    PendingRow,
    pub(crate) nb_lines:   usize,
    pub(crate) mode:       ExportMode,
    /// `Some` iff `mode == Streaming`.
    pub(crate) stream:     Option<LineWriter>,
    pub(crate) format:     TextFormat,
    pub(crate) meta:       MetaColumns,
    pub(crate) session_id: String,
    pub(crate) email:      String,
    pub(crate) device_id:  String,
    pub(crate) clock:      Arc<dyn HostClock>,
}

impl LogStore {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of committed rows.
    pub fn nb_lines(&self) -> usize {
        self.nb_lines
    }

    /// `true` if no row has been committed and nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.nb_lines == 0 && self.pending.is_empty()
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    pub fn meta_columns(&self) -> MetaColumns {
        self.meta
    }

    pub fn format(&self) -> TextFormat {
        self.format
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Session ID written to the `SessionID` column of subsequent rows.
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Email written to the `Email` column of subsequent rows.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Number of fields staged in the pending row.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Value staged for `column` in the pending row, if any.
    pub fn pending_value(&self, column: &str) -> Option<&str> {
        self.columns.slot(column).and_then(|s| self.pending.get(s))
    }

    /// All columns, in header order.
    pub fn columns(&self) -> &[Column] {
        self.columns.as_slice()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Column names, in header order.
    pub fn headers(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.names()
    }

    /// Column names joined by the field separator, no terminator.
    pub fn header_line(&self) -> LogResult<String> {
        self.format.join(self.columns.names())
    }

    // ── Schema ────────────────────────────────────────────────────────────

    /// Register `column` without staging a value.
    ///
    /// A column registered after rows were committed is backfilled with NULL.
    pub fn add_column(&mut self, column: &str) -> LogResult<()> {
        self.reconcile(column).map(|_| ())
    }

    /// [`add_column`](Self::add_column) for each name, stopping at the first
    /// error.
    pub fn add_columns<I, S>(&mut self, columns: I) -> LogResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for column in columns {
            self.add_column(column.as_ref())?;
        }
        Ok(())
    }

    /// Slot for `column`, creating (and backfilling) it if it is new.
    fn reconcile(&mut self, column: &str) -> LogResult<usize> {
        if column.is_empty() {
            return Err(LogError::EmptyColumnName);
        }
        if let Some(slot) = self.columns.slot(column) {
            return Ok(slot);
        }
        if self.mode == ExportMode::Streaming && self.nb_lines > 0 {
            warn!(
                label = %self.label,
                column,
                rows = self.nb_lines,
                "rejected new column on a streaming log"
            );
            return Err(LogError::SchemaDrift {
                column:         column.to_owned(),
                committed_rows: self.nb_lines,
            });
        }
        let (slot, _) = self.columns.ensure(column, self.nb_lines);
        if self.nb_lines > 0 {
            debug!(label = %self.label, column, rows = self.nb_lines, "backfilled new column");
        }
        Ok(slot)
    }

    // ── Rows ──────────────────────────────────────────────────────────────

    /// Stage `value` under `column` in the pending row.
    ///
    /// Fails with [`LogError::AlreadyStaged`] if the pending row already has a
    /// value for `column`; use [`add_or_advance_row`](Self::add_or_advance_row)
    /// to start a new row in that case.  On error nothing is changed.
    pub fn add_field(&mut self, column: &str, value: impl Into<LogValue>) -> LogResult<()> {
        if let Some(slot) = self.columns.slot(column) {
            if self.pending.is_staged(slot) {
                return Err(LogError::AlreadyStaged { column: column.to_owned() });
            }
        }
        let slot = self.reconcile(column)?;
        self.pending.stage(slot, value.into().to_string());
        Ok(())
    }

    /// Stage `value` under `column`; if `column` is already staged, commit the
    /// pending row first and open a new one with `value`.
    ///
    /// Repeated calls with the same key thereby delimit rows without an
    /// explicit [`terminate_row`](Self::terminate_row).
    pub fn add_or_advance_row(
        &mut self,
        column: &str,
        value:  impl Into<LogValue>,
    ) -> LogResult<RowAdvance> {
        let staged = self
            .columns
            .slot(column)
            .is_some_and(|slot| self.pending.is_staged(slot));
        if !staged {
            self.add_field(column, value)?;
            return Ok(RowAdvance::Staged);
        }
        self.terminate_row()?;
        self.add_field(column, value)?;
        Ok(RowAdvance::Advanced)
    }

    /// Commit the pending row.
    ///
    /// Metadata values are merged in (a value the caller staged for a
    /// metadata column wins), every other column receives NULL, and
    /// `nb_lines` grows by one.  With nothing staged this is a no-op and
    /// returns `Ok(false)`.
    pub fn terminate_row(&mut self) -> LogResult<bool> {
        if self.pending.is_empty() {
            return Ok(false);
        }
        self.stage_metadata();

        let width = self.columns.len();
        if let Some(stream) = self.stream.as_mut() {
            let pending = &self.pending;
            stream.write_line((0..width).map(|slot| pending.get(slot).unwrap_or(NULL)))?;
        }

        let row = self.pending.take_row(width);
        self.columns.commit(row);
        self.nb_lines += 1;
        Ok(true)
    }

    /// Drop the values staged in the pending row.  Committed rows and the
    /// column set are untouched.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    fn stage_metadata(&mut self) {
        for &name in self.meta.names() {
            let value = match name {
                MetaColumns::TIMESTAMP => self.clock.now(),
                MetaColumns::FRAMECOUNT => self.clock.frame_count().to_string(),
                MetaColumns::SESSION_ID => self.session_id.clone(),
                MetaColumns::EMAIL => self.email.clone(),
                MetaColumns::DEVICE_ID => self.device_id.clone(),
                _ => continue,
            };
            // Metadata columns are registered at construction and after
            // `clear`, so this never backfills.
            let (slot, _) = self.columns.ensure(name, self.nb_lines);
            if !self.pending.is_staged(slot) {
                self.pending.stage(slot, value);
            }
        }
    }

    /// Drop every row, column, staged value and streamed line.
    ///
    /// Metadata columns are re-registered (empty) so they keep leading the
    /// header; caller columns are forgotten and start with no history if they
    /// are logged again.
    pub fn clear(&mut self) {
        self.columns.clear();
        self.pending.clear();
        self.nb_lines = 0;
        if self.stream.is_some() {
            self.stream = Some(self.format.writer());
        }
        self.register_metadata();
    }

    pub(crate) fn register_metadata(&mut self) {
        for &name in self.meta.names() {
            self.columns.ensure(name, self.nb_lines);
        }
    }

    // ── Export ────────────────────────────────────────────────────────────

    /// Commit any pending row, then return an owned copy of the table.
    pub fn export_snapshot(&mut self) -> LogResult<TableSnapshot> {
        self.terminate_row()?;
        let streamed = match self.stream.as_mut() {
            Some(stream) => Some(stream.text()?),
            None => None,
        };
        Ok(TableSnapshot {
            label:      self.label.clone(),
            session_id: self.session_id.clone(),
            columns:    self.columns.as_slice().to_vec(),
            nb_lines:   self.nb_lines,
            format:     self.format,
            streamed,
        })
    }

    /// Commit any pending row, then return the body text: one line per row,
    /// no header.
    ///
    /// Buffered stores regenerate it from the columns (idempotent until the
    /// next mutation); streaming stores return the text built so far.
    pub fn export_text(&mut self) -> LogResult<String> {
        self.terminate_row()?;
        match self.stream.as_mut() {
            Some(stream) => stream.text(),
            None => render_rows(self.columns.as_slice(), self.nb_lines, self.format),
        }
    }

    /// Export in the representation named by `kind`.
    pub fn export(&mut self, kind: ExportKind) -> LogResult<Export> {
        match kind {
            ExportKind::Table => self.export_snapshot().map(Export::Table),
            ExportKind::Text => self.export_text().map(Export::Text),
        }
    }

    /// [`export`](Self::export) with the kind given by name (`"table"` or
    /// `"text"`).  Unknown names fail with [`LogError::UnsupportedExport`]
    /// before the store is touched.
    pub fn export_named(&mut self, kind: &str) -> LogResult<Export> {
        let kind: ExportKind = kind.parse()?;
        self.export(kind)
    }
}

impl fmt::Debug for LogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStore")
            .field("label", &self.label)
            .field("mode", &self.mode)
            .field("meta", &self.meta)
            .field("columns", &self.columns.len())
            .field("nb_lines", &self.nb_lines)
            .field("pending", &self.pending.len())
            .finish()
    }
}
