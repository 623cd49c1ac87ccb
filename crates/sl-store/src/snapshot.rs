//! Immutable, owned copy of a store's table.
//!
//! A snapshot shares nothing with the store it came from, so it can be moved
//! to a background writer while the producer keeps logging.

use sl_core::{LogResult, TextFormat};

use crate::ExportMode;
use crate::column::{Column, render_rows};

/// Owned copy of every column of a [`LogStore`][crate::LogStore] at the time
/// of the export call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSnapshot {
    pub(crate) label:      String,
    pub(crate) session_id: String,
    pub(crate) columns:    Vec<Column>,
    pub(crate) nb_lines:   usize,
    pub(crate) format:     TextFormat,
    /// Text built row by row, present only for streaming stores.
    pub(crate) streamed:   Option<String>,
}

impl TableSnapshot {
    /// Label of the collection this table belongs to.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Number of committed rows.  Every column has exactly this many entries.
    pub fn nb_lines(&self) -> usize {
        self.nb_lines
    }

    pub fn is_empty(&self) -> bool {
        self.nb_lines == 0
    }

    pub fn format(&self) -> TextFormat {
        self.format
    }

    /// The mode of the store the snapshot was taken from.
    pub fn mode(&self) -> ExportMode {
        if self.streamed.is_some() { ExportMode::Streaming } else { ExportMode::Buffered }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column names in export order.
    pub fn headers(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Column names joined by the field separator, no terminator.
    pub fn header_line(&self) -> LogResult<String> {
        self.format.join(self.headers())
    }

    /// Text of row `row`, one entry per column, or `None` if out of range.
    pub fn row(&self, row: usize) -> Option<Vec<&str>> {
        (row < self.nb_lines)
            .then(|| self.columns.iter().filter_map(|c| c.get(row)).collect())
    }

    /// One line per row: the streamed text for streaming stores, otherwise
    /// regenerated from the columns.
    pub fn body_text(&self) -> LogResult<String> {
        match &self.streamed {
            Some(text) => Ok(text.clone()),
            None => render_rows(&self.columns, self.nb_lines, self.format),
        }
    }

    /// Header line, terminator, then [`body_text`](Self::body_text).
    pub fn to_text(&self) -> LogResult<String> {
        let mut text = self.header_line()?;
        text.push(char::from(self.format.line_terminator));
        text.push_str(&self.body_text()?);
        Ok(text)
    }
}
