//! Column arena: every column of a table, in first-appearance order.
//!
//! # Design
//!
//! Columns live in a `Vec<Column>` and are addressed by slot index; a
//! name → slot map resolves column names.  Every column holds one cell per
//! committed row, so row `i` of the table is `columns[*].cells[i]`:
//!
//! ```text
//!   slot   name        cells (row 0, row 1, row 2)
//!   0      Timestamp   "…"   "…"   "…"
//!   1      speed       "3.5" None  "4.0"
//!   2      lane        None  None  "left"     ← appeared at row 2, backfilled
//! ```
//!
//! A cell is `None` where the row had no value; it renders as [`NULL`].
//! [`ColumnSet::ensure`] is the only way to create a column and it pads the
//! new column to the current row count, so the table never goes ragged.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use sl_core::{LogResult, NULL, TextFormat};

/// One cell of a column: the formatted value, or `None` for the NULL sentinel.
pub type Cell = Option<String>;

// ── Column ────────────────────────────────────────────────────────────────────

/// A named series of formatted values, one per committed row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    name:  String,
    cells: Vec<Cell>,
}

impl Column {
    fn backfilled(name: &str, rows: usize) -> Self {
        Self { name: name.to_owned(), cells: vec![None; rows] }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries.  Equals the table's row count.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Text of row `row`: the value, or `"NULL"` if the row had none.
    ///
    /// Returns `None` only when `row` is out of range.
    pub fn get(&self, row: usize) -> Option<&str> {
        self.cells.get(row).map(|c| c.as_deref().unwrap_or(NULL))
    }

    /// `true` if row `row` holds the NULL sentinel.
    pub fn is_null(&self, row: usize) -> bool {
        matches!(self.cells.get(row), Some(None))
    }

    /// Raw cells, `None` marking NULL.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every row's text, NULL sentinel included.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.iter().map(|c| c.as_deref().unwrap_or(NULL))
    }
}

// ── ColumnSet ─────────────────────────────────────────────────────────────────

/// Ordered arena of columns plus the name → slot index.
#[derive(Clone, Debug, Default)]
pub(crate) struct ColumnSet {
    columns: Vec<Column>,
    index:   HashMap<String, usize>,
}

impl ColumnSet {
    pub(crate) fn len(&self) -> usize {
        self.columns.len()
    }

    pub(crate) fn as_slice(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn slot(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Column> {
        self.slot(name).map(|s| &self.columns[s])
    }

    /// Slot of `name`, creating the column with `rows` NULL cells if needed.
    ///
    /// Returns `(slot, created)`.
    pub(crate) fn ensure(&mut self, name: &str, rows: usize) -> (usize, bool) {
        if let Some(slot) = self.slot(name) {
            return (slot, false);
        }
        let slot = self.columns.len();
        self.columns.push(Column::backfilled(name, rows));
        self.index.insert(name.to_owned(), slot);
        (slot, true)
    }

    /// Append one row.  `row` must hold exactly one cell per column, in slot
    /// order.
    pub(crate) fn commit(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        for (column, cell) in self.columns.iter_mut().zip(row) {
            column.cells.push(cell);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.columns.clear();
        self.index.clear();
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render rows `0..rows` of `columns` as delimited text, one line per row.
pub(crate) fn render_rows(columns: &[Column], rows: usize, format: TextFormat) -> LogResult<String> {
    let mut writer = format.writer();
    for row in 0..rows {
        writer.write_line(columns.iter().map(|c| c.get(row).unwrap_or(NULL)))?;
    }
    writer.into_text()
}
