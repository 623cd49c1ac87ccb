//! The row being assembled between two terminations.

use crate::column::Cell;

/// Staged values of the uncommitted row, indexed by column slot.
#[derive(Clone, Debug, Default)]
pub(crate) struct PendingRow {
    cells:  Vec<Cell>,
    staged: usize,
}

impl PendingRow {
    pub(crate) fn is_empty(&self) -> bool {
        self.staged == 0
    }

    /// Number of staged fields.
    pub(crate) fn len(&self) -> usize {
        self.staged
    }

    pub(crate) fn is_staged(&self, slot: usize) -> bool {
        matches!(self.cells.get(slot), Some(Some(_)))
    }

    pub(crate) fn get(&self, slot: usize) -> Option<&str> {
        self.cells.get(slot).and_then(|c| c.as_deref())
    }

    /// Stage `value` under `slot`.  The caller checks `is_staged` first.
    pub(crate) fn stage(&mut self, slot: usize, value: String) {
        if self.cells.len() <= slot {
            self.cells.resize(slot + 1, None);
        }
        debug_assert!(self.cells[slot].is_none());
        self.cells[slot] = Some(value);
        self.staged += 1;
    }

    /// Drain the staged values into a full row of `width` cells.
    pub(crate) fn take_row(&mut self, width: usize) -> Vec<Cell> {
        let mut row = std::mem::take(&mut self.cells);
        row.resize(width, None);
        self.staged = 0;
        row
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
        self.staged = 0;
    }
}
