//! Export strategy, metadata policy, and export representations.

use std::fmt;
use std::str::FromStr;

use sl_core::LogError;

use crate::TableSnapshot;

// ── ExportMode ────────────────────────────────────────────────────────────────

/// How a store produces its text.  Chosen once at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Text is regenerated from the column table on every export.
    #[default]
    Buffered,
    /// Each committed row is appended to a text buffer immediately; exports
    /// return that buffer.  New columns are rejected once a row is streamed.
    Streaming,
}

// ── MetaColumns ───────────────────────────────────────────────────────────────

/// Which metadata columns are synthesized on every row termination.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum MetaColumns {
    /// `Timestamp`, `Framecount`, `SessionID`, `Email`.
    #[default]
    Common,
    /// `Timestamp`, `Framecount`, `SessionID`, `DeviceID`, for the per-session
    /// meta collection.
    Device,
    /// No metadata; only caller-supplied fields.
    None,
}

impl MetaColumns {
    pub const TIMESTAMP:  &'static str = "Timestamp";
    pub const FRAMECOUNT: &'static str = "Framecount";
    pub const SESSION_ID: &'static str = "SessionID";
    pub const EMAIL:      &'static str = "Email";
    pub const DEVICE_ID:  &'static str = "DeviceID";

    /// Column names, in header order.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            MetaColumns::Common => &[Self::TIMESTAMP, Self::FRAMECOUNT, Self::SESSION_ID, Self::EMAIL],
            MetaColumns::Device => &[Self::TIMESTAMP, Self::FRAMECOUNT, Self::SESSION_ID, Self::DEVICE_ID],
            MetaColumns::None => &[],
        }
    }
}

// ── ExportKind / Export ───────────────────────────────────────────────────────

/// A representation a caller can ask a store for.
///
/// Parsed from text (`"table"`, `"text"`, case-insensitive); anything else
/// is [`LogError::UnsupportedExport`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Table,
    Text,
}

impl FromStr for ExportKind {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(ExportKind::Table),
            "text" => Ok(ExportKind::Text),
            _ => Err(LogError::UnsupportedExport(s.to_owned())),
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Table => f.write_str("table"),
            ExportKind::Text => f.write_str("text"),
        }
    }
}

/// The result of [`LogStore::export`][crate::LogStore::export].
#[derive(Clone, Debug)]
pub enum Export {
    Table(TableSnapshot),
    Text(String),
}

impl Export {
    pub fn kind(&self) -> ExportKind {
        match self {
            Export::Table(_) => ExportKind::Table,
            Export::Text(_) => ExportKind::Text,
        }
    }

    pub fn into_table(self) -> Option<TableSnapshot> {
        match self {
            Export::Table(t) => Some(t),
            Export::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Export::Text(t) => Some(t),
            Export::Table(_) => None,
        }
    }
}

/// Outcome of [`LogStore::add_or_advance_row`][crate::LogStore::add_or_advance_row].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowAdvance {
    /// The value joined the pending row.
    Staged,
    /// The column was already staged: the pending row was committed and the
    /// value opened a new one.
    Advanced,
}
