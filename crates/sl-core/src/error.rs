//! Accumulator error type.
//!
//! Sub-crates define their own error enums and wrap `LogError` as one
//! variant via `#[from]`, so `?` works across crate boundaries.

use thiserror::Error;

/// Errors raised while staging fields or exporting a log table.
///
/// None of these leave the table in a partially updated state: the failing
/// call is rejected before anything is written.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("column name must not be empty")]
    EmptyColumnName,

    #[error("column `{column}` already has a value in the pending row")]
    AlreadyStaged { column: String },

    #[error(
        "schema drift: column `{column}` first appeared after {committed_rows} rows \
         were streamed; streaming logs cannot grow new columns"
    )]
    SchemaDrift { column: String, committed_rows: usize },

    #[error("unsupported export kind `{0}` (expected `table` or `text`)")]
    UnsupportedExport(String),

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("exported text is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Shorthand result type for accumulator operations.
pub type LogResult<T> = Result<T, LogError>;
