//! Error types for sl-output.

use sl_core::LogError;
use thiserror::Error;

/// Errors that can occur when exporting or uploading a log table.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("log export error: {0}")]
    Log(#[from] LogError),

    #[error("background {0} worker panicked")]
    WorkerPanicked(&'static str),

    #[error("upload backend lock poisoned")]
    Poisoned,

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
