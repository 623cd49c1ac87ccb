//! `sl-output` — file export and upload backends for session_log.
//!
//! | Piece                 | Purpose                                             |
//! |-----------------------|-----------------------------------------------------|
//! | [`TableExporter`]     | header + body text of one log to one file           |
//! | [`FileSink`]          | where the text goes; [`FsSink`] for the filesystem  |
//! | [`ExportConfig`]      | save directory, file prefix, extension              |
//! | [`Uploader`]          | whole-table upload hook, run via [`spawn_upload`]   |
//!
//! Optional upload backends sit behind Cargo features:
//!
//! | Feature   | Backend              | Destination                              |
//! |-----------|----------------------|------------------------------------------|
//! | `sqlite`  | [`SqliteUploader`]   | one table per log label                  |
//! | `parquet` | [`ParquetUploader`]  | `{label}_{session_id}.parquet` per upload |
//!
//! # Usage
//!
//! ```rust,ignore
//! use sl_output::{ExportConfig, TableExporter};
//!
//! let exporter = TableExporter::new(&ExportConfig::in_dir("./logs"), store.label());
//! exporter.spawn_write_all(&mut store)?.wait()?;
//! ```

pub mod config;
pub mod error;
pub mod exporter;
pub mod job;
pub mod sink;
pub mod upload;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use config::ExportConfig;
pub use error::{OutputError, OutputResult};
pub use exporter::TableExporter;
pub use job::JobHandle;
pub use sink::{FileSink, FsSink, WriteMode};
pub use upload::{Uploader, spawn_upload};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteUploader;

#[cfg(feature = "parquet")]
pub use parquet::ParquetUploader;
