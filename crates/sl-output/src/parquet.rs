//! Parquet upload backend (feature `parquet`).
//!
//! Each upload writes `{dir}/{label}_{session_id}.parquet` with one nullable
//! `Utf8` column per log column, Snappy-compressed.  A second upload for the
//! same label and session replaces the file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use sl_store::TableSnapshot;

use crate::upload::Uploader;
use crate::OutputResult;

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes each uploaded table to its own Parquet file.
pub struct ParquetUploader {
    dir: PathBuf,
}

impl ParquetUploader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File an upload of `snapshot` lands in.
    pub fn path_for(&self, snapshot: &TableSnapshot) -> PathBuf {
        self.dir.join(format!("{}_{}.parquet", snapshot.label(), snapshot.session_id()))
    }
}

impl Uploader for ParquetUploader {
    fn name(&self) -> &'static str {
        "parquet"
    }

    fn upload(&self, snapshot: &TableSnapshot) -> OutputResult<()> {
        if snapshot.columns().is_empty() {
            return Ok(());
        }
        let schema = Arc::new(Schema::new(
            snapshot
                .columns()
                .iter()
                .map(|c| Field::new(c.name(), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));

        let arrays: Vec<ArrayRef> = snapshot
            .columns()
            .iter()
            .map(|column| {
                let mut builder = StringBuilder::new();
                for row in 0..snapshot.nb_lines() {
                    builder.append_option(column.cells().get(row).and_then(|c| c.as_deref()));
                }
                Arc::new(builder.finish()) as ArrayRef
            })
            .collect();

        fs::create_dir_all(&self.dir)?;
        let file = File::create(self.path_for(snapshot))?;
        let mut writer = ArrowWriter::try_new(file, Arc::clone(&schema), Some(snappy_props()))?;
        let batch = RecordBatch::try_new(schema, arrays)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }
}
