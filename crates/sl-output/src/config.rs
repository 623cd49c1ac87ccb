//! Where exported files go and how they are named.
//!
//! ```text
//! {save_dir}/{file_prefix}_{label}_{yyyy_MM_dd_HH_mm_ss_ffff}{file_extension}
//! ~/Documents/log_Gameplay_2026_10_19_14_03_55_0412.csv
//! ```

use std::path::PathBuf;

use sl_core::host::file_stamp_now;

pub const DEFAULT_FILE_PREFIX: &str = "log";
pub const DEFAULT_FILE_EXTENSION: &str = ".csv";

/// File naming for [`TableExporter`][crate::TableExporter].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    /// Directory receiving the files.  Default: the user's documents
    /// directory, or `.` if it cannot be determined.
    pub save_dir:       PathBuf,
    pub file_prefix:    String,
    /// Appended verbatim; include the leading dot.
    pub file_extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_dir:       default_save_dir(),
            file_prefix:    DEFAULT_FILE_PREFIX.to_owned(),
            file_extension: DEFAULT_FILE_EXTENSION.to_owned(),
        }
    }
}

impl ExportConfig {
    /// Default naming rooted at `save_dir`.
    pub fn in_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self { save_dir: save_dir.into(), ..Self::default() }
    }

    /// File name for `label` stamped with `stamp`.
    pub fn file_name(&self, label: &str, stamp: &str) -> String {
        format!("{}_{}_{}{}", self.file_prefix, label, stamp, self.file_extension)
    }

    /// Full path for `label`, stamped with the current local time.
    pub fn path_for(&self, label: &str) -> PathBuf {
        self.save_dir.join(self.file_name(label, &file_stamp_now()))
    }
}

/// The user's documents directory, falling back to the working directory.
pub fn default_save_dir() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| PathBuf::from("."))
}
