//! `ManagerConfig` — settings for a [`LoggingManager`][crate::LoggingManager].
//!
//! Every field has a default, so `{}` is a valid config document:
//!
//! ```json
//! {
//!   "email": "player@example.com",
//!   "stream_text": true,
//!   "save_dir": "/var/log/game",
//!   "field_separator": ","
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use sl_core::TextFormat;
use sl_output::ExportConfig;
use sl_output::config::{DEFAULT_FILE_EXTENSION, DEFAULT_FILE_PREFIX, default_save_dir};
use sl_store::{ANONYMOUS_EMAIL, ExportMode, MetaColumns};

use crate::{ManagerError, ManagerResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Written to the `Email` column of every row.
    pub email:                  String,
    /// Stable identifier of this machine, written to the `Meta` collection.
    pub device_id:              String,
    /// Keep a `Meta` collection with one row per session.
    pub create_meta_collection: bool,
    pub enable_csv_save:        bool,
    /// Hand saved tables to the installed uploader, if any.
    pub enable_upload:          bool,
    /// Create new collections in streaming mode.
    pub stream_text:            bool,
    /// Add `Timestamp`, `Framecount`, `SessionID` and `Email` to every row.
    pub common_columns:         bool,
    pub save_dir:               PathBuf,
    pub file_prefix:            String,
    pub file_extension:         String,
    /// Must be a single ASCII character.
    pub field_separator:        char,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            email:                  ANONYMOUS_EMAIL.to_owned(),
            device_id:              String::new(),
            create_meta_collection: true,
            enable_csv_save:        true,
            enable_upload:          false,
            stream_text:            false,
            common_columns:         true,
            save_dir:               default_save_dir(),
            file_prefix:            DEFAULT_FILE_PREFIX.to_owned(),
            file_extension:         DEFAULT_FILE_EXTENSION.to_owned(),
            field_separator:        ';',
        }
    }
}

impl ManagerConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ManagerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the JSON file at `path`.
    pub fn load(path: &Path) -> ManagerResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> ManagerResult<()> {
        if !self.field_separator.is_ascii() || self.field_separator == '\n' {
            return Err(ManagerError::Config(format!(
                "field_separator must be a single ASCII character other than newline, got {:?}",
                self.field_separator
            )));
        }
        Ok(())
    }

    pub fn text_format(&self) -> TextFormat {
        TextFormat::with_separator(self.field_separator as u8)
    }

    pub fn export_mode(&self) -> ExportMode {
        if self.stream_text { ExportMode::Streaming } else { ExportMode::Buffered }
    }

    pub fn meta_columns(&self) -> MetaColumns {
        if self.common_columns { MetaColumns::Common } else { MetaColumns::None }
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            save_dir:       self.save_dir.clone(),
            file_prefix:    self.file_prefix.clone(),
            file_extension: self.file_extension.clone(),
        }
    }
}
