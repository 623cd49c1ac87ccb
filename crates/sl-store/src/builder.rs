//! Fluent builder for [`LogStore`].
//!
//! # Usage
//!
//! ```rust
//! use sl_store::{ExportMode, LogStoreBuilder, MetaColumns};
//!
//! let mut store = LogStoreBuilder::new("Gameplay")
//!     .mode(ExportMode::Streaming)
//!     .meta_columns(MetaColumns::None)
//!     .build();
//!
//! store.add_field("score", 120).unwrap();
//! store.terminate_row().unwrap();
//! assert_eq!(store.export_text().unwrap(), "120\n");
//! ```

use std::sync::Arc;

use sl_core::{HostClock, SystemClock, TextFormat, random_session_id};

use crate::column::ColumnSet;
use crate::pending::PendingRow;
use crate::{ExportMode, LogStore, MetaColumns};

/// Email recorded when none is configured.
pub const ANONYMOUS_EMAIL: &str = "anonymous";

/// Fluent builder for [`LogStore`].
///
/// | Method             | Default                                  |
/// |--------------------|------------------------------------------|
/// | `.mode(m)`         | `ExportMode::Buffered`                   |
/// | `.meta_columns(m)` | `MetaColumns::Common`                    |
/// | `.session_id(s)`   | random GUID-shaped ID                    |
/// | `.email(e)`        | `"anonymous"`                            |
/// | `.device_id(d)`    | empty                                    |
/// | `.format(f)`       | `TextFormat::default()` (`;`, `\n`)      |
/// | `.clock(c)`        | a fresh [`SystemClock`]                  |
pub struct LogStoreBuilder {
    label:      String,
    mode:       ExportMode,
    meta:       MetaColumns,
    session_id: Option<String>,
    email:      String,
    device_id:  String,
    format:     TextFormat,
    clock:      Option<Arc<dyn HostClock>>,
}

impl LogStoreBuilder {
    /// Start a builder for the collection called `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label:      label.into(),
            mode:       ExportMode::default(),
            meta:       MetaColumns::default(),
            session_id: None,
            email:      ANONYMOUS_EMAIL.to_owned(),
            device_id:  String::new(),
            format:     TextFormat::default(),
            clock:      None,
        }
    }

    pub fn mode(mut self, mode: ExportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `.mode(Streaming)` when `enabled`, `.mode(Buffered)`
    /// otherwise.
    pub fn streaming(self, enabled: bool) -> Self {
        self.mode(if enabled { ExportMode::Streaming } else { ExportMode::Buffered })
    }

    pub fn meta_columns(mut self, meta: MetaColumns) -> Self {
        self.meta = meta;
        self
    }

    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    pub fn format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    /// Clock feeding the `Timestamp` and `Framecount` columns.  Share one
    /// clock between all stores of a process.
    pub fn clock(mut self, clock: Arc<dyn HostClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Construct the store with its metadata columns registered.
    pub fn build(self) -> LogStore {
        let session_id = self
            .session_id
            .unwrap_or_else(|| random_session_id(&mut rand::thread_rng()));
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()) as Arc<dyn HostClock>);
        let stream = (self.mode == ExportMode::Streaming).then(|| self.format.writer());

        let mut store = LogStore {
            label: self.label,
            columns: ColumnSet::default(),
            pending: PendingRow::default(),
            nb_lines: 0,
            mode: self.mode,
            stream,
            format: self.format,
            meta: self.meta,
            session_id,
            email: self.email,
            device_id: self.device_id,
            clock,
        };
        store.register_metadata();
        store
    }
}
