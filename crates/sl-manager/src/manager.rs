//! `LoggingManager` — the labelled set of log collections for one process.
//!
//! # Flow
//!
//! ```text
//!  host start ──► on_start() ──► new_session()   fresh SessionID, Meta row
//!  each frame ──► on_frame() ──► clock advances  Framecount column
//!  gameplay   ──► log("Gameplay", "score", 120)  auto-creates "Gameplay"
//!  shutdown   ──► save_all_logs()                one CSV per collection
//! ```
//!
//! All methods take `&self`; the collections sit behind one mutex.  Saving
//! snapshots every table while holding it, then formats and writes with the
//! lock released, so producers are blocked only for the copy.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, warn};

use sl_core::{HostClock, HostLifecycle, LogError, LogResult, LogValue, SessionIds};
use sl_output::{TableExporter, Uploader};
use sl_store::{LogStore, LogStoreBuilder, MetaColumns, TableSnapshot};

use crate::{ManagerConfig, ManagerError, ManagerResult};

#[cfg(feature = "fx-hash")]
type CollectionMap = rustc_hash::FxHashMap<String, LogStore>;
#[cfg(not(feature = "fx-hash"))]
type CollectionMap = std::collections::HashMap<String, LogStore>;

/// Label of the per-session metadata collection.
pub const META_COLLECTION: &str = "Meta";

/// Outcome of saving one collection: the CSV path, if a file was written.
pub type SaveResult = ManagerResult<Option<PathBuf>>;

struct State {
    config:      ManagerConfig,
    session_id:  String,
    collections: CollectionMap,
}

/// Owns every log collection of the process and the session they belong to.
pub struct LoggingManager {
    state:    Mutex<State>,
    clock:    Arc<dyn HostClock>,
    ids:      Arc<dyn SessionIds>,
    uploader: Option<Arc<dyn Uploader>>,
}

impl LoggingManager {
    /// Manager with no collections.  A session ID is drawn from `ids`
    /// immediately; the `Meta` row is written on the first
    /// [`new_session`](Self::new_session).
    pub fn new(
        config: ManagerConfig,
        clock:  Arc<dyn HostClock>,
        ids:    Arc<dyn SessionIds>,
    ) -> ManagerResult<Self> {
        config.validate()?;
        let session_id = ids.new_session_id();
        Ok(Self {
            state: Mutex::new(State { config, session_id, collections: CollectionMap::default() }),
            clock,
            ids,
            uploader: None,
        })
    }

    /// Install the backend used by [`save_log`](Self::save_log) when
    /// `enable_upload` is set.
    pub fn with_uploader(mut self, uploader: Box<dyn Uploader>) -> Self {
        self.uploader = Some(Arc::from(uploader));
        self
    }

    fn state(&self) -> ManagerResult<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| ManagerError::Poisoned)
    }

    fn build_store(
        &self,
        config:     &ManagerConfig,
        session_id: &str,
        label:      &str,
        meta:       MetaColumns,
    ) -> LogStore {
        LogStoreBuilder::new(label)
            .mode(config.export_mode())
            .meta_columns(meta)
            .session_id(session_id)
            .email(config.email.clone())
            .device_id(config.device_id.clone())
            .format(config.text_format())
            .clock(Arc::clone(&self.clock))
            .build()
    }

    /// The collection called `label`, created with the current settings if
    /// it does not exist yet.
    fn store_mut<'a>(&self, state: &'a mut State, label: &str) -> &'a mut LogStore {
        let State { config, session_id, collections } = state;
        collections
            .entry(label.to_owned())
            .or_insert_with(|| self.build_store(config, session_id, label, config.meta_columns()))
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn session_id(&self) -> ManagerResult<String> {
        Ok(self.state()?.session_id.clone())
    }

    pub fn device_id(&self) -> ManagerResult<String> {
        Ok(self.state()?.config.device_id.clone())
    }

    pub fn config(&self) -> ManagerResult<ManagerConfig> {
        Ok(self.state()?.config.clone())
    }

    /// Labels of every collection, sorted.
    pub fn labels(&self) -> ManagerResult<Vec<String>> {
        let mut labels: Vec<String> = self.state()?.collections.keys().cloned().collect();
        labels.sort();
        Ok(labels)
    }

    /// Run `read` against the collection called `label`.
    pub fn collection<T>(&self, label: &str, read: impl FnOnce(&LogStore) -> T) -> ManagerResult<T> {
        let state = self.state()?;
        state
            .collections
            .get(label)
            .map(read)
            .ok_or_else(|| ManagerError::UnknownCollection(label.to_owned()))
    }

    // ── Session ───────────────────────────────────────────────────────────

    /// Start a new session: draw a new session ID, tag every collection with
    /// it, and rewrite the `Meta` collection as a single row when
    /// `create_meta_collection` is on.
    pub fn new_session(&self) -> ManagerResult<()> {
        let session_id = self.ids.new_session_id();
        let device_id = self.ids.device_id();
        let mut state = self.state()?;
        state.session_id = session_id.clone();
        if state.config.device_id.is_empty() {
            state.config.device_id = device_id;
        }
        for store in state.collections.values_mut() {
            store.set_session_id(session_id.clone());
        }

        if state.config.create_meta_collection {
            let mut meta =
                self.build_store(&state.config, &session_id, META_COLLECTION, MetaColumns::Device);
            // Every column is synthesized; staging one just opens the row.
            meta.add_field(MetaColumns::SESSION_ID, session_id.as_str())?;
            meta.terminate_row()?;
            state.collections.insert(META_COLLECTION.to_owned(), meta);
        }
        info!(session_id = %session_id, "new logging session");
        Ok(())
    }

    /// Email for rows committed from now on, in every collection.
    pub fn set_email(&self, email: impl Into<String>) -> ManagerResult<()> {
        let email = email.into();
        let mut state = self.state()?;
        for store in state.collections.values_mut() {
            store.set_email(email.clone());
        }
        state.config.email = email;
        Ok(())
    }

    /// Directory for files saved from now on.
    pub fn set_save_dir(&self, dir: impl Into<PathBuf>) -> ManagerResult<()> {
        self.state()?.config.save_dir = dir.into();
        Ok(())
    }

    // ── Logging ───────────────────────────────────────────────────────────

    /// Create an empty collection.  Fails if `label` already exists.
    pub fn create_log(&self, label: &str) -> ManagerResult<()> {
        let mut state = self.state()?;
        if state.collections.contains_key(label) {
            return Err(ManagerError::DuplicateCollection(label.to_owned()));
        }
        let store =
            self.build_store(&state.config, &state.session_id, label, state.config.meta_columns());
        state.collections.insert(label.to_owned(), store);
        Ok(())
    }

    /// Log one value as a complete row, creating the collection if needed.
    pub fn log(&self, label: &str, column: &str, value: impl Into<LogValue>) -> ManagerResult<()> {
        self.log_row(label, [(column, value)])
    }

    /// Log every `(column, value)` pair as one row, creating the collection
    /// if needed.
    ///
    /// The row is all or nothing: if any field is rejected (a column repeated
    /// within `fields`, or a new column on a streaming log) nothing is
    /// committed and the collection's pending row is left empty.
    pub fn log_row<I, K, V>(&self, label: &str, fields: I) -> ManagerResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<LogValue>,
    {
        let mut state = self.state()?;
        let store = self.store_mut(&mut state, label);
        if let Err(e) = commit_row(store, fields) {
            store.discard_pending();
            warn!(label, "row dropped: {e}");
            return Err(e.into());
        }
        Ok(())
    }

    // ── Saving ────────────────────────────────────────────────────────────

    /// Snapshot `label` and the destination path under the lock.
    fn prepare_save(&self, label: &str) -> ManagerResult<(TableSnapshot, PathBuf, bool, bool)> {
        let mut state = self.state()?;
        let export = state.config.export_config();
        let csv = state.config.enable_csv_save;
        let upload = state.config.enable_upload;
        let Some(store) = state.collections.get_mut(label) else {
            warn!(label, "save requested for unknown collection");
            return Err(ManagerError::UnknownCollection(label.to_owned()));
        };
        Ok((store.export_snapshot()?, export.path_for(label), csv, upload))
    }

    fn persist(&self, snapshot: &TableSnapshot, path: PathBuf, csv: bool, upload: bool) -> SaveResult {
        let mut written = None;
        if csv {
            TableExporter::with_path(&path).write_snapshot(snapshot)?;
            written = Some(path);
        }
        if upload {
            match &self.uploader {
                Some(uploader) => uploader.upload(snapshot)?,
                None => warn!(label = snapshot.label(), "upload enabled but no uploader installed"),
            }
        }
        Ok(written)
    }

    /// Write `label` to a new timestamped CSV file (when `enable_csv_save`)
    /// and upload it (when `enable_upload`).  Returns the file written.
    pub fn save_log(&self, label: &str) -> SaveResult {
        let (snapshot, path, csv, upload) = self.prepare_save(label)?;
        self.persist(&snapshot, path, csv, upload)
    }

    /// [`save_log`](Self::save_log) for every collection, sorted by label.
    ///
    /// One collection failing does not stop the others.
    pub fn save_all_logs(&self) -> ManagerResult<Vec<(String, SaveResult)>> {
        let (jobs, csv, upload) = {
            let mut state = self.state()?;
            let export = state.config.export_config();
            let csv = state.config.enable_csv_save;
            let upload = state.config.enable_upload;
            let mut jobs = Vec::with_capacity(state.collections.len());
            for (label, store) in state.collections.iter_mut() {
                let job = store.export_snapshot().map(|s| (s, export.path_for(label)));
                jobs.push((label.clone(), job));
            }
            (jobs, csv, upload)
        };

        let save = |(label, job): (String, Result<(TableSnapshot, PathBuf), LogError>)| {
            let result = job
                .map_err(ManagerError::from)
                .and_then(|(snapshot, path)| self.persist(&snapshot, path, csv, upload));
            if let Err(e) = &result {
                error!(label = %label, "saving log failed: {e}");
            }
            (label, result)
        };

        #[cfg(not(feature = "parallel"))]
        let mut results: Vec<_> = jobs.into_iter().map(save).collect();

        #[cfg(feature = "parallel")]
        let mut results: Vec<_> = {
            use rayon::prelude::*;
            jobs.into_par_iter().map(save).collect()
        };

        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }

    // ── Clearing and deleting ─────────────────────────────────────────────

    /// Drop every row of `label`, keeping the collection.
    pub fn clear_log(&self, label: &str) -> ManagerResult<()> {
        let mut state = self.state()?;
        let store = state
            .collections
            .get_mut(label)
            .ok_or_else(|| ManagerError::UnknownCollection(label.to_owned()))?;
        store.clear();
        Ok(())
    }

    pub fn clear_all_logs(&self) -> ManagerResult<()> {
        for store in self.state()?.collections.values_mut() {
            store.clear();
        }
        Ok(())
    }

    /// Remove `label` entirely.  Unsaved rows are lost.
    pub fn delete_log(&self, label: &str) -> ManagerResult<()> {
        self.state()?
            .collections
            .remove(label)
            .map(|_| ())
            .ok_or_else(|| ManagerError::UnknownCollection(label.to_owned()))
    }

    pub fn delete_all_logs(&self) -> ManagerResult<()> {
        self.state()?.collections.clear();
        Ok(())
    }

    /// The directory files are currently saved to.
    pub fn save_dir(&self) -> ManagerResult<PathBuf> {
        Ok(self.state()?.config.save_dir.clone())
    }

    /// Load a [`ManagerConfig`] from `path` and build a manager from it.
    pub fn from_config_file(
        path:  &Path,
        clock: Arc<dyn HostClock>,
        ids:   Arc<dyn SessionIds>,
    ) -> ManagerResult<Self> {
        Self::new(ManagerConfig::load(path)?, clock, ids)
    }
}

impl HostLifecycle for LoggingManager {
    fn on_start(&self) {
        self.clock.on_start();
        if let Err(e) = self.new_session() {
            error!("could not start logging session: {e}");
        }
    }

    fn on_frame(&self) {
        self.clock.on_frame();
    }
}

fn commit_row<I, K, V>(store: &mut LogStore, fields: I) -> LogResult<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<LogValue>,
{
    for (column, value) in fields {
        store.add_field(column.as_ref(), value)?;
    }
    store.terminate_row()?;
    Ok(())
}
