//! The `Uploader` trait: ship a committed table to a remote or local store.

use std::sync::Arc;

use tracing::{error, info};

use sl_store::TableSnapshot;

use crate::job::JobHandle;
use crate::OutputResult;

/// Destination for whole-table uploads.
///
/// Called with a snapshot taken on the producer's thread, so implementations
/// never observe a partially committed table.  Uploads of an empty table are
/// permitted and should be cheap.
pub trait Uploader: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str {
        "uploader"
    }

    fn upload(&self, snapshot: &TableSnapshot) -> OutputResult<()>;
}

/// Run `uploader.upload(&snapshot)` on a background thread.
pub fn spawn_upload(
    uploader: Arc<dyn Uploader>,
    snapshot: TableSnapshot,
) -> OutputResult<JobHandle<()>> {
    JobHandle::spawn("upload", move || {
        let backend = uploader.name();
        match uploader.upload(&snapshot) {
            Ok(()) => {
                info!(backend, label = snapshot.label(), rows = snapshot.nb_lines(), "log uploaded");
                Ok(())
            }
            Err(e) => {
                error!(backend, label = snapshot.label(), "upload failed: {e}");
                Err(e)
            }
        }
    })
}
