//! Background jobs: a named thread plus a handle to collect its result.

use std::thread::{self, JoinHandle};

use crate::{OutputError, OutputResult};

/// Handle to an export or upload running on its own thread.
///
/// The job runs to completion whether or not the handle is waited on;
/// dropping the handle detaches it.
#[derive(Debug)]
pub struct JobHandle<T> {
    kind:  &'static str,
    inner: JoinHandle<OutputResult<T>>,
}

impl<T: Send + 'static> JobHandle<T> {
    /// Run `job` on a thread named `sl-{kind}`.
    pub(crate) fn spawn<F>(kind: &'static str, job: F) -> OutputResult<Self>
    where
        F: FnOnce() -> OutputResult<T> + Send + 'static,
    {
        let inner = thread::Builder::new()
            .name(format!("sl-{kind}"))
            .spawn(job)?;
        Ok(Self { kind, inner })
    }

    /// `true` once the job has returned.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Block until the job returns and hand back its result.
    pub fn wait(self) -> OutputResult<T> {
        self.inner
            .join()
            .map_err(|_| OutputError::WorkerPanicked(self.kind))?
    }
}
