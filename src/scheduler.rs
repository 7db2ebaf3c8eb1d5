//! Task schedulers for the task-based strategy.
//!
//! A scheduler takes a unit of work and hands back a [`TaskHandle`] the caller
//! resolves later. Whether the work runs in parallel is up to the back-end:
//! [`PoolScheduler`] starts every job on a Tokio blocking thread immediately,
//! [`DeferredScheduler`] keeps the job and runs it on whichever thread resolves
//! the handle. Both produce the same values; only the timing differs.

use std::panic::{self, AssertUnwindSafe};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::aggregator::ResultHandle;
use crate::config::TaskBackend;
use crate::error::{HandleError, Result};

type Job = Box<dyn FnOnce() -> u64 + Send + 'static>;

/// Submit work, get a resolvable handle.
pub trait Scheduler {
    fn submit<F>(&self, job: F) -> TaskHandle
    where
        F: FnOnce() -> u64 + Send + 'static;
}

/// Handle to one submitted task.
pub struct TaskHandle {
    inner: TaskInner,
}

enum TaskInner {
    Pooled { join: JoinHandle<u64>, runtime: Handle },
    Deferred(Job),
}

impl TaskHandle {
    pub fn deferred<F>(job: F) -> Self
    where
        F: FnOnce() -> u64 + Send + 'static,
    {
        Self {
            inner: TaskInner::Deferred(Box::new(job)),
        }
    }

    pub fn pooled(join: JoinHandle<u64>, runtime: Handle) -> Self {
        Self {
            inner: TaskInner::Pooled { join, runtime },
        }
    }
}

impl ResultHandle for TaskHandle {
    fn resolve(self) -> std::result::Result<u64, HandleError> {
        match self.inner {
            TaskInner::Pooled { join, runtime } => {
                runtime.block_on(join).map_err(|err| {
                    if err.is_panic() {
                        HandleError::Panicked
                    } else {
                        HandleError::Cancelled
                    }
                })
            }
            TaskInner::Deferred(job) => {
                panic::catch_unwind(AssertUnwindSafe(job)).map_err(|_| HandleError::Panicked)
            }
        }
    }

    fn settle(self) {
        match self.inner {
            // never started, nothing to reconcile
            TaskInner::Deferred(_) => {}
            pooled => {
                let _ = TaskHandle { inner: pooled }.resolve();
            }
        }
    }
}

/// Eager back-end: a private multi-thread Tokio runtime whose blocking pool
/// runs every job as soon as it is submitted.
pub struct PoolScheduler {
    // only taken in `drop`
    runtime: Option<Runtime>,
}

impl PoolScheduler {
    /// Build a runtime sized for `workers` concurrent jobs.
    pub fn new(workers: usize) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(workers.max(1))
            .thread_name("pi-task")
            .build()?;
        debug!(workers, "task pool started");
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    fn runtime(&self) -> &Runtime {
        self.runtime.as_ref().expect("runtime is present until drop")
    }
}

impl Drop for PoolScheduler {
    fn drop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };
        // A blocking shutdown panics inside an async context. Every handle
        // has been resolved or settled by then, so nothing is left to wait on.
        if Handle::try_current().is_ok() {
            runtime.shutdown_background();
        }
    }
}

impl Scheduler for PoolScheduler {
    fn submit<F>(&self, job: F) -> TaskHandle
    where
        F: FnOnce() -> u64 + Send + 'static,
    {
        let runtime = self.runtime();
        let join = runtime.spawn_blocking(job);
        TaskHandle::pooled(join, runtime.handle().clone())
    }
}

/// Lazy back-end: nothing runs until the handle is resolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeferredScheduler;

impl Scheduler for DeferredScheduler {
    fn submit<F>(&self, job: F) -> TaskHandle
    where
        F: FnOnce() -> u64 + Send + 'static,
    {
        TaskHandle::deferred(job)
    }
}

pub enum AnyScheduler {
    Pool(PoolScheduler),
    Deferred(DeferredScheduler),
}

impl AnyScheduler {
    pub fn for_backend(backend: TaskBackend, workers: usize) -> Result<Self> {
        Ok(match backend {
            TaskBackend::Pool => Self::Pool(PoolScheduler::new(workers)?),
            TaskBackend::Deferred => Self::Deferred(DeferredScheduler),
        })
    }
}

impl Scheduler for AnyScheduler {
    fn submit<F>(&self, job: F) -> TaskHandle
    where
        F: FnOnce() -> u64 + Send + 'static,
    {
        match self {
            Self::Pool(pool) => pool.submit(job),
            Self::Deferred(deferred) => deferred.submit(job),
        }
    }
}
