//! Collects partial hit counts in worker order.

use std::panic;
use std::thread;

use tracing::{debug, warn};

use crate::error::{EstimateError, HandleError, Result};

/// A single-use handle that eventually yields one worker's hit count.
pub trait ResultHandle {
    /// Block until the worker's result is available.
    fn resolve(self) -> std::result::Result<u64, HandleError>;

    /// Reconcile the worker without using its result. Called for handles that
    /// follow a failed one, so that no worker is left running unobserved.
    fn settle(self)
    where
        Self: Sized,
    {
        let _ = self.resolve();
    }
}

/// Resolve `handles` in order and sum their hit counts.
///
/// The first handle that fails aborts the sum with
/// [`EstimateError::UnresolvedWorker`]; the handles after it are settled and
/// their values discarded.
pub fn aggregate<H, I>(handles: I) -> Result<u64>
where
    H: ResultHandle,
    I: IntoIterator<Item = H>,
{
    let mut handles = handles.into_iter().enumerate();
    let mut total = 0u64;

    while let Some((worker, handle)) = handles.next() {
        match handle.resolve() {
            Ok(hits) => {
                debug!(worker, hits, "partial result resolved");
                total += hits;
            }
            Err(cause) => {
                warn!(worker, %cause, "worker did not produce a result");
                for (_, rest) in handles {
                    rest.settle();
                }
                return Err(EstimateError::unresolved(worker, cause));
            }
        }
    }

    Ok(total)
}

/// Run a blocking wait so that calling from async code does not panic.
///
/// Inside a Tokio runtime the wait moves to a scoped helper thread, which has
/// no runtime context; the calling thread still blocks until it finishes.
/// Elsewhere the wait runs inline.
pub fn off_runtime<T, F>(wait: F) -> T
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return wait();
    }

    debug!("blocking wait moved off the async runtime");
    thread::scope(|scope| match scope.spawn(wait).join() {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    })
}
