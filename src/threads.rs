//! Thread-based strategy: one OS thread per partition, each returning its hit
//! count through a one-shot slot.

use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::aggregator::{aggregate, off_runtime};
use crate::config::{JoinMode, RunConfig};
use crate::error::{EstimateError, Result};
use crate::estimator::Estimate;
use crate::partition::{self, Partition};
use crate::slot::{self, ResultReceiver};

/// Spawn a worker thread per partition and sum their results in worker order.
///
/// Every slot is created before its thread is spawned, and the thread owns the
/// sending half. With [`JoinMode::Join`] all threads are joined before any slot
/// is read; with [`JoinMode::Detach`] the blocking slot read is the only
/// completion signal. In both modes each worker has finished (or abandoned its
/// slot) by the time this returns.
///
/// A `kernel` that reports more hits than its partition's iterations fails the
/// run with `InvalidConfiguration`.
pub fn run<K>(config: &RunConfig, mode: JoinMode, kernel: K) -> Result<Estimate>
where
    K: Fn(Partition) -> u64 + Clone + Send + 'static,
{
    let plan = partition::plan(config)?;
    let _span = tracing::info_span!(
        "thread_based",
        samples = config.samples,
        workers = config.workers,
        ?mode
    )
    .entered();

    let mut threads: Vec<JoinHandle<()>> = Vec::with_capacity(plan.partitions.len());
    let mut receivers: Vec<ResultReceiver> = Vec::with_capacity(plan.partitions.len());
    {
        let _kick_off = tracing::debug_span!("kick_off").entered();
        for &partition in &plan.partitions {
            let (sender, receiver) = slot::channel();
            let kernel = kernel.clone();

            let spawned = thread::Builder::new()
                .name(format!("pi-worker-{}", partition.worker))
                .spawn(move || {
                    let hits = kernel(partition);
                    sender.send(hits);
                });

            match spawned {
                Ok(handle) => {
                    threads.push(handle);
                    receivers.push(receiver);
                }
                Err(source) => {
                    warn!(worker = partition.worker, %source, "failed to spawn worker thread");
                    off_runtime(move || join_all(threads));
                    return Err(EstimateError::Spawn {
                        worker: partition.worker,
                        source,
                    });
                }
            }
        }
    }
    debug!(threads = threads.len(), "worker threads spawned");

    let hits = {
        let _retrieve = tracing::debug_span!("retrieve_results").entered();
        match mode {
            JoinMode::Join => off_runtime(move || join_all(threads)),
            // dropping a JoinHandle detaches its thread
            JoinMode::Detach => drop(threads),
        }
        off_runtime(move || aggregate(receivers))?
    };

    Estimate::checked(hits, plan.sampled())
}

fn join_all(threads: Vec<JoinHandle<()>>) {
    for (worker, handle) in threads.into_iter().enumerate() {
        if handle.join().is_err() {
            warn!(worker, "worker thread panicked");
        }
    }
}
