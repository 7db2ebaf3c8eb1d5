//! Task-based strategy: one scheduled task per partition.

use tracing::debug;

use crate::aggregator::{aggregate, off_runtime};
use crate::config::RunConfig;
use crate::estimator::Estimate;
use crate::error::Result;
use crate::partition::{self, Partition, Plan};
use crate::scheduler::{Scheduler, TaskHandle};

/// Submit one task per partition to `scheduler`, then resolve them in worker
/// order. Every task is submitted before the first one is resolved so an eager
/// back-end can run them side by side.
///
/// `kernel` returns the hit count for one partition; a count above the
/// partition's iterations fails the run with `InvalidConfiguration`.
pub fn run<S, K>(config: &RunConfig, scheduler: &S, kernel: K) -> Result<Estimate>
where
    S: Scheduler,
    K: Fn(Partition) -> u64 + Clone + Send + 'static,
{
    let plan = partition::plan(config)?;
    run_plan(&plan, scheduler, kernel)
}

/// [`run`] for a plan the caller has already built.
pub fn run_plan<S, K>(plan: &Plan, scheduler: &S, kernel: K) -> Result<Estimate>
where
    S: Scheduler,
    K: Fn(Partition) -> u64 + Clone + Send + 'static,
{
    let _span = tracing::info_span!(
        "task_based",
        samples = plan.sampled(),
        workers = plan.partitions.len()
    )
    .entered();

    let handles: Vec<TaskHandle> = {
        let _kick_off = tracing::debug_span!("kick_off").entered();
        plan.partitions
            .iter()
            .map(|&partition| {
                let kernel = kernel.clone();
                scheduler.submit(move || kernel(partition))
            })
            .collect()
    };
    debug!(tasks = handles.len(), "tasks submitted");

    let hits = {
        let _retrieve = tracing::debug_span!("retrieve_results").entered();
        off_runtime(move || aggregate(handles))?
    };

    Estimate::checked(hits, plan.sampled())
}
