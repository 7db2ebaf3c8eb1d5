//! Baseline: every sample on the calling thread from one stream.

use crate::config::RunConfig;
use crate::estimator::Estimate;
use crate::error::Result;
use crate::partition::{worker_seed, Partition};

/// Sample all `config.samples` points with a single stream. The worker count
/// is validated but does not split the work, so nothing is truncated.
pub fn run<K>(config: &RunConfig, kernel: K) -> Result<Estimate>
where
    K: FnOnce(Partition) -> u64,
{
    config.validate()?;
    let _span = tracing::info_span!("single_thread", samples = config.samples).entered();

    let whole = Partition {
        worker: 0,
        iterations: config.samples,
        seed: worker_seed(config.seed, 0),
    };
    let hits = kernel(whole);

    Estimate::checked(hits, config.samples)
}
