//! Splits a run into per-worker shares with independent seeds.

use crate::config::RunConfig;
use crate::error::{EstimateError, Result};

/// One worker's share of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub worker: usize,
    pub iterations: u64,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub partitions: Vec<Partition>,
}

impl Plan {
    /// Iterations actually sampled. Smaller than the requested count when the
    /// worker count does not divide it; the remainder is dropped.
    pub fn sampled(&self) -> u64 {
        self.partitions.iter().map(|p| p.iterations).sum()
    }
}

pub fn worker_seed(base: Option<u64>, worker: usize) -> u64 {
    match base {
        Some(base) => base.wrapping_add(worker as u64),
        None => worker as u64,
    }
}

/// Plan `config.workers` partitions of `config.samples / config.workers`
/// iterations each.
pub fn plan(config: &RunConfig) -> Result<Plan> {
    config.validate()?;

    let per_worker = config.samples / config.workers as u64;
    if per_worker == 0 {
        return Err(EstimateError::invalid_configuration(format!(
            "{} samples cannot be shared between {} workers",
            config.samples, config.workers
        )));
    }

    let partitions = (0..config.workers)
        .map(|worker| Partition {
            worker,
            iterations: per_worker,
            seed: worker_seed(config.seed, worker),
        })
        .collect();

    Ok(Plan { partitions })
}
