//! Run configuration.

use crate::error::{EstimateError, Result};

/// How many iterations a run samples when none is given.
pub const DEFAULT_SAMPLES: u64 = 1_000_000;

/// Number of workers when none is given. Leaves headroom for the calling
/// thread on a typical six-core machine and divides [`DEFAULT_SAMPLES`] evenly.
pub const DEFAULT_WORKERS: usize = 4;

/// Parameters shared by every strategy for one estimation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub samples: u64,
    pub workers: usize,
    /// Base seed. Worker `i` seeds its stream with `seed + i`, or with `i`
    /// alone when this is `None`.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            workers: DEFAULT_WORKERS,
            seed: None,
        }
    }
}

impl RunConfig {
    pub fn new(samples: u64, workers: usize, seed: Option<u64>) -> Self {
        Self {
            samples,
            workers,
            seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(EstimateError::invalid_configuration(
                "sample count must be greater than zero",
            ));
        }
        if self.workers == 0 {
            return Err(EstimateError::invalid_configuration(
                "worker count must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Back-end that executes task-based work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TaskBackend {
    /// Eager: every task starts on a pool thread as soon as it is submitted.
    #[default]
    Pool,
    /// Lazy: a task runs on the resolving thread when its handle is resolved.
    Deferred,
}

/// How the thread-based strategy reconciles its workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum JoinMode {
    /// Join every worker thread before reading any result slot.
    #[default]
    Join,
    /// Detach workers and observe completion only through the result slots.
    Detach,
}
