//! Turns hit counts into a π estimate, and the public entry points.

use std::fmt;

use tracing::info;

use crate::config::{JoinMode, RunConfig, TaskBackend};
use crate::error::{EstimateError, Result};
use crate::scheduler::AnyScheduler;
use crate::{partition, sampler, single_thread, tasks, threads};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub hits: u64,
    pub samples: u64,
}

impl Estimate {
    /// `4 × hits / samples`: the circle covers π / 4 of the square.
    ///
    /// `samples` must be non-zero; every strategy rejects empty runs up front.
    pub fn from_counts(hits: u64, samples: u64) -> Self {
        debug_assert!(samples > 0);
        Self {
            value: 4.0 * (hits as f64 / samples as f64),
            hits,
            samples,
        }
    }

    /// Like [`Estimate::from_counts`], but rejects more hits than samples,
    /// which only a faulty worker kernel can report.
    pub fn checked(hits: u64, samples: u64) -> Result<Self> {
        if hits > samples {
            return Err(EstimateError::invalid_configuration(format!(
                "workers reported {hits} hits for {samples} samples"
            )));
        }
        Ok(Self::from_counts(hits, samples))
    }

    pub fn error(&self) -> f64 {
        std::f64::consts::PI - self.value
    }
}

/// Concurrency strategy used to run the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// One stream, every sample on the calling thread.
    SingleThread,
    /// One scheduled task per partition.
    TaskBased,
    /// One OS thread per partition, results through one-shot slots.
    ThreadBased,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::SingleThread,
        Strategy::TaskBased,
        Strategy::ThreadBased,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SingleThread => "single_thread",
            Strategy::TaskBased => "task_based",
            Strategy::ThreadBased => "thread_based",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Estimator {
    pub config: RunConfig,
    pub task_backend: TaskBackend,
    pub join_mode: JoinMode,
}

impl Estimator {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_task_backend(mut self, backend: TaskBackend) -> Self {
        self.task_backend = backend;
        self
    }

    pub fn with_join_mode(mut self, mode: JoinMode) -> Self {
        self.join_mode = mode;
        self
    }

    pub fn run(&self, strategy: Strategy) -> Result<Estimate> {
        let estimate = match strategy {
            Strategy::SingleThread => single_thread::run(&self.config, sampler::sample_partition)?,
            Strategy::TaskBased => {
                // plan first so bad counts never build a runtime
                let plan = partition::plan(&self.config)?;
                let scheduler = AnyScheduler::for_backend(self.task_backend, self.config.workers)?;
                tasks::run_plan(&plan, &scheduler, sampler::sample_partition)?
            }
            Strategy::ThreadBased => {
                threads::run(&self.config, self.join_mode, sampler::sample_partition)?
            }
        };

        info!(
            strategy = strategy.name(),
            pi = estimate.value,
            hits = estimate.hits,
            samples = estimate.samples,
            "estimate computed"
        );
        Ok(estimate)
    }
}

/// Estimate π with `strategy` using the default back-ends.
pub fn estimate_pi(
    strategy: Strategy,
    samples: u64,
    workers: usize,
    seed: Option<u64>,
) -> Result<Estimate> {
    Estimator::new(RunConfig::new(samples, workers, seed)).run(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_maps_onto_pi_scale() {
        assert_eq!(Estimate::from_counts(14, 40).value, 1.4);
        assert_eq!(Estimate::from_counts(0, 10).value, 0.0);
        assert_eq!(Estimate::from_counts(10, 10).value, 4.0);
        assert_eq!(Estimate::from_counts(785, 1000).value, 3.14);
    }

    #[test]
    fn over_reported_hits_are_rejected() {
        assert_eq!(Estimate::checked(40, 40).unwrap().value, 4.0);
        assert!(matches!(
            Estimate::checked(41, 40),
            Err(EstimateError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn error_is_measured_against_pi() {
        let estimate = Estimate::from_counts(1, 1);
        assert!((estimate.error() - (std::f64::consts::PI - 4.0)).abs() < 1e-12);
    }

    #[test]
    fn strategy_names() {
        let names: Vec<String> = Strategy::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["single_thread", "task_based", "thread_based"]);
    }
}
