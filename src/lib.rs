//! Monte Carlo estimation of π under three concurrency strategies.
//!
//! The same sampling kernel runs on the calling thread, across scheduled tasks,
//! or across dedicated worker threads that hand results back through one-shot
//! slots. Each worker owns its own seeded random stream, so the concurrent
//! strategies give different (but statistically equivalent) approximations
//! from the single-threaded baseline.
//!
//! ```no_run
//! use montecarlo_pi::{estimate_pi, Strategy};
//!
//! let estimate = estimate_pi(Strategy::ThreadBased, 1_000_000, 4, Some(42))?;
//! println!("π ≈ {}", estimate.value);
//! # Ok::<(), montecarlo_pi::EstimateError>(())
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod estimator;
pub mod partition;
pub mod sampler;
pub mod scheduler;
pub mod single_thread;
pub mod slot;
pub mod tasks;
pub mod threads;

pub use config::{JoinMode, RunConfig, TaskBackend};
pub use error::{EstimateError, HandleError, Result};
pub use estimator::{estimate_pi, Estimate, Estimator, Strategy};
