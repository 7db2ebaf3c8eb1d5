//! Error types for estimation runs.

use thiserror::Error;

/// Why a result handle could not produce a hit count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The worker panicked before delivering its result.
    #[error("worker panicked")]
    Panicked,

    /// The producer side was dropped without a value being written.
    #[error("result slot abandoned without a value")]
    Abandoned,

    /// The task was cancelled by its scheduler.
    #[error("task cancelled")]
    Cancelled,
}

/// Main error type for an estimation run
#[derive(Error, Debug)]
pub enum EstimateError {
    /// Rejected before any work was scheduled
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A worker never delivered its partial result
    #[error("Worker {worker} did not produce a result: {cause}")]
    UnresolvedWorker {
        worker: usize,
        #[source]
        cause: HandleError,
    },

    /// The OS refused to start a worker thread
    #[error("Failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    /// The task runtime could not be built
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Type alias for Results using EstimateError
pub type Result<T> = std::result::Result<T, EstimateError>;

impl EstimateError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an unresolved worker error
    pub fn unresolved(worker: usize, cause: HandleError) -> Self {
        Self::UnresolvedWorker { worker, cause }
    }
}
