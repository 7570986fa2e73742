//! Error types for benchmark configuration and execution.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Everything that can end a benchmark run before it reports.
///
/// None of these are retried. Allocation failure is absent on purpose: Rust aborts
/// the process on out-of-memory, which is the outcome the benchmark wants.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("benchmark timed out after {timeout:?}: {finished} of {expected} workers finished")]
    Timeout {
        timeout: Duration,
        finished: usize,
        expected: usize,
    },

    #[error("lost contact with workers while waiting: {finished} of {expected} workers reported")]
    WorkerLost { finished: usize, expected: usize },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("failed to spawn worker {worker}: {source}")]
    SpawnFailed {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("driver cannot run from state {0}")]
    InvalidState(&'static str),
}

impl BenchError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        BenchError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors caused by user input rather than by the run itself.
    pub fn is_config_error(&self) -> bool {
        matches!(self, BenchError::InvalidConfig { .. })
    }
}
