//! Worker pool lifecycle: validate, allocate, fan out, join against a deadline.

use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info};
use crate::cache::TreeCache;
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::report::{sample_resident_bytes, RunResult, WorkerReport};
use crate::worker::run_worker;

/// Body each worker thread runs.
type WorkFn = fn(usize, &BenchConfig, &TreeCache) -> WorkerReport;

/// Lifecycle of a [`Driver`].
///
/// `Configuring → Running → Completed`, or one of the terminal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Configuring,
    Running,
    Completed,
    TimedOut,
    Failed,
}

impl DriverState {
    pub fn name(&self) -> &'static str {
        match self {
            DriverState::Configuring => "configuring",
            DriverState::Running => "running",
            DriverState::Completed => "completed",
            DriverState::TimedOut => "timed out",
            DriverState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DriverState::Configuring | DriverState::Running)
    }
}

/// Owns one benchmark run.
///
/// A driver runs at most once. After a successful run the cache is kept so the
/// final slot contents can be inspected; on any failure in-flight workers are
/// abandoned and nothing is reported.
pub struct Driver {
    config: BenchConfig,
    state: DriverState,
    cache: Option<TreeCache>,
}

impl Driver {
    pub fn new(config: BenchConfig) -> Self {
        Self {
            config,
            state: DriverState::Configuring,
            cache: None,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Final cache contents, available once the run has completed.
    pub fn cache_mut(&mut self) -> Option<&mut TreeCache> {
        self.cache.as_mut()
    }

    /// Runs every worker to completion or fails.
    ///
    /// Configuration is checked before anything is allocated. The wait for workers is
    /// bounded by `config.timeout`; exceeding it yields [`BenchError::Timeout`] and
    /// the partial results are dropped.
    pub fn run(&mut self) -> Result<RunResult> {
        self.run_with(run_worker)
    }

    fn run_with(&mut self, work: WorkFn) -> Result<RunResult> {
        if self.state != DriverState::Configuring {
            return Err(BenchError::InvalidState(self.state.name()));
        }

        if let Err(e) = self.config.validate() {
            self.state = DriverState::Failed;
            return Err(e);
        }

        let expected = self.config.workers;
        let cache = Arc::new(TreeCache::new(self.config.cache_size));
        self.state = DriverState::Running;
        info!(
            workers = expected,
            cache_size = self.config.cache_size,
            repetitions = self.config.repetitions,
            tree_height = self.config.tree_height,
            mode = %self.config.mode,
            "starting benchmark"
        );

        let (sender, receiver) = channel::<WorkerReport>();
        let start = Instant::now();
        let deadline = start + self.config.timeout;

        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(expected);
        for worker in 0..expected {
            let sender = sender.clone();
            let cache = Arc::clone(&cache);
            let config = self.config.clone();

            let spawned = thread::Builder::new()
                .name(format!("diluvian-worker-{}", worker))
                .spawn(move || {
                    let report = work(worker, &config, &cache);
                    // Release our handle on the cache before reporting so the driver
                    // holds the only reference once every report is in.
                    drop(cache);
                    let _ = sender.send(report);
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    self.state = DriverState::Failed;
                    error!("failed to spawn worker {}: {}", worker, source);
                    return Err(BenchError::SpawnFailed { worker, source });
                }
            }
        }
        drop(sender);

        let mut reports = Vec::with_capacity(expected);
        while reports.len() < expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match receiver.recv_timeout(remaining) {
                Ok(report) => {
                    debug!(worker = report.worker, "worker reported");
                    reports.push(report);
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.state = DriverState::TimedOut;
                    error!(
                        timeout_secs = self.config.timeout.as_secs(),
                        finished = reports.len(),
                        expected,
                        "benchmark timed out"
                    );
                    return Err(BenchError::Timeout {
                        timeout: self.config.timeout,
                        finished: reports.len(),
                        expected,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.state = DriverState::Failed;
                    return Err(Self::diagnose_disconnect(handles, reports.len(), expected));
                }
            }
        }
        let elapsed = start.elapsed();

        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                self.state = DriverState::Failed;
                return Err(BenchError::WorkerPanicked { worker });
            }
        }

        reports.sort_by_key(|r| r.worker);
        let resident_bytes = sample_resident_bytes();
        self.cache = Arc::try_unwrap(cache).ok();
        self.state = DriverState::Completed;
        info!(elapsed_ms = elapsed.as_millis() as u64, "benchmark completed");

        Ok(RunResult {
            config: self.config.clone(),
            workers: reports,
            elapsed,
            resident_bytes,
        })
    }

    /// Every sender is gone but some reports never arrived: name the worker that died.
    fn diagnose_disconnect(
        handles: Vec<JoinHandle<()>>,
        finished: usize,
        expected: usize,
    ) -> BenchError {
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                error!(worker, "worker panicked");
                return BenchError::WorkerPanicked { worker };
            }
        }
        error!(finished, expected, "worker channel closed early");
        BenchError::WorkerLost { finished, expected }
    }
}

/// Validates `config`, runs it on a fresh [`Driver`] and returns the result.
pub fn run_benchmark(config: BenchConfig) -> Result<RunResult> {
    Driver::new(config).run()
}
