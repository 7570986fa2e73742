//! Run results and their line-oriented rendering.
//!
//! The text form keeps the shape tooling already scrapes: one
//! `Took <ms>ms to allocate <n> trees in a cache of <size>` line per worker with plain
//! integers, and a final total line.

use serde::{Serialize, Serializer};
use std::time::Duration;
use sysinfo::{ProcessRefreshKind, System};
use crate::config::BenchConfig;

/// Timing for a single worker.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerReport {
    pub worker: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub repetitions: u64,
    pub cache_size: usize,
}

impl WorkerReport {
    pub fn to_line(&self) -> String {
        format!(
            "worker {}: Took {}ms to allocate {} trees in a cache of {}",
            self.worker,
            self.elapsed.as_millis(),
            self.repetitions,
            self.cache_size,
        )
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub config: BenchConfig,
    /// One entry per worker, ordered by worker id.
    pub workers: Vec<WorkerReport>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    /// Process resident set size right after the workers joined, while the final
    /// cache contents were still alive. `None` where the platform does not expose it.
    pub resident_bytes: Option<u64>,
}

impl RunResult {
    /// Trees built across all workers.
    pub fn total_trees(&self) -> u64 {
        self.workers.iter().map(|w| w.repetitions).sum()
    }

    pub fn slowest_worker(&self) -> Option<&WorkerReport> {
        self.workers.iter().max_by_key(|w| w.elapsed)
    }

    pub fn total_line(&self) -> String {
        let count = self.workers.len();
        format!(
            "Total: took {}ms for {} worker{}",
            self.elapsed.as_millis(),
            count,
            if count == 1 { "" } else { "s" },
        )
    }

    /// `Resident: <n> MiB`, or `None` when memory could not be sampled.
    pub fn memory_line(&self) -> Option<String> {
        self.resident_bytes
            .map(|bytes| format!("Resident: {:.1} MiB", bytes as f64 / (1024.0 * 1024.0)))
    }

    /// Per-worker lines followed by the total line.
    pub fn to_lines(&self) -> Vec<String> {
        self.workers
            .iter()
            .map(WorkerReport::to_line)
            .chain(std::iter::once(self.total_line()))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Resident set size of this process in bytes, read through `sysinfo`.
pub fn sample_resident_bytes() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut sys = System::new();
    if !sys.refresh_process_specifics(pid, ProcessRefreshKind::new().with_memory()) {
        return None;
    }
    sys.process(pid).map(|process| process.memory())
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_nanos() as f64 / 1_000_000.0)
}
