use std::time::Instant;
use tracing::debug;
use crate::cache::TreeCache;
use crate::config::BenchConfig;
use crate::index::IndexSelector;
use crate::report::WorkerReport;
use crate::tree::build_tree;

/// Runs one worker's share of the benchmark against `cache`.
///
/// Performs `config.repetitions` iterations of select-build-store and times only that
/// loop. The trees are never read back. Safe to call from many threads on the same
/// cache at once.
pub fn run_worker(worker: usize, config: &BenchConfig, cache: &TreeCache) -> WorkerReport {
    let seed = config.worker_seed(worker);
    let mut selector = IndexSelector::new(config.mode, config.cache_size, seed);
    debug!(worker, mode = %config.mode, repetitions = config.repetitions, "worker starting");

    let start = Instant::now();
    for i in 0..config.repetitions {
        let index = selector.next_index(i);
        cache.write(index, build_tree(config.tree_height));
    }
    let elapsed = start.elapsed();

    debug!(worker, elapsed_ms = elapsed.as_millis() as u64, "worker finished");

    WorkerReport {
        worker,
        elapsed,
        repetitions: config.repetitions,
        cache_size: config.cache_size,
    }
}
