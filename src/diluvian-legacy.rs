//! Positional-argument form of the benchmark kept for old scripts.
//!
//! `diluvian-legacy <cache_size> <reps>` runs one worker that performs
//! `reps * cache_size` updates with trees of height 16.

use anyhow::{Context, Result};
use rdiluvian::config::DEFAULT_TREE_HEIGHT;
use rdiluvian::utils::init_tracing;
use rdiluvian::{run_benchmark, BenchConfig, RawConfig};
use std::env;
use std::process;

fn print_usage() {
    eprintln!("Usage: diluvian-legacy <cache_size> <reps>");
    eprintln!();
    eprintln!("  cache_size   Number of cache slots");
    eprintln!("  reps         Passes over the cache; total updates = reps * cache_size");
}

/// Maps the two positional values onto the regular configuration.
fn legacy_config(cache_size: i64, reps: i64) -> Result<BenchConfig> {
    let repetitions = reps
        .checked_mul(cache_size)
        .with_context(|| format!("{} * {} repetitions overflows", reps, cache_size))?;

    let config = BenchConfig::from_raw(RawConfig {
        cache_size,
        repetitions,
        tree_height: DEFAULT_TREE_HEIGHT as i64,
        ..RawConfig::default()
    })?;
    Ok(config)
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 2 {
        print_usage();
        process::exit(2);
    }

    init_tracing(0);

    let cache_size: i64 = args[0]
        .parse()
        .with_context(|| format!("cache_size must be an integer, got {:?}", args[0]))?;
    let reps: i64 = args[1]
        .parse()
        .with_context(|| format!("reps must be an integer, got {:?}", args[1]))?;

    let config = legacy_config(cache_size, reps)?;
    let result = run_benchmark(config).context("benchmark run failed")?;

    for report in &result.workers {
        println!(
            "Took {}ms to allocate {} trees in a cache of {}",
            report.elapsed.as_millis(),
            report.repetitions,
            report.cache_size
        );
    }

    Ok(())
}
