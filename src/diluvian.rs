//! Diluvian allocation-pressure benchmark.
//!
//! Repeatedly builds complete binary trees and overwrites them into a fixed-size
//! cache from one or more threads, then prints how long each worker took.
//!
//! ```text
//! diluvian --size 100 --repetitions 1000 --height 16 --threads 4 --random
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rdiluvian::config::{
    DEFAULT_CACHE_SIZE, DEFAULT_REPETITIONS, DEFAULT_TIMEOUT, DEFAULT_TREE_HEIGHT, DEFAULT_WORKERS,
};
use rdiluvian::utils::init_tracing;
use rdiluvian::{BenchConfig, Driver, RawConfig};

#[derive(Parser, Debug)]
#[command(name = "diluvian")]
#[command(about = "Allocation-pressure benchmark: build binary trees into a fixed-size cache")]
#[command(disable_help_flag = true)]
struct Args {
    /// The size of the cache
    #[arg(
        short = 's',
        long = "size",
        default_value_t = DEFAULT_CACHE_SIZE as i64,
        allow_negative_numbers = true
    )]
    size: i64,

    /// Number of cache entries each thread updates
    #[arg(
        short = 'r',
        long,
        default_value_t = DEFAULT_REPETITIONS as i64,
        allow_negative_numbers = true
    )]
    repetitions: i64,

    /// Height of the tree to create for each entry
    #[arg(
        short = 'h',
        long,
        default_value_t = DEFAULT_TREE_HEIGHT as i64,
        allow_negative_numbers = true
    )]
    height: i64,

    /// Pick cache slots at random instead of round-robin
    #[arg(short = 'a', long)]
    random: bool,

    /// Number of worker threads
    #[arg(
        short = 't',
        long,
        default_value_t = DEFAULT_WORKERS as i64,
        allow_negative_numbers = true
    )]
    threads: i64,

    /// Seed for random slot selection (worker i uses seed + i)
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Also print the result as JSON
    #[arg(long)]
    json: bool,

    /// More diagnostics on stderr (repeat for debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Args {
    fn raw_config(&self) -> RawConfig {
        RawConfig {
            cache_size: self.size,
            repetitions: self.repetitions,
            tree_height: self.height,
            random: self.random,
            workers: self.threads,
            seed: self.seed,
            timeout_secs: self.timeout,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = BenchConfig::from_raw(args.raw_config()).context("invalid arguments")?;
    let mut driver = Driver::new(config);
    let result = driver.run().context("benchmark run failed")?;

    for line in result.to_lines() {
        println!("{}", line);
    }
    if let Some(line) = result.memory_line() {
        println!("{}", line);
    }

    if args.json {
        println!("{}", result.to_json().context("failed to encode result")?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["diluvian"]).unwrap();
        assert_eq!(args.raw_config(), RawConfig::default());
        assert!(!args.json);
    }

    #[test]
    fn test_short_flags() {
        let argv = ["diluvian", "-s", "10", "-r", "5", "-h", "3", "-a", "-t", "4"];
        let args = Args::try_parse_from(argv).unwrap();
        let raw = args.raw_config();
        assert_eq!(raw.cache_size, 10);
        assert_eq!(raw.repetitions, 5);
        assert_eq!(raw.tree_height, 3);
        assert!(raw.random);
        assert_eq!(raw.workers, 4);
    }

    #[test]
    fn test_negative_height_reaches_validation() {
        let args = Args::try_parse_from(["diluvian", "--height", "-1"]).unwrap();
        let err = BenchConfig::from_raw(args.raw_config()).unwrap_err();
        assert!(err.to_string().contains("tree height"));
    }

    #[test]
    fn test_long_help_still_available() {
        let err = Args::try_parse_from(["diluvian", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
