//! Benchmark configuration and its validation.

use serde::{Serialize, Serializer};
use std::time::Duration;
use crate::error::{BenchError, Result};
use crate::index::AccessMode;

pub const DEFAULT_CACHE_SIZE: usize = 100;
pub const DEFAULT_REPETITIONS: u64 = 100;
pub const DEFAULT_TREE_HEIGHT: u32 = 16;
pub const DEFAULT_WORKERS: usize = 1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Longest accepted wait for workers.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Tallest tree accepted; keeps `2^h - 1` well inside `u64`.
pub const MAX_TREE_HEIGHT: u32 = 40;

/// Validated, immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchConfig {
    pub cache_size: usize,
    /// Iterations performed by each worker.
    pub repetitions: u64,
    pub tree_height: u32,
    pub mode: AccessMode,
    pub workers: usize,
    /// Base seed for random mode; worker `i` uses `seed + i`.
    pub seed: Option<u64>,
    #[serde(rename = "timeout_secs", serialize_with = "serialize_secs")]
    pub timeout: Duration,
}

/// Unvalidated settings as they arrive from a command line.
///
/// Integers are signed so negative input can be rejected with a message that names
/// the offending option instead of failing inside the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawConfig {
    pub cache_size: i64,
    pub repetitions: i64,
    pub tree_height: i64,
    pub random: bool,
    pub workers: i64,
    pub seed: Option<u64>,
    pub timeout_secs: u64,
}

impl Default for RawConfig {
    fn default() -> Self {
        RawConfig {
            cache_size: DEFAULT_CACHE_SIZE as i64,
            repetitions: DEFAULT_REPETITIONS as i64,
            tree_height: DEFAULT_TREE_HEIGHT as i64,
            random: false,
            workers: DEFAULT_WORKERS as i64,
            seed: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            cache_size: DEFAULT_CACHE_SIZE,
            repetitions: DEFAULT_REPETITIONS,
            tree_height: DEFAULT_TREE_HEIGHT,
            mode: AccessMode::Sequential,
            workers: DEFAULT_WORKERS,
            seed: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl BenchConfig {
    /// Converts raw command-line values into a checked configuration.
    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let cache_size = positive("cache size", raw.cache_size)?;
        let workers = positive("worker count", raw.workers)?;

        let repetitions = u64::try_from(raw.repetitions).map_err(|_| {
            BenchError::invalid("repetitions", format!("must be >= 0, got {}", raw.repetitions))
        })?;

        let tree_height = u32::try_from(raw.tree_height).map_err(|_| {
            BenchError::invalid("tree height", format!("must be >= 0, got {}", raw.tree_height))
        })?;

        let config = BenchConfig {
            cache_size,
            repetitions,
            tree_height,
            mode: if raw.random { AccessMode::Random } else { AccessMode::Sequential },
            workers,
            seed: raw.seed,
            timeout: Duration::from_secs(raw.timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants a directly constructed configuration must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.cache_size == 0 {
            return Err(BenchError::invalid("cache size", "must be >= 1, got 0"));
        }
        if self.workers == 0 {
            return Err(BenchError::invalid("worker count", "must be >= 1, got 0"));
        }
        if self.tree_height > MAX_TREE_HEIGHT {
            return Err(BenchError::invalid(
                "tree height",
                format!("must be <= {}, got {}", MAX_TREE_HEIGHT, self.tree_height),
            ));
        }
        if self.timeout.is_zero() {
            return Err(BenchError::invalid("timeout", "must be greater than zero"));
        }
        if self.timeout > MAX_TIMEOUT {
            return Err(BenchError::invalid(
                "timeout",
                format!("must be <= {}s, got {}s", MAX_TIMEOUT.as_secs(), self.timeout.as_secs()),
            ));
        }
        Ok(())
    }

    /// Random seed for worker `worker`, if the run is seeded.
    pub fn worker_seed(&self, worker: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(worker as u64))
    }
}

fn positive(field: &'static str, value: i64) -> Result<usize> {
    if value < 1 {
        return Err(BenchError::invalid(field, format!("must be >= 1, got {}", value)));
    }
    usize::try_from(value)
        .map_err(|_| BenchError::invalid(field, format!("{} does not fit this platform", value)))
}

fn serialize_secs<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BenchConfig::from_raw(RawConfig::default()).unwrap();
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn test_random_flag_selects_mode() {
        let raw = RawConfig { random: true, ..RawConfig::default() };
        assert_eq!(BenchConfig::from_raw(raw).unwrap().mode, AccessMode::Random);
    }

    #[test]
    fn test_zero_cache_size_rejected() {
        let raw = RawConfig { cache_size: 0, ..RawConfig::default() };
        let err = BenchConfig::from_raw(raw).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("cache size"));
    }

    #[test]
    fn test_negative_values_rejected() {
        let cases = [
            RawConfig { repetitions: -1, ..RawConfig::default() },
            RawConfig { tree_height: -3, ..RawConfig::default() },
            RawConfig { workers: -2, ..RawConfig::default() },
        ];
        for raw in cases {
            assert!(BenchConfig::from_raw(raw).is_err());
        }
    }

    #[test]
    fn test_zero_repetitions_and_height_allowed() {
        let raw = RawConfig { repetitions: 0, tree_height: 0, ..RawConfig::default() };
        let config = BenchConfig::from_raw(raw).unwrap();
        assert_eq!(config.repetitions, 0);
        assert_eq!(config.tree_height, 0);
    }

    #[test]
    fn test_height_ceiling() {
        let raw = RawConfig { tree_height: MAX_TREE_HEIGHT as i64 + 1, ..RawConfig::default() };
        let err = BenchConfig::from_raw(raw).unwrap_err();
        assert!(err.to_string().contains("tree height"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let raw = RawConfig { timeout_secs: 0, ..RawConfig::default() };
        assert!(BenchConfig::from_raw(raw).is_err());
    }

    #[test]
    fn test_huge_timeout_rejected() {
        let raw = RawConfig { timeout_secs: u64::MAX, ..RawConfig::default() };
        assert!(BenchConfig::from_raw(raw).is_err());
    }

    #[test]
    fn test_worker_seeds_differ() {
        let config = BenchConfig { seed: Some(10), ..BenchConfig::default() };
        assert_eq!(config.worker_seed(0), Some(10));
        assert_eq!(config.worker_seed(3), Some(13));
        assert_eq!(BenchConfig::default().worker_seed(1), None);
    }

    #[test]
    fn test_serializes_timeout_as_seconds() {
        let json = serde_json::to_value(BenchConfig::default()).unwrap();
        assert_eq!(json["timeout_secs"], 3600);
        assert_eq!(json["mode"], "sequential");
    }
}
