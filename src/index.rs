use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

/// How the next cache slot to overwrite is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Round-robin: `counter % capacity`.
    #[default]
    Sequential,
    /// Uniformly random slot, independent of the counter.
    Random,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::Sequential => write!(f, "sequential"),
            AccessMode::Random => write!(f, "random"),
        }
    }
}

/// Round-robin slot for `counter`. `capacity` must be non-zero.
#[inline]
pub fn sequential_index(counter: u64, capacity: usize) -> usize {
    (counter % capacity as u64) as usize
}

/// Slot in `[0, capacity)` to overwrite for update number `counter`.
///
/// Sequential mode ignores `rng`; random mode ignores `counter` and draws one value
/// from `rng`, which must belong to the calling worker alone.
#[inline]
pub fn select_index<R: Rng + ?Sized>(
    counter: u64,
    capacity: usize,
    mode: AccessMode,
    rng: &mut R,
) -> usize {
    match mode {
        AccessMode::Sequential => sequential_index(counter, capacity),
        AccessMode::Random => rng.gen_range(0..capacity),
    }
}

/// Per-worker slot chooser.
///
/// Each worker owns one selector, so the random stream is never shared between
/// threads. With a seed the stream is reproducible; without one it is drawn
/// from OS entropy.
pub struct IndexSelector {
    mode: AccessMode,
    capacity: usize,
    rng: Option<StdRng>,
}

impl IndexSelector {
    pub fn new(mode: AccessMode, capacity: usize, seed: Option<u64>) -> Self {
        debug_assert!(capacity > 0, "cache capacity must be non-zero");
        let rng = match mode {
            AccessMode::Sequential => None,
            AccessMode::Random => Some(match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            }),
        };

        Self { mode, capacity, rng }
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot to write for update number `counter`. The counter is ignored in random mode.
    #[inline]
    pub fn next_index(&mut self, counter: u64) -> usize {
        match self.rng.as_mut() {
            Some(rng) => select_index(counter, self.capacity, self.mode, rng),
            None => sequential_index(counter, self.capacity),
        }
    }
}
