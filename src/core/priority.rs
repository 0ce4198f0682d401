//! Priority source for concurrently scheduled operations.
//!
//! Production mode draws uniformly from `0..=1000`; testing mode counts up
//! from 1 so schedules are reproducible. The mode is fixed when the
//! generator is built.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest value drawn in randomized mode.
pub const MAX_RANDOM_PRIORITY: u64 = 1000;

enum PriorityMode {
    Sequential(u64),
    Randomized(StdRng),
}

/// Thread-safe priority generator.
pub struct PriorityGenerator {
    mode: Mutex<PriorityMode>,
}

impl std::fmt::Debug for PriorityGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityGenerator")
            .field("sequential", &self.is_sequential())
            .finish()
    }
}

impl PriorityGenerator {
    /// Strictly increasing values starting at 1.
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            mode: Mutex::new(PriorityMode::Sequential(0)),
        }
    }

    /// Pseudo-random values seeded from the operating system.
    #[must_use]
    pub fn randomized() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Pseudo-random values from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            mode: Mutex::new(PriorityMode::Randomized(rng)),
        }
    }

    /// Whether this generator counts rather than draws.
    pub fn is_sequential(&self) -> bool {
        matches!(*self.mode.lock(), PriorityMode::Sequential(_))
    }

    /// Next priority value.
    pub fn next_priority(&self) -> u64 {
        match &mut *self.mode.lock() {
            PriorityMode::Sequential(counter) => {
                *counter += 1;
                *counter
            }
            PriorityMode::Randomized(rng) => rng.random_range(0..=MAX_RANDOM_PRIORITY),
        }
    }
}
