//! Per-agent jitter RNG.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Agents never share RNG state, so concurrently running control loops need
//! no synchronisation, and a fixed seed reproduces a run exactly.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG used for timing jitter and recovery nudges.
///
/// The type is `!Sync` to prevent accidental sharing across agent loops.
pub struct NavRng(SmallRng);

impl NavRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ u64::from(agent.0).wrapping_mul(MIXING_CONSTANT);
        NavRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed directly (tests, single-agent tools).
    pub fn from_seed(seed: u64) -> Self {
        NavRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Sample a duration from `Gamma(shape, mean / shape)`, a right-skewed
    /// distribution whose mean is `mean_ms`.  Never returns less than 1 ms.
    ///
    /// Falls back to the mean itself when the parameters are degenerate
    /// (non-positive or non-finite).
    pub fn gamma_duration(&mut self, mean_ms: f64, shape: f64) -> Duration {
        let sample = match Gamma::new(shape, mean_ms / shape) {
            Ok(dist) => dist.sample(&mut self.0),
            Err(_) => mean_ms,
        };
        Duration::from_millis(sample.max(1.0) as u64)
    }

    /// A random tile offset in `[-radius, radius]²`, never `(0, 0)` when
    /// `radius > 0`.
    pub fn nudge(&mut self, radius: i32) -> (i32, i32) {
        if radius <= 0 {
            return (0, 0);
        }
        loop {
            let dx = self.0.gen_range(-radius..=radius);
            let dy = self.0.gen_range(-radius..=radius);
            if dx != 0 || dy != 0 {
                return (dx, dy);
            }
        }
    }
}
