//! Wall-clock abstraction.
//!
//! # Design
//!
//! The motion controller measures every fault threshold (stuck, round-trip,
//! region load) against a [`Clock`] and performs every wait through it.
//! Sleeps are the only suspension points in the engine, so routing them
//! through one trait lets tests swap in [`ManualClock`], whose `sleep`
//! advances virtual time instantly:
//!
//!   now_after_sleep = now_before_sleep + requested_duration
//!
//! `now()` returns time elapsed since an arbitrary per-clock epoch; only
//! differences between two readings are meaningful.

use std::cell::Cell;
use std::time::{Duration, Instant};

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of monotonic time and the engine's only way to sleep.
pub trait Clock {
    /// Time elapsed since this clock's epoch.
    fn now(&self) -> Duration;

    /// Block the current control loop for `duration`.
    fn sleep(&self, duration: Duration);

    /// Time elapsed since an earlier reading of this clock.
    #[inline]
    fn since(&self, earlier: Duration) -> Duration {
        self.now().saturating_sub(earlier)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> Duration {
        (**self).now()
    }

    #[inline]
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

// ── SystemClock ───────────────────────────────────────────────────────────────

/// Real wall-clock time backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Clone, Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

// ── ManualClock ───────────────────────────────────────────────────────────────

/// Virtual clock for tests and offline simulation.
///
/// `sleep` never blocks; it advances the reading by the requested duration.
/// The type is `!Sync`: one clock drives one control loop.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance virtual time without a sleep call.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        self.now.get()
    }

    #[inline]
    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
