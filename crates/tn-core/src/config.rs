//! Navigation tuning configuration.
//!
//! Every threshold in the engine was calibrated empirically against the
//! world's geometry and network behaviour.  They are collected here so
//! applications can override them (e.g. from a JSON file with the `serde`
//! feature) while `NavConfig::default()` reproduces the calibrated values.

use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Ceiling applied to every latency-derived delay.
const MAX_LATENCY_DELAY: Duration = Duration::from_millis(5_000);

// ── Latency ───────────────────────────────────────────────────────────────────

/// Estimated network round-trip latency in milliseconds, as reported by the
/// world snapshot.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Latency(pub u32);

impl Latency {
    /// Substituted when the reported latency is implausibly low.
    pub const FALLBACK: Latency = Latency(50);

    /// The reported latency, or [`Latency::FALLBACK`] when the reading is
    /// below 10 ms (an uninitialised or bogus sample).
    #[inline]
    pub fn sanitized(self) -> Latency {
        if self.0 < 10 { Self::FALLBACK } else { self }
    }

    /// `base + multiplier × latency`, capped at 5 s.
    pub fn scaled_delay(self, base: Duration, multiplier: f64) -> Duration {
        let extra = Duration::from_millis((f64::from(self.sanitized().0) * multiplier) as u64);
        (base + extra).min(MAX_LATENCY_DELAY)
    }
}

// ── NavConfig ─────────────────────────────────────────────────────────────────

/// All tuning constants for grid construction, search and motion control.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    // ── Grid construction ─────────────────────────────────────────────────
    /// Chebyshev radius of the soft-penalty halo around obstacles.
    pub halo_radius: i32,
    /// Radius re-opened around every known region exit after thickening.
    pub exit_drill_radius: i32,
    /// Reach of the thin-wall teleport bridging pass (half of it diagonally).
    pub teleport_bridge_distance: i32,

    // ── Search ────────────────────────────────────────────────────────────
    /// Longest run of consecutive TeleportOnly tiles a route may contain.
    pub max_teleport_streak: u32,
    /// Ring limit when substituting an unwalkable destination.
    pub nearby_walkable_radius: i32,
    /// Ring limit for the attack-positioning search variant.
    pub closest_walkable_range: i32,

    // ── Arrival ───────────────────────────────────────────────────────────
    /// Default arrival tolerance in tiles.
    pub finish_distance: i32,

    // ── Fault detection ───────────────────────────────────────────────────
    /// Unchanged position for longer than this aborts with `Stuck`.
    pub stuck_threshold: Duration,
    /// Unchanged position for longer than this marks the move BLOCKED.
    pub block_threshold: Duration,
    /// Dwelling near one point for longer than this aborts with `RoundTrip`.
    pub round_trip_threshold: Duration,
    /// Radius around the round-trip reference point.
    pub round_trip_radius: f64,

    // ── Region transitions ────────────────────────────────────────────────
    pub region_load_timeout: Duration,
    pub region_load_poll: Duration,

    // ── Barriers & obstacles ──────────────────────────────────────────────
    pub door_attempts: u32,
    pub door_retry_delay: Duration,
    /// A closed door this close to any route tile blocks the route.
    pub door_path_padding: f64,
    /// Fallback door lookup radius when no route exists.
    pub door_vicinity: f64,
    /// Destructibles closer than this are struck while BLOCKED.
    pub destructible_vicinity: f64,
    /// Base delay after striking a destructible (plus 1× latency).
    pub obstacle_strike_delay: Duration,

    // ── Entities ──────────────────────────────────────────────────────────
    pub entity_check_interval: Duration,
    /// Default radius of the entities-in-path scan.
    pub clear_path_distance: i32,

    // ── Cadence ───────────────────────────────────────────────────────────
    pub walk_cadence_mean: Duration,
    pub town_cadence_mean: Duration,
    pub walk_cadence_shape: f64,
    /// Fraction of the latency added to the cadence mean.
    pub latency_weight: f64,
    pub walk_speed_tiles_per_sec: f64,
    /// Pause after every walk command.
    pub command_settle: Duration,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            halo_radius:              2,
            exit_drill_radius:        1,
            teleport_bridge_distance: 10,

            max_teleport_streak:      12,
            nearby_walkable_radius:   3,
            closest_walkable_range:   20,

            finish_distance:          4,

            stuck_threshold:          Duration::from_secs(2),
            block_threshold:          Duration::from_millis(200),
            round_trip_threshold:     Duration::from_secs(10),
            round_trip_radius:        8.0,

            region_load_timeout:      Duration::from_secs(2),
            region_load_poll:         Duration::from_millis(100),

            door_attempts:            5,
            door_retry_delay:         Duration::from_millis(250),
            door_path_padding:        4.0,
            door_vicinity:            5.0,
            destructible_vicinity:    2.0,
            obstacle_strike_delay:    Duration::from_millis(100),

            entity_check_interval:    Duration::from_millis(100),
            clear_path_distance:      7,

            walk_cadence_mean:        Duration::from_millis(325),
            town_cadence_mean:        Duration::from_millis(400),
            walk_cadence_shape:       3.0,
            latency_weight:           0.5,
            walk_speed_tiles_per_sec: 25.0,
            command_settle:           Duration::from_millis(50),
        }
    }
}

impl NavConfig {
    /// Reject combinations that would make the controller misbehave.
    pub fn validate(&self) -> CoreResult<()> {
        let fail = |msg: &str| Err(CoreError::Config(msg.to_owned()));

        if self.halo_radius < 0 || self.exit_drill_radius < 0 || self.teleport_bridge_distance < 0 {
            return fail("grid construction radii must be non-negative");
        }
        if self.nearby_walkable_radius < 1 || self.closest_walkable_range < 1 {
            return fail("walkable substitution radii must be at least 1");
        }
        if self.finish_distance < 0 {
            return fail("finish_distance must be non-negative");
        }
        if self.stuck_threshold.is_zero() || self.round_trip_threshold.is_zero() {
            return fail("stuck and round-trip thresholds must be positive");
        }
        if self.block_threshold >= self.stuck_threshold {
            return fail("block_threshold must be shorter than stuck_threshold");
        }
        if self.round_trip_radius <= 0.0 {
            return fail("round_trip_radius must be positive");
        }
        if self.region_load_poll.is_zero() || self.region_load_poll > self.region_load_timeout {
            return fail("region_load_poll must be positive and within region_load_timeout");
        }
        if self.door_attempts == 0 {
            return fail("door_attempts must be at least 1");
        }
        if !(self.walk_cadence_shape > 0.0) || !(self.walk_speed_tiles_per_sec > 0.0) {
            return fail("cadence shape and walk speed must be positive");
        }
        if self.latency_weight < 0.0 {
            return fail("latency_weight must be non-negative");
        }
        Ok(())
    }

    /// Mean of the walk cadence distribution for the given latency.
    pub fn cadence_mean_ms(&self, latency: Latency, in_town: bool) -> f64 {
        let base = if in_town { self.town_cadence_mean } else { self.walk_cadence_mean };
        base.as_secs_f64() * 1_000.0
            + (f64::from(latency.sanitized().0) * self.latency_weight).trunc()
    }

    /// Tiles walkable within `window` at the configured walk speed.
    #[inline]
    pub fn step_budget(&self, window: Duration) -> usize {
        (self.walk_speed_tiles_per_sec * window.as_secs_f64()) as usize
    }
}
