//! Per-invocation fault bookkeeping.

use std::time::Duration;

use tn_core::{NavConfig, Position};

use crate::MotionFault;

/// Mutable state of one `move_to` call.
///
/// Created when the call starts and dropped when it returns; never shared
/// between invocations or agents.  Times are [`Clock`](tn_core::Clock)
/// readings.
///
/// Two independent detectors feed the **blocked** flag:
///
/// * *round trip*: the agent keeps within `round_trip_radius` of a
///   reference point.  Past half of `round_trip_threshold` the move is
///   blocked; past the full threshold it aborts.
/// * *stuck*: the position is literally unchanged since the last command
///   and the agent is not immobilized.  Past `block_threshold` the move is
///   blocked; past `stuck_threshold` it aborts.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionFaultState {
    /// Agent position when the last command was issued.
    pub previous_position:    Option<Position>,
    pub stuck_since:          Duration,
    pub round_trip_reference: Position,
    pub round_trip_since:     Duration,
    /// Recomputed by every [`observe`](Self::observe).
    pub blocked:              bool,
    pub last_command:         Option<Duration>,
    pub last_entity_check:    Option<Duration>,
}

impl MotionFaultState {
    /// Fresh state for an agent standing at `position` at time `now`.
    pub fn new(position: Position, now: Duration) -> Self {
        Self {
            previous_position:    None,
            stuck_since:          now,
            round_trip_reference: position,
            round_trip_since:     now,
            blocked:              false,
            last_command:         None,
            last_entity_check:    None,
        }
    }

    /// Run both detectors against the current position.
    ///
    /// Resets and recomputes [`blocked`](Self::blocked); returns the fault
    /// when a detector's abort threshold is exceeded.
    pub fn observe(
        &mut self,
        position:    Position,
        immobilized: bool,
        now:         Duration,
        cfg:         &NavConfig,
    ) -> Result<(), MotionFault> {
        self.blocked = false;

        if position.distance(self.round_trip_reference) <= cfg.round_trip_radius {
            let dwell = now.saturating_sub(self.round_trip_since);
            if dwell > cfg.round_trip_threshold {
                return Err(MotionFault::RoundTrip);
            }
            if dwell > cfg.round_trip_threshold / 2 {
                self.blocked = true;
            }
        } else {
            self.round_trip_reference = position;
            self.round_trip_since = now;
        }

        if self.previous_position == Some(position) && !immobilized {
            let still = now.saturating_sub(self.stuck_since);
            if still > cfg.stuck_threshold {
                return Err(MotionFault::Stuck);
            }
            if still > cfg.block_threshold {
                self.blocked = true;
            }
        } else {
            self.stuck_since = now;
        }

        Ok(())
    }

    /// Remember where the agent stood when a command went out.
    #[inline]
    pub fn record_command(&mut self, position: Position, now: Duration) {
        self.previous_position = Some(position);
        self.last_command = Some(now);
    }

    /// `true` when the entities-in-path scan is due, and marks it done.
    pub fn entity_check_due(&mut self, now: Duration, interval: Duration) -> bool {
        let due = self
            .last_entity_check
            .is_none_or(|t| now.saturating_sub(t) > interval);
        if due {
            self.last_entity_check = Some(now);
        }
        due
    }
}
