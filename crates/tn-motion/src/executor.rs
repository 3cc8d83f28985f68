//! The `MoveTo` control loop.
//!
//! # States
//!
//! A move is ADVANCING until a fault detector marks it BLOCKED for the
//! current tick, and ends either with a [`MoveOutcome`] or ABORTED with a
//! [`MotionFault`].  While BLOCKED:
//!
//! * arrival tolerance doubles, so a near miss still terminates;
//! * a destructible hugging the agent is struck, or failing that a door
//!   next to the agent is opened.
//!
//! # Cadence
//!
//! How far one walk command reaches is derived from a duration sampled once
//! per `move_to` from a gamma distribution whose mean grows with network
//! latency.  The resulting step budget is
//! `walk_speed_tiles_per_sec × duration` tiles.

use tracing::{debug, warn};

use tn_core::{Clock, NavConfig, NavRng, ObjectId, Position};
use tn_router::{FixupTable, RegionRouter};
use tn_world::{Locomotion, ObjectInteraction, WorldSensor, WorldSnapshot};

use crate::{
    LocomotionProfile, MotionFault, MotionFaultState, MotionResult, MoveOutcome, MoveRequest,
};

/// Chebyshev reach of the random step taken between door attempts.
const NUDGE_RADIUS: i32 = 5;

// ── MotionExecutor ────────────────────────────────────────────────────────────

/// Drives one agent towards destinations, one `move_to` at a time.
///
/// Owns the agent's router (and with it the search buffers) and its jitter
/// RNG.  The world is passed per call so one executor can outlive many
/// world connections.
pub struct MotionExecutor<C: Clock> {
    cfg:     NavConfig,
    router:  RegionRouter,
    profile: LocomotionProfile,
    rng:     NavRng,
    clock:   C,
}

impl<C: Clock> MotionExecutor<C> {
    pub fn new(cfg: NavConfig, rng: NavRng, clock: C) -> Self {
        Self {
            router: RegionRouter::new(cfg.clone()),
            cfg,
            profile: LocomotionProfile::default(),
            rng,
            clock,
        }
    }

    pub fn with_profile(mut self, profile: LocomotionProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_fixups(mut self, fixups: FixupTable) -> Self {
        self.router = self.router.with_fixups(fixups);
        self
    }

    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.cfg
    }

    #[inline]
    pub fn router(&mut self) -> &mut RegionRouter {
        &mut self.router
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── MoveTo ────────────────────────────────────────────────────────────

    /// Move the agent until it reaches `req.destination`, a terminal
    /// condition holds, or a fault aborts the move.
    ///
    /// Every iteration re-senses the world and issues at most one movement
    /// command.
    pub fn move_to<W>(&mut self, world: &mut W, req: &MoveRequest) -> MotionResult<MoveOutcome>
    where
        W: WorldSensor + Locomotion + ObjectInteraction + ?Sized,
    {
        let dest = req.destination;
        let tolerance = req.tolerance.unwrap_or(self.cfg.finish_distance);
        let clear_path = req.clear_path_override.unwrap_or(self.cfg.clear_path_distance);

        let start = world.refresh();
        let start_region = start.region;
        let window = self.rng.gamma_duration(
            self.cfg.cadence_mean_ms(start.latency, start.in_town()),
            self.cfg.walk_cadence_shape,
        );
        let budget = self.cfg.step_budget(window);
        let mut state = MotionFaultState::new(start.position, self.clock.now());

        loop {
            world.wait_for_priority();
            let snap = world.refresh();

            if let Some(reason) = &snap.interrupt {
                return Err(MotionFault::Interrupted(reason.clone()));
            }

            // Entering another region is how portals and entrances finish.
            if snap.region != start_region {
                return self.await_region(world, snap);
            }

            let distance = snap.distance_from_agent(dest);
            if distance <= tolerance || (state.blocked && distance <= tolerance * 2) {
                return Ok(MoveOutcome::Arrived);
            }
            if req.in_stationary_band(distance) {
                debug!(target: "tn_motion", %dest, distance, band = ?req.stationary, "stationary band reached");
                return Ok(MoveOutcome::WithinStationaryBand);
            }

            if !snap.can_teleport {
                self.open_door_towards(world, &snap, dest)?;
            }

            if snap.can_teleport {
                if let Some(last) = state.last_command {
                    let since = self.clock.since(last);
                    if since < snap.cast_duration {
                        self.clock.sleep(snap.cast_duration - since);
                        continue;
                    }
                }
            }

            let scan = !req.ignore_entities
                && !snap.in_town()
                && (!snap.can_teleport || req.clear_path_override.is_some())
                && clear_path > 0
                && state.entity_check_due(self.clock.now(), self.cfg.entity_check_interval);
            if scan && self.entity_in_path(&snap, req, clear_path) {
                return Err(MotionFault::EntitiesInPath);
            }

            if let Err(fault) =
                state.observe(snap.position, snap.immobilized, self.clock.now(), &self.cfg)
            {
                warn!(
                    target: "tn_motion",
                    region = %snap.region, position = %snap.position, destination = %dest,
                    %fault, "move aborted"
                );
                return Err(fault);
            }

            if state.blocked && !req.ignore_objects {
                self.clear_obstacle(world, &snap);
            }

            if let Some(ability) = self.profile.select(&snap) {
                if !snap.is_active(ability) {
                    world.activate_ability(ability);
                }
            }

            let path = match self.router.search(&snap, dest) {
                Ok(path) => path,
                Err(err) => {
                    warn!(
                        target: "tn_motion",
                        region = %snap.region, position = %snap.position, destination = %dest,
                        error = %err, "path could not be calculated"
                    );
                    return Err(MotionFault::NoPath);
                }
            };
            if path.is_empty() {
                warn!(target: "tn_motion", region = %snap.region, destination = %dest, "path found but empty");
                return Ok(MoveOutcome::EmptyPath);
            }

            state.record_command(snap.position, self.clock.now());
            if snap.can_teleport {
                world.teleport_along(&path);
            } else {
                world.walk_through(&path, budget);
                self.clock.sleep(self.cfg.command_settle);
            }
        }
    }

    // ── Tick stages ───────────────────────────────────────────────────────

    /// Poll until the new region's collision data is available.
    fn await_region<W>(&self, world: &mut W, mut snap: WorldSnapshot) -> MotionResult<MoveOutcome>
    where
        W: WorldSensor + ?Sized,
    {
        let started = self.clock.now();
        loop {
            if snap.region_loaded() {
                debug!(target: "tn_motion", region = %snap.region, "region changed during move");
                return Ok(MoveOutcome::RegionChanged);
            }
            if self.clock.since(started) >= self.cfg.region_load_timeout {
                warn!(target: "tn_motion", region = %snap.region, "collision data did not load after region change");
                return Err(MotionFault::RegionLoadTimeout { region: snap.region });
            }
            self.clock.sleep(self.cfg.region_load_poll);
            snap = world.refresh();
        }
    }

    /// Open a closed door standing between the agent and `dest`, with
    /// bounded retries.  A random nudge and a short pause follow every
    /// failed attempt.
    fn open_door_towards<W>(
        &mut self,
        world: &mut W,
        snap:  &WorldSnapshot,
        dest:  Position,
    ) -> MotionResult<()>
    where
        W: Locomotion + ObjectInteraction + ?Sized,
    {
        let Some(door) = self.router.has_door_between(snap, snap.position, dest).cloned() else {
            return Ok(());
        };
        debug!(target: "tn_motion", door = %door.id, at = %door.position, "door between agent and destination");

        let done = door_opened(door.id);
        let mut last_err = None;
        for attempt in 1..=self.cfg.door_attempts {
            match world.interact(&door, &done) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    debug!(target: "tn_motion", door = %door.id, attempt, error = %err, "door did not open");
                    last_err = Some(err);
                }
            }
            let (dx, dy) = self.rng.nudge(NUDGE_RADIUS);
            world.nudge(snap.position.offset(dx, dy));
            self.clock.sleep(self.cfg.door_retry_delay);
        }
        match last_err {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// `true` if a hostile entity within `radius` can see the agent with no
    /// closed door in between.
    fn entity_in_path(&mut self, snap: &WorldSnapshot, req: &MoveRequest, radius: i32) -> bool {
        let pos = snap.position;
        for e in snap.entities.within(pos, radius) {
            if !e.hostile || !(req.entity_filter)(e) {
                continue;
            }
            if !self.router.line_of_sight(snap, pos, e.position) {
                continue;
            }
            // Last: it runs a search.
            if self.router.has_door_between(snap, pos, e.position).is_none() {
                debug!(target: "tn_motion", entity = %e.id, at = %e.position, "hostile entity in path");
                return true;
            }
        }
        false
    }

    /// BLOCKED recovery: strike an adjacent destructible, else open a
    /// nearby door.  Interaction failures are ignored; the detectors will
    /// catch a move that stays blocked.
    fn clear_obstacle<W>(&mut self, world: &mut W, snap: &WorldSnapshot)
    where
        W: Locomotion + ObjectInteraction + ?Sized,
    {
        if let Some(obj) = self.router.closest_destructible(snap, snap.position) {
            debug!(target: "tn_motion", object = %obj.id, at = %obj.position, "striking destructible");
            world.strike(obj);
            self.clock.sleep(snap.latency.scaled_delay(self.cfg.obstacle_strike_delay, 1.0));
        } else if let Some(door) = self.router.closest_door(snap, snap.position) {
            debug!(target: "tn_motion", door = %door.id, at = %door.position, "opening nearby door");
            if let Err(err) = world.interact(door, &door_opened(door.id)) {
                debug!(target: "tn_motion", door = %door.id, error = %err, "nearby door did not open");
            }
        }
    }
}

/// Completion predicate: the door is still known and no longer selectable.
fn door_opened(id: ObjectId) -> impl Fn(&WorldSnapshot) -> bool {
    move |snap: &WorldSnapshot| snap.object(id).is_some_and(|o| !o.selectable)
}

impl<C: Clock> std::fmt::Debug for MotionExecutor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionExecutor")
            .field("cfg", &self.cfg)
            .field("router", &self.router)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}
