//! Collaborator seams.
//!
//! The engine drives the world exclusively through these three traits.  A
//! live client implements them over its input-synthesis and memory-reading
//! layers; tests and the arena demo implement them over an in-memory world.
//! One value commonly implements all three.

use tn_core::Position;
use tn_spatial::Path;

use crate::{Ability, InteractResult, WorldObject, WorldSnapshot};

/// Source of fresh world snapshots.
pub trait WorldSensor {
    /// Re-read the world.
    fn refresh(&mut self) -> WorldSnapshot;

    /// Block while a higher-priority control loop owns the agent.  Called at
    /// the top of every tick, never mid-command.
    fn wait_for_priority(&mut self) {}
}

/// Movement primitives.  Every call issues one command and returns without
/// waiting for the movement to finish.
pub trait Locomotion {
    /// Walk along `path`, covering at most `budget` tiles past its start.
    fn walk_through(&mut self, path: &Path, budget: usize);

    /// Relocate instantly along `path` (free movement).
    fn teleport_along(&mut self, path: &Path);

    /// Short forced step towards `target`; used to shake loose from a
    /// barrier before retrying it.
    fn nudge(&mut self, target: Position);

    /// Switch on a persistent movement ability.
    fn activate_ability(&mut self, ability: Ability);

    /// Attack an object in place (breaking a destructible).
    fn strike(&mut self, object: &WorldObject);
}

/// Interaction with world objects (opening doors, using portals).
pub trait ObjectInteraction {
    /// Interact with `object` until `done` holds for a fresh snapshot, or
    /// give up.
    fn interact(
        &mut self,
        object: &WorldObject,
        done:   &dyn Fn(&WorldSnapshot) -> bool,
    ) -> InteractResult<()>;
}
