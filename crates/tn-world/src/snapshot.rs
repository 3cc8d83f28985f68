//! The read-only world view the engine receives every tick.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tn_core::{Latency, ObjectId, Position, RegionId};

use crate::{EntityIndex, Region, WorldObject};

/// Persistent movement-enabling abilities the executor may switch on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ability {
    /// Free movement: instantaneous relocation along a path.
    Teleport,
    /// Walking speed aura.
    Vigor,
    /// Offensive aura some walkers prefer to keep up while moving.
    Conviction,
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ability::Teleport => "teleport",
            Ability::Vigor => "vigor",
            Ability::Conviction => "conviction",
        };
        f.write_str(name)
    }
}

/// Everything the engine is allowed to know about the world at one instant.
///
/// Produced by a [`WorldSensor`](crate::WorldSensor); the engine never
/// mutates it.  Region grids are shared behind `Arc`s, so cloning a snapshot
/// never copies a grid.
#[derive(Clone, Debug, Default)]
pub struct WorldSnapshot {
    /// Agent position in world coordinates.
    pub position:         Position,
    /// Region the agent currently stands in.
    pub region:           RegionId,
    /// That region's data, or `None` while it is still loading.
    pub current:          Option<Arc<Region>>,
    /// Regions adjacent to the current one whose data is available.
    pub neighbours:       Vec<Arc<Region>>,
    pub entities:         EntityIndex,
    pub objects:          Vec<WorldObject>,
    pub latency:          Latency,
    /// Set when the caller wants the current move abandoned.
    pub interrupt:        Option<String>,
    /// Free movement (teleport) is available right now.
    pub can_teleport:     bool,
    /// Activation delay of one teleport.
    pub cast_duration:    Duration,
    /// The agent is held in place by something it did not choose (stun,
    /// freeze).  Stuck detection is suspended while set.
    pub immobilized:      bool,
    pub active_abilities: Vec<Ability>,
    /// Abilities the agent has bound and can activate.
    pub bound_abilities:  Vec<Ability>,
}

impl WorldSnapshot {
    /// A snapshot of an agent standing at `position` in a loaded region.
    pub fn in_region(region: Arc<Region>, position: Position) -> Self {
        Self {
            position,
            region: region.id,
            current: Some(region),
            ..Self::default()
        }
    }

    /// `true` once the current region's collision data is available.
    #[inline]
    pub fn region_loaded(&self) -> bool {
        self.current.as_ref().is_some_and(|r| r.id == self.region)
    }

    #[inline]
    pub fn in_town(&self) -> bool {
        self.current.as_ref().is_some_and(|r| r.town)
    }

    /// Truncated Euclidean distance from the agent to `pos`, in tiles.
    #[inline]
    pub fn distance_from_agent(&self, pos: Position) -> i32 {
        self.position.tile_distance(pos)
    }

    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn neighbour(&self, id: RegionId) -> Option<&Arc<Region>> {
        self.neighbours.iter().find(|r| r.id == id)
    }

    #[inline]
    pub fn is_active(&self, ability: Ability) -> bool {
        self.active_abilities.contains(&ability)
    }

    #[inline]
    pub fn is_bound(&self, ability: Ability) -> bool {
        self.bound_abilities.contains(&ability)
    }
}
