//! A small in-memory world: two adjoining regions, a door, a barrel and
//! whatever monsters the scenario places.
//!
//! Commands take effect instantly: a walk lands on the last waypoint the
//! budget allows, a teleport lands on the end of the path.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use tn_core::{EntityId, EntityKind, Latency, NavConfig, ObjectId, Position, RegionId};
use tn_spatial::{Path, TerrainBuilder};
use tn_world::{
    Ability, Entity, EntityIndex, InteractError, InteractResult, Locomotion, ObjectInteraction,
    ObjectKind, Region, RegionCatalog, WorldObject, WorldSensor, WorldSnapshot,
};

pub const CRYPT: RegionId = RegionId(1);
pub const HALL: RegionId = RegionId(2);

pub const DOOR: ObjectId = ObjectId(10);
pub const BARREL: ObjectId = ObjectId(11);

pub const SKELETON: EntityKind = EntityKind(1);
pub const MERCHANT: EntityKind = EntityKind(2);

// 30 × 12 at (0, 0).  The inner wall at x = 13 has a one-tile gap at
// (13, 5) where the door stands; the east side opens into the hall.
const CRYPT_MAP: &str = "
    ##############################
    #............#...............#
    #............#...............#
    #............#...............#
    #............#.......###.....#
    #............................#
    #............#.......###.....#
    #............#...............#
    #............#................
    #............#................
    #............#...............#
    ##############################
";

// 20 × 12 at (30, 0).
const HALL_MAP: &str = "
    ####################
    #..................#
    #..................#
    #......#####.......#
    #..................#
    #..................#
    #..................#
    #..................#
    ...................#
    ...................#
    #..................#
    ####################
";

/// Build (or fetch from `catalog`) both arena regions.
pub fn arena_regions(catalog: &mut RegionCatalog, cfg: &NavConfig) -> Result<Vec<Arc<Region>>> {
    let crypt_terrain = TerrainBuilder::from_ascii(Position::new(0, 0), CRYPT_MAP)?;
    let hall_terrain = TerrainBuilder::from_ascii(Position::new(30, 0), HALL_MAP)?;

    let crypt = catalog.get_or_build(CRYPT, || {
        let exits = vec![Position::new(29, 8), Position::new(29, 9)];
        Region::from_terrain(CRYPT, crypt_terrain, exits, false, cfg)
    });
    let hall = catalog.get_or_build(HALL, || {
        let exits = vec![Position::new(30, 8), Position::new(30, 9)];
        Region::from_terrain(HALL, hall_terrain, exits, false, cfg)
    });
    Ok(vec![crypt, hall])
}

// ── ArenaWorld ────────────────────────────────────────────────────────────────

/// One agent in the arena.  Implements every collaborator seam.
pub struct ArenaWorld {
    regions:          Vec<Arc<Region>>,
    pub region:       RegionId,
    pub position:     Position,
    pub objects:      Vec<WorldObject>,
    pub entities:     Vec<Entity>,
    pub can_teleport: bool,
    pub bound:        Vec<Ability>,
    active:           Vec<Ability>,
    pub latency:      Latency,
    /// Commands issued so far.
    pub commands:     usize,
}

impl ArenaWorld {
    pub fn new(regions: Vec<Arc<Region>>, start: Position) -> Self {
        let region = regions
            .iter()
            .find(|r| r.contains(start))
            .map_or(RegionId::INVALID, |r| r.id);
        Self {
            regions,
            region,
            position: start,
            objects: vec![
                WorldObject::new(DOOR, ObjectKind::Door, Position::new(13, 5)),
                WorldObject::new(BARREL, ObjectKind::Destructible, Position::new(20, 8)),
            ],
            entities: vec![Entity::neutral(EntityId(1), MERCHANT, Position::new(5, 2))],
            can_teleport: false,
            bound: vec![Ability::Vigor],
            active: Vec::new(),
            latency: Latency(80),
            commands: 0,
        }
    }

    pub fn spawn(&mut self, id: u32, kind: EntityKind, at: Position) {
        self.entities.push(Entity::hostile(EntityId(id), kind, at));
    }

    pub fn kill_hostiles(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !e.hostile);
        before - self.entities.len()
    }

    pub fn door_open(&self) -> bool {
        self.objects.iter().any(|o| o.id == DOOR && !o.selectable)
    }

    fn snapshot(&self) -> WorldSnapshot {
        let current = self.regions.iter().find(|r| r.id == self.region).cloned();
        let neighbours = self.regions.iter().filter(|r| r.id != self.region).cloned().collect();
        WorldSnapshot {
            position: self.position,
            region: self.region,
            current,
            neighbours,
            entities: EntityIndex::new(self.entities.clone()),
            objects: self.objects.clone(),
            latency: self.latency,
            can_teleport: self.can_teleport,
            cast_duration: Duration::from_millis(250),
            active_abilities: self.active.clone(),
            bound_abilities: self.bound.clone(),
            ..WorldSnapshot::default()
        }
    }

    fn relocate(&mut self, to: Position) {
        self.position = to;
        if let Some(r) = self.regions.iter().find(|r| r.contains(to)) {
            if r.id != self.region {
                debug!(target: "arena", from = %self.region, to = %r.id, "crossed into region");
                self.region = r.id;
            }
        }
    }
}

impl WorldSensor for ArenaWorld {
    fn refresh(&mut self) -> WorldSnapshot {
        self.snapshot()
    }
}

impl Locomotion for ArenaWorld {
    fn walk_through(&mut self, path: &Path, budget: usize) {
        self.commands += 1;
        if let Some(to) = path.waypoint_within(budget) {
            self.relocate(to);
        }
    }

    fn teleport_along(&mut self, path: &Path) {
        self.commands += 1;
        if let Some(to) = path.to() {
            self.relocate(to);
        }
    }

    fn nudge(&mut self, target: Position) {
        self.commands += 1;
        let open = self
            .regions
            .iter()
            .any(|r| r.id == self.region && r.grid.is_walkable(target));
        if open {
            self.relocate(target);
        }
    }

    fn activate_ability(&mut self, ability: Ability) {
        self.commands += 1;
        if !self.active.contains(&ability) {
            self.active.push(ability);
        }
    }

    fn strike(&mut self, object: &WorldObject) {
        self.commands += 1;
        self.objects.retain(|o| o.id != object.id);
    }
}

impl ObjectInteraction for ArenaWorld {
    fn interact(
        &mut self,
        object: &WorldObject,
        done:   &dyn Fn(&WorldSnapshot) -> bool,
    ) -> InteractResult<()> {
        self.commands += 1;
        let Some(target) = self.objects.iter_mut().find(|o| o.id == object.id) else {
            return Err(InteractError::ObjectNotFound(object.id));
        };
        if target.kind == ObjectKind::Door {
            target.selectable = false;
        }
        if done(&self.snapshot()) {
            Ok(())
        } else {
            Err(InteractError::Timeout { id: object.id, attempts: 1 })
        }
    }
}
