//! Mobile entities and the per-snapshot spatial index over them.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over integer tile positions.  It is bulk-loaded
//! once per snapshot, so the entities-in-path scan and the fixup pass can
//! ask "who is within r tiles of p" without walking the whole entity list.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use tn_core::{EntityId, EntityKind, Position};

// ── Entity ────────────────────────────────────────────────────────────────────

/// One mobile entity (monster, NPC, other player) from the world snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id:       EntityId,
    pub kind:     EntityKind,
    pub position: Position,
    /// Hostile entities are the only ones the entities-in-path scan reports.
    pub hostile:  bool,
}

impl Entity {
    pub fn hostile(id: EntityId, kind: EntityKind, position: Position) -> Self {
        Self { id, kind, position, hostile: true }
    }

    pub fn neutral(id: EntityId, kind: EntityKind, position: Position) -> Self {
        Self { id, kind, position, hostile: false }
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// `[x, y]` point plus the entity's index in [`EntityIndex::entities`].
#[derive(Clone, Debug)]
struct EntityEntry {
    point: [i32; 2],
    slot:  usize,
}

impl RTreeObject for EntityEntry {
    type Envelope = AABB<[i32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for EntityEntry {
    /// Squared Euclidean distance in tiles.
    fn distance_2(&self, point: &[i32; 2]) -> i32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── EntityIndex ───────────────────────────────────────────────────────────────

/// All entities of one snapshot plus an R-tree over their positions.
#[derive(Clone, Default)]
pub struct EntityIndex {
    entities: Vec<Entity>,
    tree:     RTree<EntityEntry>,
}

impl EntityIndex {
    pub fn new(entities: Vec<Entity>) -> Self {
        let entries = entities
            .iter()
            .enumerate()
            .map(|(slot, e)| EntityEntry { point: [e.position.x, e.position.y], slot })
            .collect();
        Self { tree: RTree::bulk_load(entries), entities }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in snapshot order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Entities whose truncated tile distance from `pos` is at most
    /// `radius`, nearest first (ties broken by id).
    pub fn within(&self, pos: Position, radius: i32) -> Vec<&Entity> {
        if radius < 0 {
            return Vec::new();
        }
        // trunc(d) <= r  <=>  d² < (r + 1)²
        let max_d2 = (radius + 1) * (radius + 1) - 1;
        let mut found: Vec<(i32, &Entity)> = self
            .tree
            .locate_within_distance([pos.x, pos.y], max_d2)
            .map(|entry| (entry.distance_2(&[pos.x, pos.y]), &self.entities[entry.slot]))
            .collect();
        found.sort_by_key(|(d2, e)| (*d2, e.id));
        found.into_iter().map(|(_, e)| e).collect()
    }

    /// Closest entity to `pos`, if any.
    pub fn nearest(&self, pos: Position) -> Option<&Entity> {
        self.tree
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|entry| &self.entities[entry.slot])
    }

    /// Every entity of the given kind.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }
}

impl std::fmt::Debug for EntityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.entities).finish()
    }
}

impl FromIterator<Entity> for EntityIndex {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
