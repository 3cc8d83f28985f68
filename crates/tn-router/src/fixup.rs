//! Per-region terrain corrections.
//!
//! Some source terrain is simply wrong: a fake corridor that leads nowhere,
//! a floating-platform level that is only traversable by teleporting, a
//! structure that the terrain data reports as floor.  These corrections are
//! data keyed by region and applied to the router's working copy only; the
//! canonical grid is never touched.
//!
//! Positions inside a [`Fixup`] are **region-local** and are translated
//! through the owning region's offset when applied, so they stay correct
//! after the working grid has been widened to a neighbouring region.

use rustc_hash::FxHashMap;

use tn_core::{EntityKind, Position, RegionId};
use tn_spatial::{CollisionGrid, TileClass};
use tn_world::EntityIndex;

/// One terrain correction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fixup {
    /// Force a single tile to `NotWalkable`.
    SealTile(Position),
    /// Force a single tile to `Closed` (passable only with free movement).
    ClosePassage(Position),
    /// While free movement is available, every `NotWalkable` tile becomes
    /// `LowPriority` (levels made of platforms over the void).
    SoftenWallsWhenTeleporting,
    /// Block a square of the given Chebyshev radius around every entity of
    /// `kind` (structures the terrain reports as floor).
    BlockAroundEntity { kind: EntityKind, radius: i32 },
}

impl Fixup {
    /// Apply to `grid`.  `origin` is the world offset of the region the
    /// fixup belongs to.
    pub fn apply(
        &self,
        grid:          &mut CollisionGrid,
        origin:        Position,
        free_movement: bool,
        entities:      &EntityIndex,
    ) {
        match *self {
            Fixup::SealTile(local) => {
                grid.set_at(origin + local, TileClass::NotWalkable);
            }
            Fixup::ClosePassage(local) => {
                grid.set_at(origin + local, TileClass::Closed);
            }
            Fixup::SoftenWallsWhenTeleporting => {
                if !free_movement {
                    return;
                }
                for y in 0..grid.height() {
                    for x in 0..grid.width() {
                        if grid.get(x, y) == TileClass::NotWalkable {
                            grid.set(x, y, TileClass::LowPriority);
                        }
                    }
                }
            }
            Fixup::BlockAroundEntity { kind, radius } => {
                for e in entities.of_kind(kind) {
                    for dy in -radius..=radius {
                        for dx in -radius..=radius {
                            grid.set_at(e.position.offset(dx, dy), TileClass::NotWalkable);
                        }
                    }
                }
            }
        }
    }
}

/// Fixups per region.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixupTable {
    by_region: FxHashMap<RegionId, Vec<Fixup>>,
}

impl FixupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixup for `region` (builder style).
    pub fn with(mut self, region: RegionId, fixup: Fixup) -> Self {
        self.add(region, fixup);
        self
    }

    pub fn add(&mut self, region: RegionId, fixup: Fixup) {
        self.by_region.entry(region).or_default().push(fixup);
    }

    /// Fixups registered for `region` (empty when none).
    pub fn for_region(&self, region: RegionId) -> &[Fixup] {
        self.by_region.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }
}
