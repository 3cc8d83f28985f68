//! Route search against a live world snapshot.
//!
//! # Working grid
//!
//! Every search builds a private [`SearchSpace`]:
//!
//! 1. Clone the current region's canonical grid, or, when the destination
//!    lies outside it, stitch the current region and the neighbour that
//!    contains the destination into one grid spanning their union bounding
//!    box (the soft-penalty halo is re-applied to the combined grid).
//! 2. Apply the [`FixupTable`] entries of every region in the grid.
//! 3. Replace an unwalkable destination by the first walkable tile within
//!    `nearby_walkable_radius`.
//! 4. Overlay world objects (`Object` plus a halo) and entities (`Entity`,
//!    exact tile only) on walkable tiles.
//!
//! Only then is [`PathSearch`] run.  The canonical grids are never mutated.

use std::sync::Arc;

use tracing::debug;

use tn_core::{NavConfig, Position};
use tn_spatial::terrain::apply_halo;
use tn_spatial::{line_of_sight, CollisionGrid, Path, PathSearch, SearchBuffers, SpatialError, TileClass};
use tn_world::{Region, WorldObject, WorldSnapshot};

use crate::{FixupTable, RouterError, RouterResult};

// ── SearchSpace ───────────────────────────────────────────────────────────────

/// The fully overlaid working grid for one search, plus the destination
/// actually searched for (after substitution).
#[derive(Clone, Debug)]
pub struct SearchSpace {
    pub grid: CollisionGrid,
    pub to:   Position,
}

// ── RegionRouter ──────────────────────────────────────────────────────────────

/// Search orchestrator for one agent.
///
/// Owns the agent's [`SearchBuffers`]; never share a router between
/// concurrently running control loops.
#[derive(Debug)]
pub struct RegionRouter {
    cfg:     NavConfig,
    fixups:  FixupTable,
    buffers: SearchBuffers,
}

impl RegionRouter {
    pub fn new(cfg: NavConfig) -> Self {
        Self { cfg, fixups: FixupTable::default(), buffers: SearchBuffers::new() }
    }

    pub fn with_fixups(mut self, fixups: FixupTable) -> Self {
        self.fixups = fixups;
        self
    }

    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.cfg
    }

    // ── Searches ──────────────────────────────────────────────────────────

    /// Route from the agent's position to `to`.
    ///
    /// If the direct search fails, retries once towards the first walkable
    /// tile near `to` in the current region, and reports the original
    /// failure if that fails too.
    pub fn search(&mut self, snap: &WorldSnapshot, to: Position) -> RouterResult<Path> {
        self.search_with_fallback(snap, snap.position, to)
    }

    /// Route between two arbitrary world positions.
    pub fn search_from(
        &mut self,
        snap: &WorldSnapshot,
        from: Position,
        to:   Position,
    ) -> RouterResult<Path> {
        let space = self.search_space(snap, to)?;
        let search = PathSearch::with_config(snap.can_teleport, &self.cfg);
        Ok(search.find(&space.grid, from, space.to, &mut self.buffers)?)
    }

    /// Route to a tile from which `dest` can be engaged rather than reached.
    ///
    /// A walkable (or out-of-region) `dest` is searched directly first.
    /// Otherwise, or if that fails, the current region is scanned in
    /// expanding square rings around `dest` (up to `closest_walkable_range`)
    /// for a plain `Walkable` tile, and the route goes there.
    pub fn search_near(
        &mut self,
        snap: &WorldSnapshot,
        from: Position,
        dest: Position,
    ) -> RouterResult<Path> {
        let region = current_region(snap)?;
        if region.grid.is_walkable(dest) || !region.contains(dest) {
            if let Ok(path) = self.search_with_fallback(snap, from, dest) {
                return Ok(path);
            }
        }

        let grid = &region.grid;
        for dist in 1..self.cfg.closest_walkable_range {
            for dx in -dist..=dist {
                for dy in -dist..=dist {
                    if dx.abs() != dist && dy.abs() != dist {
                        continue;
                    }
                    let candidate = dest.offset(dx, dy);
                    if grid.class_at(candidate) == Some(TileClass::Walkable) {
                        return self.search_from(snap, from, candidate);
                    }
                }
            }
        }
        Err(SpatialError::NoRoute { from, to: dest }.into())
    }

    fn search_with_fallback(
        &mut self,
        snap: &WorldSnapshot,
        from: Position,
        to:   Position,
    ) -> RouterResult<Path> {
        let err = match self.search_from(snap, from, to) {
            Ok(path) => return Ok(path),
            Err(err) => err,
        };
        let nearby = snap
            .current
            .as_ref()
            .and_then(|r| nearby_walkable(&r.grid, to, self.cfg.nearby_walkable_radius));
        match nearby {
            Some(alt) => self.search_from(snap, from, alt).map_err(|_| err),
            None => Err(err),
        }
    }

    // ── Working grid ──────────────────────────────────────────────────────

    /// Build the overlaid working grid for a search towards `to`.
    pub fn search_space(&self, snap: &WorldSnapshot, to: Position) -> RouterResult<SearchSpace> {
        let region = current_region(snap)?;
        let free = snap.can_teleport;

        let (mut grid, neighbour) = if region.contains(to) {
            (region.grid.clone(), None)
        } else {
            let dest = snap
                .neighbours
                .iter()
                .find(|r| r.contains(to))
                .ok_or(RouterError::DestinationRegionNotFound { to })?;
            (self.stitch(region, dest, free), Some(dest))
        };

        for r in std::iter::once(region).chain(neighbour) {
            for fixup in self.fixups.for_region(r.id) {
                fixup.apply(&mut grid, r.offset(), free, &snap.entities);
            }
        }

        let mut to = to;
        if !grid.is_walkable(to) {
            if let Some(alt) = nearby_walkable(&grid, to, self.cfg.nearby_walkable_radius) {
                debug!(target: "tn_router", requested = %to, substitute = %alt, "destination not walkable");
                to = alt;
            }
        }

        self.overlay_dynamic(&mut grid, snap);
        Ok(SearchSpace { grid, to })
    }

    /// Union bounding box of both regions, both grids copied in, halo
    /// re-applied across the seam.
    fn stitch(&self, origin: &Region, dest: &Region, free_movement: bool) -> CollisionGrid {
        let min = Position::new(
            origin.offset().x.min(dest.offset().x),
            origin.offset().y.min(dest.offset().y),
        );
        let (o_end, d_end) = (origin.grid.end(), dest.grid.end());
        let max = Position::new(o_end.x.max(d_end.x), o_end.y.max(d_end.y));

        let mut grid = CollisionGrid::blocked(min, max.x - min.x, max.y - min.y);
        grid.blit(&origin.grid);
        grid.blit(&dest.grid);
        apply_halo(&mut grid, self.cfg.halo_radius, free_movement);

        debug!(
            target: "tn_router",
            from_region = %origin.id, to_region = %dest.id,
            width = grid.width(), height = grid.height(),
            "stitched regions"
        );
        grid
    }

    fn overlay_dynamic(&self, grid: &mut CollisionGrid, snap: &WorldSnapshot) {
        for o in &snap.objects {
            if !grid.is_walkable(o.position) {
                continue;
            }
            grid.set_at(o.position, TileClass::Object);
            let local = grid.relative_position(o.position);
            grid.soften_around(local.x, local.y, self.cfg.halo_radius);
        }
        for e in snap.entities.iter() {
            if grid.is_walkable(e.position) {
                grid.set_at(e.position, TileClass::Entity);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// A closed door standing between `a` and `b`.
    ///
    /// When a route exists, the first closed door within
    /// `door_path_padding` of any route tile.  When none does, the closest
    /// closed door near `a`, since it is the likely reason.
    pub fn has_door_between<'s>(
        &mut self,
        snap: &'s WorldSnapshot,
        a:    Position,
        b:    Position,
    ) -> Option<&'s WorldObject> {
        match self.search_from(snap, a, b) {
            Ok(path) => snap
                .objects
                .iter()
                .find(|o| o.is_closed_door() && path.intersects(o.position, self.cfg.door_path_padding)),
            Err(_) => self.closest_door(snap, a),
        }
    }

    /// Closest closed door strictly within `door_vicinity` of `pos`.
    pub fn closest_door<'s>(&self, snap: &'s WorldSnapshot, pos: Position) -> Option<&'s WorldObject> {
        closest(snap, pos, self.cfg.door_vicinity, WorldObject::is_closed_door)
    }

    /// Closest intact destructible strictly within `destructible_vicinity`.
    pub fn closest_destructible<'s>(
        &self,
        snap: &'s WorldSnapshot,
        pos:  Position,
    ) -> Option<&'s WorldObject> {
        closest(snap, pos, self.cfg.destructible_vicinity, WorldObject::is_intact_destructible)
    }

    /// Straight-line visibility on the current region's canonical grid.
    /// `false` while the region is not loaded.
    pub fn line_of_sight(&self, snap: &WorldSnapshot, a: Position, b: Position) -> bool {
        snap.current.as_ref().is_some_and(|r| line_of_sight(&r.grid, a, b))
    }

    /// Truncated Euclidean distance from the agent to `pos`.
    #[inline]
    pub fn distance_from_agent(&self, snap: &WorldSnapshot, pos: Position) -> i32 {
        snap.distance_from_agent(pos)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn current_region(snap: &WorldSnapshot) -> RouterResult<&Arc<Region>> {
    snap.current.as_ref().ok_or(RouterError::RegionNotLoaded(snap.region))
}

/// First walkable tile in the squares of radius 1..=`max_radius` around
/// `target` (column-major within each square).  Never `target` itself.
fn nearby_walkable(grid: &CollisionGrid, target: Position, max_radius: i32) -> Option<Position> {
    for radius in 1..=max_radius {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let pos = target.offset(dx, dy);
                if grid.is_walkable(pos) {
                    return Some(pos);
                }
            }
        }
    }
    None
}

fn closest<'s>(
    snap:   &'s WorldSnapshot,
    pos:    Position,
    within: f64,
    pred:   fn(&WorldObject) -> bool,
) -> Option<&'s WorldObject> {
    let mut best: Option<(&WorldObject, f64)> = None;
    for o in snap.objects.iter().filter(|o| pred(o)) {
        let d = pos.distance(o.position);
        if d < within && best.is_none_or(|(_, bd)| d < bd) {
            best = Some((o, d));
        }
    }
    best.map(|(o, _)| o)
}
