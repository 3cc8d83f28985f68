//! Terrain construction: raw walkability matrix → canonical collision grid.
//!
//! # Passes
//!
//! `TerrainBuilder::build` runs, in order:
//!
//! 1. **Teleport bridging** (non-town only): thin walls with open floor on
//!    both sides become `TeleportOnly`, so a free-moving agent can hop over
//!    them.
//! 2. **Soft-penalty halo**: `Walkable` tiles within `halo_radius` of a
//!    `NotWalkable` tile (or a `TeleportOnly` tile, when free movement is
//!    unavailable) become `LowPriority`.
//! 3. **Passage thickening**: floor tiles with ≥ 3 blocked cardinal
//!    neighbours become `TeleportOnly`; diagonal corner-cutting gaps are
//!    closed the same way.
//! 4. **Exit drilling** (non-town only): `TeleportOnly` tiles within
//!    `exit_drill_radius` of a known region exit are re-opened.
//!
//! Passes 1 and 3 mutate in place while scanning row-major, so a tile
//! reclassified earlier in a pass is visible to later tiles of that pass.

use tn_core::{NavConfig, Position};

use crate::{CollisionGrid, SpatialError, SpatialResult, TileClass};

/// Build a canonical [`CollisionGrid`] from raw terrain, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use tn_core::Position;
/// use tn_spatial::{TerrainBuilder, TileClass};
///
/// let grid = TerrainBuilder::from_ascii(Position::new(0, 0), "
///     ######
///     #...#
///     ######
/// ")
/// .unwrap()
/// .build();
/// assert_eq!(grid.width(), 5);
/// assert_eq!(grid.get(0, 0), TileClass::NotWalkable);
/// ```
#[derive(Clone, Debug)]
pub struct TerrainBuilder {
    offset:          Position,
    width:           i32,
    height:          i32,
    walkable:        Vec<bool>,
    exits:           Vec<Position>,
    town:            bool,
    free_movement:   bool,
    bridging:        bool,
    halo_radius:     i32,
    drill_radius:    i32,
    bridge_distance: i32,
}

impl TerrainBuilder {
    /// Start from a row-major walkability vector of `width × height` tiles.
    pub fn new(
        offset:   Position,
        width:    i32,
        height:   i32,
        walkable: Vec<bool>,
    ) -> SpatialResult<Self> {
        let expected = (width.max(0) * height.max(0)) as usize;
        if walkable.len() != expected {
            return Err(SpatialError::Dimensions { expected, got: walkable.len() });
        }
        let defaults = NavConfig::default();
        Ok(Self {
            offset,
            width: width.max(0),
            height: height.max(0),
            walkable,
            exits: Vec::new(),
            town: false,
            free_movement: false,
            bridging: true,
            halo_radius: defaults.halo_radius,
            drill_radius: defaults.exit_drill_radius,
            bridge_distance: defaults.teleport_bridge_distance,
        })
    }

    /// Start from a matrix of rows (`rows[y][x]`).  Rows must share one length.
    pub fn from_rows(offset: Position, rows: &[Vec<bool>]) -> SpatialResult<Self> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, Vec::len);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(SpatialError::RaggedRow { row, expected: width, got: r.len() });
        }
        let width = width as i32;
        let walkable: Vec<bool> = rows.iter().flatten().copied().collect();
        Self::new(offset, width, height, walkable)
    }

    /// Start from an ASCII drawing: `#` is a wall, anything else is floor.
    /// Blank lines and indentation are ignored.
    pub fn from_ascii(offset: Position, text: &str) -> SpatialResult<Self> {
        let rows: Vec<Vec<bool>> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().map(|c| c != '#').collect())
            .collect();
        Self::from_rows(offset, &rows)
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Known region-exit positions (world coordinates) to keep open.
    pub fn exits(mut self, exits: impl IntoIterator<Item = Position>) -> Self {
        self.exits.extend(exits);
        self
    }

    /// Towns skip teleport bridging and exit drilling.
    pub fn town(mut self, town: bool) -> Self {
        self.town = town;
        self
    }

    /// When `true`, the halo ignores `TeleportOnly` tiles.
    pub fn free_movement(mut self, free: bool) -> Self {
        self.free_movement = free;
        self
    }

    /// Enable or disable the teleport bridging pass.
    pub fn teleport_bridging(mut self, enabled: bool) -> Self {
        self.bridging = enabled;
        self
    }

    /// Take radii from a [`NavConfig`].
    pub fn with_config(mut self, cfg: &NavConfig) -> Self {
        self.halo_radius = cfg.halo_radius;
        self.drill_radius = cfg.exit_drill_radius;
        self.bridge_distance = cfg.teleport_bridge_distance;
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Consume the builder and produce the canonical grid.
    pub fn build(self) -> CollisionGrid {
        let tiles: Vec<TileClass> = self
            .walkable
            .iter()
            .map(|&w| if w { TileClass::Walkable } else { TileClass::NotWalkable })
            .collect();
        let mut grid = CollisionGrid::blocked(self.offset, self.width, self.height);
        for (i, t) in tiles.into_iter().enumerate() {
            let (x, y) = (i as i32 % self.width, i as i32 / self.width);
            grid.set(x, y, t);
        }

        if !self.town && self.bridging && self.bridge_distance > 0 {
            bridge_thin_walls(&mut grid, self.bridge_distance);
        }
        apply_halo(&mut grid, self.halo_radius, self.free_movement);
        thicken_passages(&mut grid);
        fill_diagonal_gaps(&mut grid);
        if !self.town {
            drill_exits(&mut grid, &self.exits, self.drill_radius);
        }
        grid
    }
}

// ── Passes ────────────────────────────────────────────────────────────────────

/// Soft-penalty halo around every obstacle tile.
///
/// Also used by the region router when it merges two regions' grids.
pub fn apply_halo(grid: &mut CollisionGrid, radius: i32, free_movement: bool) {
    if radius <= 0 {
        return;
    }
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let t = grid.get(x, y);
            if t == TileClass::NotWalkable || (!free_movement && t == TileClass::TeleportOnly) {
                grid.soften_around(x, y, radius);
            }
        }
    }
}

/// Single-tile pinch points become `TeleportOnly`.
fn thicken_passages(grid: &mut CollisionGrid) {
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            if !grid.get(x, y).is_floor() {
                continue;
            }
            let blocked = [(0, -1), (0, 1), (-1, 0), (1, 0)]
                .iter()
                .filter(|(dx, dy)| grid.get(x + dx, y + dy) == TileClass::NotWalkable)
                .count();
            if blocked >= 3 {
                grid.set(x, y, TileClass::TeleportOnly);
            }
        }
    }
}

/// Close diagonal gaps that would let a walker cut through a wall corner.
fn fill_diagonal_gaps(grid: &mut CollisionGrid) {
    let solid = |t: TileClass| matches!(t, TileClass::NotWalkable | TileClass::TeleportOnly);

    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let up_blocked = grid.get(x, y - 1) == TileClass::NotWalkable;

            // Top-left ↔ bottom-right.
            if solid(grid.get(x - 1, y - 1))
                && solid(grid.get(x + 1, y + 1))
                && grid.get(x, y).is_floor()
                && up_blocked
                && grid.get(x - 1, y) == TileClass::NotWalkable
            {
                grid.set(x, y, TileClass::TeleportOnly);
            }

            // Top-right ↔ bottom-left.
            if solid(grid.get(x + 1, y - 1))
                && solid(grid.get(x - 1, y + 1))
                && grid.get(x, y).is_floor()
                && up_blocked
                && grid.get(x + 1, y) == TileClass::NotWalkable
            {
                grid.set(x, y, TileClass::TeleportOnly);
            }
        }
    }
}

/// Re-open `TeleportOnly` tiles around known exits.
fn drill_exits(grid: &mut CollisionGrid, exits: &[Position], radius: i32) {
    for &exit in exits {
        let c = grid.relative_position(exit);
        if !grid.in_bounds(c.x, c.y) {
            continue;
        }
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (x, y) = (c.x + dx, c.y + dy);
                if grid.get_checked(x, y) == Some(TileClass::TeleportOnly) {
                    grid.set(x, y, TileClass::Walkable);
                }
            }
        }
    }
}

/// Mark thin walls crossable by free movement.
///
/// For every interior obstacle tile, look along the row, the column
/// (`distance` tiles each way) and both diagonals (`distance / 2` each way).
/// If open floor exists on both sides, the contiguous wall run through the
/// tile on that axis becomes `TeleportOnly`.
fn bridge_thin_walls(grid: &mut CollisionGrid, distance: i32) {
    const AXES: [(i32, i32, bool); 4] = [(1, 0, false), (0, 1, false), (1, 1, true), (1, -1, true)];

    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let t = grid.get(x, y);
            if t != TileClass::NotWalkable && t != TileClass::TeleportOnly {
                continue;
            }
            for &(sx, sy, diagonal) in &AXES {
                let reach = if diagonal { distance / 2 } else { distance };
                let open_before = (1..=reach)
                    .any(|k| grid.get_checked(x - sx * k, y - sy * k) == Some(TileClass::Walkable));
                let open_after = (1..=reach)
                    .any(|k| grid.get_checked(x + sx * k, y + sy * k) == Some(TileClass::Walkable));
                if !(open_before && open_after) {
                    continue;
                }
                grid.set(x, y, TileClass::TeleportOnly);
                for dir in [-1, 1] {
                    for k in 1..=reach {
                        let (tx, ty) = (x + sx * k * dir, y + sy * k * dir);
                        match grid.get_checked(tx, ty) {
                            Some(TileClass::NotWalkable) => grid.set(tx, ty, TileClass::TeleportOnly),
                            Some(TileClass::TeleportOnly) => {}
                            _ => break,
                        }
                    }
                }
            }
        }
    }
}
