//! Weighted A* over an 8-connected collision grid.
//!
//! # Cost model
//!
//! | Tile           | Step cost                                 |
//! |----------------|-------------------------------------------|
//! | `Walkable`     | 1                                         |
//! | `Object`       | 4 (soft blocker)                          |
//! | `Entity`       | 16                                        |
//! | `LowPriority`  | 20                                        |
//! | `TeleportOnly` | 1 with free movement, impassable otherwise |
//! | `Closed`       | 1 with free movement, impassable otherwise |
//! | `NotWalkable`  | impassable                                |
//!
//! The heuristic is octile distance.  Queue priority is
//! `cost + 0.5 × heuristic`, which keeps routes close to the straight line
//! towards the goal.  Route shape depends on this factor.
//!
//! # Buffers
//!
//! The search runs on every control-loop tick, so the dense cost and
//! predecessor arrays live in [`SearchBuffers`], owned by the caller and
//! reused across calls.  They are only reallocated when the grid size
//! changes; otherwise just the cost array is reset.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tn_core::{NavConfig, Position};
use tracing::trace;

use crate::{CollisionGrid, Path, SpatialError, SpatialResult, TileClass};

/// Neighbour offsets: 4 cardinal, then 4 diagonal.
const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

const UNVISITED: u32 = u32::MAX;

// ── SearchBuffers ─────────────────────────────────────────────────────────────

/// Reusable scratch arrays for [`PathSearch`], indexed like the grid
/// (`y * width + x`).
///
/// One instance per agent: buffers are never shared between concurrently
/// running control loops.
#[derive(Debug, Default)]
pub struct SearchBuffers {
    cost:      Vec<u32>,
    came_from: Vec<u32>,
    width:     i32,
    height:    i32,
}

impl SearchBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the buffers for `width × height` and reset every cost.
    fn prepare(&mut self, width: i32, height: i32) {
        let size = (width * height) as usize;
        if self.cost.len() != size || self.width != width || self.height != height {
            self.cost = vec![UNVISITED; size];
            self.came_from = vec![0; size];
            self.width = width;
            self.height = height;
        } else {
            self.cost.fill(UNVISITED);
        }
    }

    /// Current allocation size in tiles (for tests and diagnostics).
    pub fn capacity(&self) -> usize {
        self.cost.len()
    }
}

// ── PathSearch ────────────────────────────────────────────────────────────────

/// Search parameters for one locomotion mode.
#[derive(Copy, Clone, Debug)]
pub struct PathSearch {
    /// Whether the agent can currently teleport.  Without it `TeleportOnly`
    /// and `Closed` tiles are impassable.
    pub free_movement: bool,
    /// Routes may not cross more than this many consecutive `TeleportOnly`
    /// tiles.
    pub max_teleport_streak: u32,
}

impl PathSearch {
    pub fn new(free_movement: bool) -> Self {
        Self {
            free_movement,
            max_teleport_streak: NavConfig::default().max_teleport_streak,
        }
    }

    pub fn with_config(free_movement: bool, cfg: &NavConfig) -> Self {
        Self { free_movement, max_teleport_streak: cfg.max_teleport_streak }
    }

    /// Find a route from `from` to `to` (both world coordinates).
    ///
    /// # Errors
    ///
    /// All errors mean "not found": an empty grid, an endpoint outside the
    /// grid, or an unreachable goal.
    pub fn find(
        &self,
        grid:    &CollisionGrid,
        from:    Position,
        to:      Position,
        buffers: &mut SearchBuffers,
    ) -> SpatialResult<Path> {
        if grid.is_empty() {
            return Err(SpatialError::EmptyGrid);
        }
        let start = grid.relative_position(from);
        let goal = grid.relative_position(to);
        for (world, local) in [(from, start), (to, goal)] {
            if !grid.in_bounds(local.x, local.y) {
                return Err(SpatialError::OutOfBounds { pos: world });
            }
        }

        buffers.prepare(grid.width(), grid.height());
        let start_idx = grid.index(start.x, start.y);
        let goal_idx = grid.index(goal.x, goal.y);
        buffers.cost[start_idx] = 0;

        // Min-heap of (priority, cost, tile index, teleport streak).
        // Reverse makes BinaryHeap (max) behave as a min-heap; the trailing
        // fields give deterministic tie-breaking.
        let mut heap: BinaryHeap<Reverse<(u32, u32, u32, u32)>> = BinaryHeap::with_capacity(256);
        heap.push(Reverse((heuristic(start, goal), 0, start_idx as u32, 0)));

        while let Some(Reverse((_, cost, idx, streak))) = heap.pop() {
            let idx = idx as usize;

            // Skip stale heap entries.
            if cost > buffers.cost[idx] {
                continue;
            }

            if idx == goal_idx {
                let path = reconstruct(grid, &buffers.came_from, start_idx, goal_idx);
                trace!(target: "tn_spatial::search", %from, %to, cost, len = path.len(), "route found");
                return Ok(path);
            }

            let (x, y) = (idx as i32 % grid.width(), idx as i32 / grid.width());
            for (dx, dy) in DIRECTIONS {
                let (nx, ny) = (x + dx, y + dy);
                if self.is_blocked(grid, nx, ny) {
                    continue;
                }
                // No corner cutting: both orthogonal tiles must be open.
                if dx != 0 && dy != 0
                    && (self.is_blocked(grid, x + dx, y) || self.is_blocked(grid, x, y + dy))
                {
                    continue;
                }

                let tile = grid.get(nx, ny);
                let next_streak = if tile == TileClass::TeleportOnly { streak + 1 } else { 0 };
                if next_streak > self.max_teleport_streak {
                    continue;
                }
                let Some(step) = self.step_cost(tile) else {
                    continue;
                };

                let n_idx = grid.index(nx, ny);
                let new_cost = cost.saturating_add(step);
                if new_cost < buffers.cost[n_idx] {
                    buffers.cost[n_idx] = new_cost;
                    buffers.came_from[n_idx] = idx as u32;
                    let h = heuristic(Position::new(nx, ny), goal);
                    let priority = new_cost.saturating_add((0.5 * f64::from(h)) as u32);
                    heap.push(Reverse((priority, new_cost, n_idx as u32, next_streak)));
                }
            }
        }

        trace!(target: "tn_spatial::search", %from, %to, "no route");
        Err(SpatialError::NoRoute { from, to })
    }

    /// `true` when `(x, y)` cannot be entered at all.
    #[inline]
    fn is_blocked(&self, grid: &CollisionGrid, x: i32, y: i32) -> bool {
        match grid.get_checked(x, y) {
            None | Some(TileClass::NotWalkable) => true,
            Some(TileClass::TeleportOnly | TileClass::Closed) => !self.free_movement,
            Some(_) => false,
        }
    }

    /// Cost of stepping onto a tile; `None` for impassable.
    #[inline]
    fn step_cost(&self, tile: TileClass) -> Option<u32> {
        match tile {
            TileClass::Walkable => Some(1),
            TileClass::Object => Some(4),
            TileClass::Entity => Some(16),
            TileClass::LowPriority => Some(20),
            TileClass::TeleportOnly | TileClass::Closed => self.free_movement.then_some(1),
            TileClass::NotWalkable => None,
        }
    }
}

/// Octile distance `dx + dy + (√2 − 2)·min(dx, dy)`, truncated.
#[inline]
fn heuristic(a: Position, b: Position) -> u32 {
    let dx = f64::from((a.x - b.x).abs());
    let dy = f64::from((a.y - b.y).abs());
    (dx + dy + (std::f64::consts::SQRT_2 - 2.0) * dx.min(dy)) as u32
}

/// Walk the predecessor array from goal to start in two passes: count the
/// emitted positions, then fill a pre-sized vector back to front.
fn reconstruct(grid: &CollisionGrid, came_from: &[u32], start: usize, goal: usize) -> Path {
    let position_of = |idx: usize| {
        let local = Position::new(idx as i32 % grid.width(), idx as i32 / grid.width());
        grid.world_position(local)
    };
    let emitted = |idx: usize| grid.tiles()[idx] != TileClass::TeleportOnly;

    let mut len = 1; // start
    let mut cur = goal;
    while cur != start {
        if emitted(cur) {
            len += 1;
        }
        cur = came_from[cur] as usize;
    }

    let mut positions = vec![Position::default(); len];
    let mut i = len - 1;
    let mut cur = goal;
    while cur != start {
        if emitted(cur) {
            positions[i] = position_of(cur);
            i -= 1;
        }
        cur = came_from[cur] as usize;
    }
    positions[0] = position_of(start);
    Path::new(positions)
}
