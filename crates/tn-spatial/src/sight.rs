//! Straight-line visibility over a collision grid.

use tn_core::Position;

use crate::CollisionGrid;

/// `true` if every tile on the Bresenham line from `a` to `b` (world
/// coordinates, both ends inclusive) is walkable on `grid`.
///
/// Tiles outside the grid count as blocked, so a line leaving the grid is
/// never clear.
pub fn line_of_sight(grid: &CollisionGrid, a: Position, b: Position) -> bool {
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    let sx = if a.x > b.x { -1 } else { 1 };
    let sy = if a.y > b.y { -1 } else { 1 };
    let mut err = dx - dy;
    let mut cur = a;

    loop {
        if !grid.is_walkable(cur) {
            return false;
        }
        if cur == b {
            return true;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            cur.x += sx;
        }
        if e2 < dx {
            err += dx;
            cur.y += sy;
        }
    }
}
