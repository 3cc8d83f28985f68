//! World-coordinate tile position and distance helpers.
//!
//! `Position` is an immutable integer value type.  Every grid in the engine
//! stores an offset so that world positions can be translated into local
//! indices; `Position` itself knows nothing about grids.

use std::fmt;
use std::ops::{Add, Sub};

/// A tile position in world coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Euclidean distance in tiles.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Euclidean distance truncated to whole tiles.  This is the distance
    /// used for arrival tolerances and scan radii.
    #[inline]
    pub fn tile_distance(self, other: Position) -> i32 {
        self.distance(other) as i32
    }

    /// Chebyshev (king-move) distance.
    #[inline]
    pub fn chebyshev(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// `true` when `other` is one of the 8 neighbouring tiles.
    #[inline]
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.chebyshev(other) == 1
    }

    /// A position `distance` tiles past `target`, on the ray from `start`
    /// through `target`.  If both points coincide the ray points along +x.
    pub fn beyond(start: Position, target: Position, distance: i32) -> Position {
        let mut dx = f64::from(target.x - start.x);
        let mut dy = f64::from(target.y - start.y);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            dx = 1.0;
            dy = 0.0;
        } else {
            dx /= length;
            dy /= length;
        }
        Position {
            x: target.x + (dx * f64::from(distance)) as i32,
            y: target.y + (dy * f64::from(distance)) as i32,
        }
    }
}

impl Add for Position {
    type Output = Position;
    #[inline]
    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;
    #[inline]
    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
