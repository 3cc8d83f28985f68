//! The result of a path search.

use tn_core::Position;

/// An ordered route in **world** coordinates, from the search start to its
/// goal inclusive.
///
/// `TeleportOnly` tiles the search passed through are not part of the path:
/// they let the search cross pinch points but are never real stopping
/// points.  A `Path` is immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Path {
    positions: Vec<Position>,
}

impl Path {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }

    /// First position (the search start).
    #[inline]
    pub fn from(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    /// Last position (the search goal).
    #[inline]
    pub fn to(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// `true` if any path position lies within `padding` tiles (Euclidean)
    /// of `pos`.
    pub fn intersects(&self, pos: Position, padding: f64) -> bool {
        self.positions.iter().any(|p| p.distance(pos) <= padding)
    }

    /// The leading segment a single walk command may consume: the start plus
    /// at most `budget` further positions.  A zero budget means "no limit".
    pub fn prefix_within(&self, budget: usize) -> &[Position] {
        if budget == 0 {
            return &self.positions;
        }
        let end = (budget + 1).min(self.positions.len());
        &self.positions[..end]
    }

    /// Last position of [`prefix_within`](Self::prefix_within).
    pub fn waypoint_within(&self, budget: usize) -> Option<Position> {
        self.prefix_within(budget).last().copied()
    }

    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}
