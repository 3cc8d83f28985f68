//! `MoveTo` parameters and successful outcomes.

use tn_core::Position;
use tn_world::Entity;

/// Extra predicate an entity must satisfy to count for the entities-in-path
/// scan.  A plain function: filters carry no state.
pub type EntityFilter = fn(&Entity) -> bool;

fn any_entity(_: &Entity) -> bool {
    true
}

// ── MoveRequest ───────────────────────────────────────────────────────────────

/// One `move_to` call: a destination plus options.
///
/// ```
/// use tn_core::Position;
/// use tn_motion::MoveRequest;
///
/// let req = MoveRequest::to(Position::new(120, 48))
///     .tolerance(2)
///     .ignore_entities();
/// assert_eq!(req.tolerance, Some(2));
/// ```
#[derive(Clone, Debug)]
pub struct MoveRequest {
    pub destination:         Position,
    /// Arrival tolerance in tiles; `None` uses `NavConfig::finish_distance`.
    pub tolerance:           Option<i32>,
    /// Inclusive `(min, max)` distance band that also counts as arrival.
    pub stationary:          Option<(i32, i32)>,
    /// Skip the entities-in-path scan entirely.
    pub ignore_entities:     bool,
    /// Skip striking destructibles and opening nearby doors while blocked.
    pub ignore_objects:      bool,
    pub entity_filter:       EntityFilter,
    /// Scan radius override.  Setting it also keeps the scan running while
    /// the agent can teleport.
    pub clear_path_override: Option<i32>,
}

impl MoveRequest {
    pub fn to(destination: Position) -> Self {
        Self {
            destination,
            tolerance:           None,
            stationary:          None,
            ignore_entities:     false,
            ignore_objects:      false,
            entity_filter:       any_entity,
            clear_path_override: None,
        }
    }

    pub fn tolerance(mut self, tiles: i32) -> Self {
        self.tolerance = Some(tiles);
        self
    }

    pub fn stationary(mut self, min: i32, max: i32) -> Self {
        self.stationary = Some((min, max));
        self
    }

    pub fn ignore_entities(mut self) -> Self {
        self.ignore_entities = true;
        self
    }

    pub fn ignore_objects(mut self) -> Self {
        self.ignore_objects = true;
        self
    }

    pub fn entity_filter(mut self, filter: EntityFilter) -> Self {
        self.entity_filter = filter;
        self
    }

    pub fn clear_path(mut self, radius: i32) -> Self {
        self.clear_path_override = Some(radius);
        self
    }

    /// `true` if `distance` lies inside the stationary band.
    #[inline]
    pub(crate) fn in_stationary_band(&self, distance: i32) -> bool {
        self.stationary.is_some_and(|(min, max)| (min..=max).contains(&distance))
    }
}

// ── MoveOutcome ───────────────────────────────────────────────────────────────

/// How a successful `move_to` ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveOutcome {
    /// Within tolerance of the destination (or twice that while blocked).
    Arrived,
    WithinStationaryBand,
    /// The agent entered another region and its collision data loaded.
    RegionChanged,
    /// The router returned a route with no positions.
    EmptyPath,
}
