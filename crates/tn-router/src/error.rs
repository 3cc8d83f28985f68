//! Router error type.

use thiserror::Error;

use tn_core::{Position, RegionId};
use tn_spatial::SpatialError;

/// Errors produced by [`RegionRouter`](crate::RegionRouter).
///
/// All of them mean "no route right now"; the motion controller maps them
/// to its no-path fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The destination is outside the current region and no loaded
    /// neighbouring region contains it.
    #[error("no loaded region adjacent to the current one contains {to}")]
    DestinationRegionNotFound { to: Position },

    /// The agent's current region has no collision data yet.
    #[error("collision data for {0} is not loaded")]
    RegionNotLoaded(RegionId),

    #[error(transparent)]
    Search(#[from] SpatialError),
}

pub type RouterResult<T> = Result<T, RouterError>;
