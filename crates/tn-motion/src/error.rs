//! Motion fault taxonomy.

use thiserror::Error;

use tn_core::RegionId;
use tn_world::InteractError;

/// Why a `move_to` call gave up.
///
/// None of these are retried inside the executor; the caller decides what
/// to do next (replan, fight, pick another destination).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionFault {
    #[error("no route to the destination")]
    NoPath,

    #[error("position unchanged for too long")]
    Stuck,

    #[error("agent keeps circling the same spot")]
    RoundTrip,

    /// Policy signal rather than a failure: a hostile entity with a clear
    /// line to the agent is within the scan radius.
    #[error("hostile entities in the movement path")]
    EntitiesInPath,

    #[error("region changed but collision data for {region} did not load")]
    RegionLoadTimeout { region: RegionId },

    #[error("barrier interaction failed: {0}")]
    Interaction(#[from] InteractError),

    #[error("interrupted: {0}")]
    Interrupted(String),
}

pub type MotionResult<T> = Result<T, MotionFault>;
