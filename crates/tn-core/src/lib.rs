//! `tn-core` — foundational types for the `tilenav` navigation engine.
//!
//! This crate is a dependency of every other `tn-*` crate.  It intentionally
//! has no `tn-*` dependencies and minimal external ones (`rand`, `rand_distr`
//! and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `RegionId`, `EntityId`, `ObjectId`, `EntityKind` |
//! | [`geo`]         | `Position`, Euclidean / Chebyshev distances           |
//! | [`time`]        | `Clock` trait, `SystemClock`, `ManualClock`           |
//! | [`rng`]         | `NavRng` (per-agent jitter source)                    |
//! | [`config`]      | `NavConfig` tuning constants, latency helpers         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{Latency, NavConfig};
pub use error::{CoreError, CoreResult};
pub use geo::Position;
pub use ids::{AgentId, EntityId, EntityKind, ObjectId, RegionId};
pub use rng::NavRng;
pub use time::{Clock, ManualClock, SystemClock};
