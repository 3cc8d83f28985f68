//! `tn-world` — what the navigation engine knows about the live world.
//!
//! The engine never owns the world.  Each control-loop tick it asks a
//! [`WorldSensor`] for a fresh, read-only [`WorldSnapshot`] and emits
//! commands through [`Locomotion`] and [`ObjectInteraction`].  Everything in
//! this crate is either plain data or one of those three seams.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`region`]   | `Region`, `RegionCatalog` (seed-scoped grid cache)         |
//! | [`entity`]   | `Entity`, `EntityIndex` (R-tree radius queries)            |
//! | [`object`]   | `WorldObject`, `ObjectKind`                                |
//! | [`snapshot`] | `WorldSnapshot`, `Ability`                                 |
//! | [`collab`]   | `WorldSensor`, `Locomotion`, `ObjectInteraction` traits    |
//! | [`error`]    | `InteractError`, `InteractResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on plain data types.       |

pub mod collab;
pub mod entity;
pub mod error;
pub mod object;
pub mod region;
pub mod snapshot;


pub use collab::{Locomotion, ObjectInteraction, WorldSensor};
pub use entity::{Entity, EntityIndex};
pub use error::{InteractError, InteractResult};
pub use object::{ObjectKind, WorldObject};
pub use region::{Region, RegionCatalog};
pub use snapshot::{Ability, WorldSnapshot};
