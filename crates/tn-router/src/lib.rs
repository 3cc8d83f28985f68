//! `tn-router` — route search against the live world.
//!
//! [`RegionRouter`] sits between the motion controller and
//! [`tn_spatial::PathSearch`].  For every request it takes a private copy of
//! the current region's canonical grid, widens it to a neighbouring region
//! when the destination lies outside, applies terrain fixups, substitutes an
//! unwalkable destination, overlays dynamic objects and entities, and only
//! then searches.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`router`] | `RegionRouter`, `SearchSpace`; barrier and visibility queries |
//! | [`fixup`]  | `Fixup`, `FixupTable`: per-region terrain corrections         |
//! | [`error`]  | `RouterError`, `RouterResult<T>`                              |

pub mod error;
pub mod fixup;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{RouterError, RouterResult};
pub use fixup::{Fixup, FixupTable};
pub use router::{RegionRouter, SearchSpace};
