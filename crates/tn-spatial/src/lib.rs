//! `tn-spatial` — collision grids, terrain construction and path search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`grid`]    | `TileClass`, `CollisionGrid` (dense `y * width + x` layout) |
//! | [`terrain`] | `TerrainBuilder`: halo, thickening, exit drilling passes    |
//! | [`search`]  | `PathSearch`, `SearchBuffers`: weighted A* over 8 neighbours |
//! | [`path`]    | `Path`: immutable route in world coordinates                |
//! | [`sight`]   | `line_of_sight`: Bresenham walk over walkable tiles         |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod grid;
pub mod path;
pub mod search;
pub mod sight;
pub mod terrain;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::{CollisionGrid, TileClass};
pub use path::Path;
pub use search::{PathSearch, SearchBuffers};
pub use sight::line_of_sight;
pub use terrain::TerrainBuilder;
