//! Collision grid representation.
//!
//! # Data layout
//!
//! Tiles are stored in one dense, row-major `Vec<TileClass>`:
//!
//! ```text
//! tiles[ y * width + x ]
//! ```
//!
//! The search inner loop touches neighbouring tiles constantly, so rows are
//! never stored as separate vectors.
//!
//! # Coordinates
//!
//! `get`/`set` take **local** coordinates and do no translation; they panic
//! on out-of-range indices like any slice access.  Every method that takes a
//! world [`Position`] first translates it through the grid offset and
//! bounds-checks it; out-of-bounds is always "not walkable".

use std::fmt;

use tn_core::Position;

use crate::{SpatialError, SpatialResult};

// ── TileClass ─────────────────────────────────────────────────────────────────

/// Classification of one grid tile.
///
/// Only `NotWalkable` and `Walkable` come from raw terrain.  `LowPriority`,
/// `TeleportOnly` and `Closed` are added by construction passes; `Entity` and
/// `Object` only ever appear on per-search working copies.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TileClass {
    #[default]
    NotWalkable = 0,
    Walkable,
    /// Walkable, but close to an obstacle.  Discourages wall-hugging.
    LowPriority,
    /// Occupied by a dynamic entity on this search's working copy.
    Entity,
    /// Occupied by a world object on this search's working copy.
    Object,
    /// Passable only with free movement (teleport).
    TeleportOnly,
    /// Explicitly sealed narrow passage.
    Closed,
}

impl TileClass {
    /// `true` for tiles an ordinary walker may step on.
    #[inline]
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileClass::NotWalkable | TileClass::TeleportOnly | TileClass::Closed)
    }

    /// `true` for the two raw-walkable classes the construction passes treat
    /// as open floor.
    #[inline]
    pub fn is_floor(self) -> bool {
        matches!(self, TileClass::Walkable | TileClass::LowPriority)
    }

    /// One-character rendering used by [`CollisionGrid`]'s `Display` and
    /// parsed back by [`CollisionGrid::from_ascii`].
    pub fn as_char(self) -> char {
        match self {
            TileClass::NotWalkable  => '#',
            TileClass::Walkable     => '.',
            TileClass::LowPriority  => ',',
            TileClass::Entity       => 'e',
            TileClass::Object       => 'o',
            TileClass::TeleportOnly => 't',
            TileClass::Closed       => 'c',
        }
    }

    pub fn from_char(c: char) -> Option<TileClass> {
        Some(match c {
            '#' => TileClass::NotWalkable,
            '.' => TileClass::Walkable,
            ',' => TileClass::LowPriority,
            'e' => TileClass::Entity,
            'o' => TileClass::Object,
            't' => TileClass::TeleportOnly,
            'c' => TileClass::Closed,
            _ => return None,
        })
    }
}

// ── CollisionGrid ─────────────────────────────────────────────────────────────

/// Per-region collision model.
///
/// The canonical grid of a region is built once (see
/// [`TerrainBuilder`][crate::TerrainBuilder]) and then only ever read.  Search
/// callers `clone()` it and mutate the clone; the clone shares nothing with
/// the source.
#[derive(Clone, PartialEq, Eq)]
pub struct CollisionGrid {
    offset: Position,
    width:  i32,
    height: i32,
    tiles:  Vec<TileClass>,
}

impl CollisionGrid {
    /// A grid of the given size with every tile `NotWalkable`.
    pub fn blocked(offset: Position, width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            offset,
            width,
            height,
            tiles: vec![TileClass::NotWalkable; (width * height) as usize],
        }
    }

    /// Wrap an existing row-major tile vector.
    pub fn from_tiles(
        offset: Position,
        width:  i32,
        height: i32,
        tiles:  Vec<TileClass>,
    ) -> SpatialResult<Self> {
        let expected = (width.max(0) * height.max(0)) as usize;
        if tiles.len() != expected {
            return Err(SpatialError::Dimensions { expected, got: tiles.len() });
        }
        Ok(Self { offset, width: width.max(0), height: height.max(0), tiles })
    }

    /// Parse a grid drawn with [`TileClass::as_char`] glyphs, one row per
    /// line.  Leading/trailing blank lines and indentation are ignored;
    /// unknown glyphs read as `NotWalkable`.
    pub fn from_ascii(offset: Position, text: &str) -> SpatialResult<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;

        let mut tiles = Vec::with_capacity((width * height) as usize);
        for (y, row) in rows.iter().enumerate() {
            let got = row.chars().count();
            if got != width as usize {
                return Err(SpatialError::RaggedRow { row: y, expected: width as usize, got });
            }
            tiles.extend(
                row.chars()
                    .map(|c| TileClass::from_char(c).unwrap_or(TileClass::NotWalkable)),
            );
        }
        Self::from_tiles(offset, width, height, tiles)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// World position of local tile `(0, 0)`.
    #[inline]
    pub fn offset(&self) -> Position {
        self.offset
    }

    /// World position one past the bottom-right corner.
    #[inline]
    pub fn end(&self) -> Position {
        self.offset.offset(self.width, self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Raw row-major tiles.
    #[inline]
    pub fn tiles(&self) -> &[TileClass] {
        &self.tiles
    }

    // ── Local access ──────────────────────────────────────────────────────

    #[inline]
    pub fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Tile at local `(x, y)`.  No bounds checking beyond the slice's own.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> TileClass {
        self.tiles[self.index(x, y)]
    }

    /// Overwrite the tile at local `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, class: TileClass) {
        let i = self.index(x, y);
        self.tiles[i] = class;
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Bounds-checked local read.
    #[inline]
    pub fn get_checked(&self, x: i32, y: i32) -> Option<TileClass> {
        self.in_bounds(x, y).then(|| self.get(x, y))
    }

    // ── World access ──────────────────────────────────────────────────────

    /// Translate a world position into this grid's local space.
    #[inline]
    pub fn relative_position(&self, world: Position) -> Position {
        world - self.offset
    }

    /// Translate a local position back into world space.
    #[inline]
    pub fn world_position(&self, local: Position) -> Position {
        local + self.offset
    }

    /// `true` if `world` falls inside this grid's rectangle.
    #[inline]
    pub fn contains(&self, world: Position) -> bool {
        let p = self.relative_position(world);
        self.in_bounds(p.x, p.y)
    }

    /// Classification at a world position; `None` when out of bounds.
    #[inline]
    pub fn class_at(&self, world: Position) -> Option<TileClass> {
        let p = self.relative_position(world);
        self.get_checked(p.x, p.y)
    }

    /// `true` if an ordinary walker may stand on `world`.
    #[inline]
    pub fn is_walkable(&self, world: Position) -> bool {
        self.class_at(world).is_some_and(TileClass::is_walkable)
    }

    /// Overwrite the tile at a world position; returns `false` (and does
    /// nothing) when out of bounds.
    pub fn set_at(&mut self, world: Position, class: TileClass) -> bool {
        let p = self.relative_position(world);
        if !self.in_bounds(p.x, p.y) {
            return false;
        }
        self.set(p.x, p.y, class);
        true
    }

    // ── Bulk edits ────────────────────────────────────────────────────────

    /// Downgrade every `Walkable` tile within Chebyshev `radius` of local
    /// `(cx, cy)` (excluding the centre) to `LowPriority`.
    pub fn soften_around(&mut self, cx: i32, cy: i32, radius: i32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if self.in_bounds(x, y) && self.get(x, y) == TileClass::Walkable {
                    self.set(x, y, TileClass::LowPriority);
                }
            }
        }
    }

    /// Copy every tile of `src` into this grid at `src`'s world offset.
    /// Tiles of `src` that fall outside this grid are dropped.
    pub fn blit(&mut self, src: &CollisionGrid) {
        let origin = self.relative_position(src.offset);
        for y in 0..src.height {
            let ty = origin.y + y;
            if ty < 0 || ty >= self.height {
                continue;
            }
            for x in 0..src.width {
                let tx = origin.x + x;
                if tx >= 0 && tx < self.width {
                    self.set(tx, ty, src.get(x, y));
                }
            }
        }
    }

    /// Number of tiles of the given class.
    pub fn count(&self, class: TileClass) -> usize {
        self.tiles.iter().filter(|&&t| t == class).count()
    }
}

impl fmt::Debug for CollisionGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionGrid")
            .field("offset", &self.offset)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Renders one glyph per tile, one line per row (debug map rendering).
impl fmt::Display for CollisionGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.get(x, y).as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
