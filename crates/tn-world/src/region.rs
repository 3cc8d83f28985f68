//! Regions and the seed-scoped region cache.
//!
//! # Lifecycle
//!
//! A region's canonical [`CollisionGrid`] is built once, the first time its
//! terrain is loaded, and shared behind an `Arc` from then on.  Nothing ever
//! mutates it: the router clones it per search.  When the world instance
//! changes (a new world seed) every cached region is discarded, because the
//! same region id now refers to different terrain.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use tn_core::{NavConfig, Position, RegionId};
use tn_spatial::{CollisionGrid, TerrainBuilder};

// ── Region ────────────────────────────────────────────────────────────────────

/// One map/level instance with its own offset and collision grid.
#[derive(Clone, Debug)]
pub struct Region {
    pub id:    RegionId,
    /// Canonical grid.  Read-only once the region is shared.
    pub grid:  CollisionGrid,
    /// Known exits to other regions (world coordinates).
    pub exits: Vec<Position>,
    pub town:  bool,
}

impl Region {
    pub fn new(id: RegionId, grid: CollisionGrid) -> Self {
        Self { id, grid, exits: Vec::new(), town: false }
    }

    /// Build the canonical grid from raw terrain.  The builder's exits and
    /// town flag are taken from `exits` and `town`; radii come from `cfg`.
    pub fn from_terrain(
        id:      RegionId,
        terrain: TerrainBuilder,
        exits:   Vec<Position>,
        town:    bool,
        cfg:     &NavConfig,
    ) -> Self {
        let grid = terrain
            .with_config(cfg)
            .exits(exits.iter().copied())
            .town(town)
            .build();
        Self { id, grid, exits, town }
    }

    pub fn with_exits(mut self, exits: impl IntoIterator<Item = Position>) -> Self {
        self.exits.extend(exits);
        self
    }

    pub fn town(mut self, town: bool) -> Self {
        self.town = town;
        self
    }

    /// World position of the region's top-left tile.
    #[inline]
    pub fn offset(&self) -> Position {
        self.grid.offset()
    }

    /// `true` if `pos` lies inside this region's rectangle.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.grid.contains(pos)
    }
}

// ── RegionCatalog ─────────────────────────────────────────────────────────────

/// Cache of built regions for one world instance.
#[derive(Debug, Default)]
pub struct RegionCatalog {
    seed:    Option<u64>,
    regions: FxHashMap<RegionId, Arc<Region>>,
}

impl RegionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current world seed.  Returns `true` (and drops every
    /// cached region) when it differs from the last one seen.
    pub fn sync_seed(&mut self, seed: u64) -> bool {
        match self.seed {
            Some(current) if current == seed => false,
            previous => {
                if !self.regions.is_empty() {
                    debug!(
                        target: "tn_world::region",
                        ?previous, seed, dropped = self.regions.len(),
                        "world seed changed, discarding cached regions"
                    );
                }
                self.seed = Some(seed);
                self.regions.clear();
                previous.is_some()
            }
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get(&self, id: RegionId) -> Option<Arc<Region>> {
        self.regions.get(&id).cloned()
    }

    /// Store a region, replacing any previous entry with the same id.
    pub fn insert(&mut self, region: Region) -> Arc<Region> {
        let region = Arc::new(region);
        self.regions.insert(region.id, Arc::clone(&region));
        region
    }

    /// The cached region, building it with `build` on first use.
    pub fn get_or_build(&mut self, id: RegionId, build: impl FnOnce() -> Region) -> Arc<Region> {
        Arc::clone(self.regions.entry(id).or_insert_with(|| Arc::new(build())))
    }

    /// First cached region whose rectangle contains `pos`.
    pub fn containing(&self, pos: Position) -> Option<Arc<Region>> {
        self.regions.values().find(|r| r.contains(pos)).cloned()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
