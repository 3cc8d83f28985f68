//! Unit tests for tn-spatial.
//!
//! Grids are drawn as ASCII: `#` wall, `.` floor, plus the other
//! [`TileClass`](crate::TileClass) glyphs where a test needs them.

#[cfg(test)]
mod helpers {
    use tn_core::Position;

    use crate::{CollisionGrid, TerrainBuilder};

    pub const ORIGIN: Position = Position::new(0, 0);

    /// Parse a grid verbatim (no construction passes).
    pub fn raw(text: &str) -> CollisionGrid {
        CollisionGrid::from_ascii(ORIGIN, text).unwrap()
    }

    /// Run the construction passes without teleport bridging.
    pub fn built(text: &str) -> CollisionGrid {
        TerrainBuilder::from_ascii(ORIGIN, text)
            .unwrap()
            .teleport_bridging(false)
            .build()
    }

    pub fn open(width: usize, height: usize) -> CollisionGrid {
        let row = ".".repeat(width);
        let text = vec![row; height].join("\n");
        raw(&text)
    }

    pub fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }
}

// ── CollisionGrid ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use super::helpers::{open, p, raw};
    use crate::{CollisionGrid, SpatialError, TileClass};

    #[test]
    fn ascii_parse_and_render() {
        let g = raw("
            #.,
            eot
            c.#
        ");
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 3);
        assert_eq!(g.get(1, 0), TileClass::Walkable);
        assert_eq!(g.get(2, 0), TileClass::LowPriority);
        assert_eq!(g.get(0, 1), TileClass::Entity);
        assert_eq!(g.get(1, 1), TileClass::Object);
        assert_eq!(g.get(2, 1), TileClass::TeleportOnly);
        assert_eq!(g.get(0, 2), TileClass::Closed);
        assert_eq!(g.to_string(), "#.,\neot\nc.#\n");
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let err = CollisionGrid::from_tiles(p(0, 0), 2, 2, vec![TileClass::Walkable; 3]).unwrap_err();
        assert_eq!(err, SpatialError::Dimensions { expected: 4, got: 3 });
    }

    #[test]
    fn uneven_rows_rejected() {
        // Nine tiles, which would pass a total-count check for 3 × 3.
        let err = CollisionGrid::from_ascii(p(0, 0), "...\n..\n....").unwrap_err();
        assert_eq!(err, SpatialError::RaggedRow { row: 1, expected: 3, got: 2 });
    }

    #[test]
    fn world_local_translation() {
        let g = CollisionGrid::from_ascii(p(100, 50), "..\n.#").unwrap();
        assert_eq!(g.relative_position(p(101, 51)), p(1, 1));
        assert_eq!(g.world_position(p(1, 1)), p(101, 51));
        assert_eq!(g.end(), p(102, 52));
        assert!(g.contains(p(100, 50)));
        assert!(!g.contains(p(102, 50)));
        assert!(g.is_walkable(p(100, 51)));
        assert!(!g.is_walkable(p(101, 51)));
    }

    #[test]
    fn out_of_bounds_is_not_walkable() {
        let g = open(3, 3);
        assert!(!g.is_walkable(p(-1, 0)));
        assert!(!g.is_walkable(p(3, 0)));
        assert!(!g.is_walkable(p(0, 3)));
        assert_eq!(g.class_at(p(5, 5)), None);
        assert_eq!(g.get_checked(-1, 0), None);
    }

    #[test]
    fn teleport_only_and_closed_not_walkable() {
        let g = raw(".tc,eo");
        let walkable: Vec<bool> = (0..6).map(|x| g.is_walkable(p(x, 0))).collect();
        assert_eq!(walkable, vec![true, false, false, true, true, true]);
    }

    #[test]
    fn clone_is_independent() {
        let source = open(4, 4);
        let mut copy = source.clone();
        copy.set(2, 2, TileClass::Entity);
        assert!(copy.set_at(p(1, 1), TileClass::Object));
        assert_eq!(source.get(2, 2), TileClass::Walkable);
        assert_eq!(source.get(1, 1), TileClass::Walkable);
        assert_eq!(copy.get(2, 2), TileClass::Entity);
    }

    #[test]
    fn set_at_out_of_bounds_is_noop() {
        let mut g = open(2, 2);
        assert!(!g.set_at(p(5, 5), TileClass::Entity));
        assert_eq!(g.count(TileClass::Walkable), 4);
    }

    #[test]
    fn soften_excludes_centre() {
        let mut g = open(5, 5);
        g.soften_around(2, 2, 1);
        assert_eq!(g.get(2, 2), TileClass::Walkable);
        assert_eq!(g.count(TileClass::LowPriority), 8);
        assert_eq!(g.get(0, 0), TileClass::Walkable);
    }

    #[test]
    fn blit_copies_at_offset() {
        let mut combined = CollisionGrid::blocked(p(0, 0), 4, 2);
        let right = CollisionGrid::from_ascii(p(2, 0), "..\n.,").unwrap();
        combined.blit(&right);
        assert_eq!(combined.to_string(), "##..\n##.,\n");
    }
}

// ── Terrain construction ──────────────────────────────────────────────────────

#[cfg(test)]
mod terrain {
    use super::helpers::{built, p, ORIGIN};
    use crate::{SpatialError, TerrainBuilder, TileClass};
    use tn_core::NavConfig;

    const CORRIDOR: &str = "
        #######
        ###.###
        ###.###
        #.....#
        #######
    ";

    #[test]
    fn halo_around_isolated_obstacle() {
        let g = built("
            .......
            .......
            .......
            ...#...
            .......
            .......
            .......
        ");
        assert_eq!(g.get(3, 3), TileClass::NotWalkable);
        for y in 0..7 {
            for x in 0..7 {
                if (x, y) == (3, 3) {
                    continue;
                }
                let within = (x - 3_i32).abs().max((y - 3_i32).abs()) <= 2;
                let expected = if within { TileClass::LowPriority } else { TileClass::Walkable };
                assert_eq!(g.get(x, y), expected, "tile ({x}, {y})");
            }
        }
        assert_eq!(g.count(TileClass::LowPriority), 24);
    }

    #[test]
    fn halo_radius_from_config() {
        let cfg = NavConfig { halo_radius: 1, ..NavConfig::default() };
        let g = TerrainBuilder::from_ascii(ORIGIN, ".....\n.....\n..#..\n.....\n.....")
            .unwrap()
            .teleport_bridging(false)
            .with_config(&cfg)
            .build();
        assert_eq!(g.count(TileClass::LowPriority), 8);
        assert_eq!(g.get(0, 0), TileClass::Walkable);
    }

    #[test]
    fn single_tile_corridor_is_thickened() {
        let g = built(CORRIDOR);
        assert_eq!(g.get(3, 1), TileClass::TeleportOnly);
        // Two blocked sides only: stays walkable.
        assert_eq!(g.get(3, 2), TileClass::LowPriority);
        assert!(g.get(3, 3).is_walkable());
    }

    #[test]
    fn diagonal_corner_gap_is_closed() {
        let g = built("
            .......
            .##....
            .#.....
            ...#...
            .......
        ");
        // Walls above, left and diagonally on both sides: a walker could
        // only pass by cutting the corner.
        assert_eq!(g.get(2, 2), TileClass::TeleportOnly);
        // Open above: left alone.
        assert!(g.get(4, 2).is_floor());
        assert!(g.get(2, 3).is_floor());
    }

    #[test]
    fn exit_drilling_reopens_corridor() {
        let g = TerrainBuilder::from_ascii(ORIGIN, CORRIDOR)
            .unwrap()
            .teleport_bridging(false)
            .exits([p(3, 1)])
            .build();
        assert_eq!(g.get(3, 1), TileClass::Walkable);
    }

    #[test]
    fn town_skips_exit_drilling() {
        let g = TerrainBuilder::from_ascii(ORIGIN, CORRIDOR)
            .unwrap()
            .town(true)
            .exits([p(3, 1)])
            .build();
        assert_eq!(g.get(3, 1), TileClass::TeleportOnly);
    }

    #[test]
    fn exits_outside_grid_are_ignored() {
        let g = TerrainBuilder::from_ascii(ORIGIN, CORRIDOR)
            .unwrap()
            .teleport_bridging(false)
            .exits([p(50, 50)])
            .build();
        assert_eq!(g.get(3, 1), TileClass::TeleportOnly);
    }

    #[test]
    fn thin_wall_bridged_for_free_movement() {
        let text = "
            #########
            #...#...#
            #...#...#
            #...#...#
            #########
        ";
        let g = TerrainBuilder::from_ascii(ORIGIN, text).unwrap().build();
        for y in 1..4 {
            assert_eq!(g.get(4, y), TileClass::TeleportOnly, "wall tile (4, {y})");
        }
        // Outer border is never bridged.
        assert_eq!(g.get(0, 2), TileClass::NotWalkable);
        assert_eq!(g.get(4, 0), TileClass::NotWalkable);

        let town = TerrainBuilder::from_ascii(ORIGIN, text).unwrap().town(true).build();
        assert_eq!(town.get(4, 2), TileClass::NotWalkable);
    }

    #[test]
    fn builder_rejects_ragged_input() {
        assert!(TerrainBuilder::new(ORIGIN, 3, 3, vec![true; 8]).is_err());
    }

    #[test]
    fn builder_rejects_uneven_rows() {
        let rows = [vec![true; 3], vec![true; 2], vec![true; 4]];
        let err = TerrainBuilder::from_rows(ORIGIN, &rows).unwrap_err();
        assert_eq!(err, SpatialError::RaggedRow { row: 1, expected: 3, got: 2 });
    }

    #[test]
    fn builder_keeps_offset() {
        let g = TerrainBuilder::from_ascii(p(40, -10), "...\n...").unwrap().build();
        assert_eq!(g.offset(), p(40, -10));
        assert!(g.is_walkable(p(42, -9)));
    }
}

// ── PathSearch ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use super::helpers::{open, p, raw};
    use crate::{CollisionGrid, Path, PathSearch, SearchBuffers, SpatialError, TerrainBuilder, TileClass};

    fn walk() -> PathSearch {
        PathSearch::new(false)
    }

    fn teleport() -> PathSearch {
        PathSearch::new(true)
    }

    fn assert_adjacent_steps(path: &Path) {
        for pair in path.positions().windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {} is not one step", pair[0], pair[1]);
        }
    }

    #[test]
    fn open_grid_diagonal_route() {
        let g = open(10, 10);
        let mut buf = SearchBuffers::new();
        let path = walk().find(&g, p(0, 0), p(9, 9), &mut buf).unwrap();
        assert!(path.len() == 9 || path.len() == 10, "len = {}", path.len());
        assert_eq!(path.from(), Some(p(0, 0)));
        assert_eq!(path.to(), Some(p(9, 9)));
        assert_adjacent_steps(&path);
    }

    #[test]
    fn solid_wall_has_no_route() {
        let g = raw("
            ..........
            ..........
            ##########
            ..........
        ");
        let mut buf = SearchBuffers::new();
        let err = walk().find(&g, p(0, 0), p(9, 3), &mut buf).unwrap_err();
        assert_eq!(err, SpatialError::NoRoute { from: p(0, 0), to: p(9, 3) });
        assert!(teleport().find(&g, p(0, 0), p(9, 3), &mut buf).is_err());
    }

    #[test]
    fn no_corner_cutting() {
        let g = raw("
            .#
            #.
        ");
        let mut buf = SearchBuffers::new();
        assert!(walk().find(&g, p(0, 0), p(1, 1), &mut buf).is_err());
    }

    #[test]
    fn start_equals_goal() {
        let g = open(3, 3);
        let mut buf = SearchBuffers::new();
        let path = walk().find(&g, p(1, 1), p(1, 1), &mut buf).unwrap();
        assert_eq!(path.positions(), &[p(1, 1)]);
    }

    #[test]
    fn empty_grid_and_out_of_bounds() {
        let mut buf = SearchBuffers::new();
        let empty = CollisionGrid::blocked(p(0, 0), 0, 0);
        assert_eq!(walk().find(&empty, p(0, 0), p(0, 0), &mut buf), Err(SpatialError::EmptyGrid));

        let g = open(3, 3);
        assert_eq!(
            walk().find(&g, p(-1, 0), p(2, 2), &mut buf),
            Err(SpatialError::OutOfBounds { pos: p(-1, 0) })
        );
        assert_eq!(
            walk().find(&g, p(0, 0), p(3, 3), &mut buf),
            Err(SpatialError::OutOfBounds { pos: p(3, 3) })
        );
    }

    #[test]
    fn world_coordinates_in_and_out() {
        let g = CollisionGrid::from_ascii(p(100, 50), "...").unwrap();
        let mut buf = SearchBuffers::new();
        let path = walk().find(&g, p(100, 50), p(102, 50), &mut buf).unwrap();
        assert_eq!(path.positions(), &[p(100, 50), p(101, 50), p(102, 50)]);
    }

    #[test]
    fn low_priority_tiles_avoided() {
        let g = raw("
            .....
            .,,,.
            .....
        ");
        let mut buf = SearchBuffers::new();
        let path = walk().find(&g, p(0, 1), p(4, 1), &mut buf).unwrap();
        assert!(path.iter().all(|&pos| g.class_at(pos) == Some(TileClass::Walkable)));
        assert_adjacent_steps(&path);
    }

    #[test]
    fn entity_tiles_are_expensive_not_blocking() {
        let mut buf = SearchBuffers::new();
        // Only one lane: the entity must be crossed.
        let lane = raw(".e.");
        let path = walk().find(&lane, p(0, 0), p(2, 0), &mut buf).unwrap();
        assert_eq!(path.len(), 3);

        // With a detour available it is taken.
        let g = raw("
            ...
            .e.
            ...
        ");
        let path = walk().find(&g, p(0, 1), p(2, 1), &mut buf).unwrap();
        assert!(!path.iter().any(|&pos| pos == p(1, 1)));
    }

    #[test]
    fn teleport_tiles_need_free_movement_and_are_elided() {
        let g = raw(".t.");
        let mut buf = SearchBuffers::new();
        assert!(walk().find(&g, p(0, 0), p(2, 0), &mut buf).is_err());
        let path = teleport().find(&g, p(0, 0), p(2, 0), &mut buf).unwrap();
        assert_eq!(path.positions(), &[p(0, 0), p(2, 0)]);
    }

    #[test]
    fn closed_tiles_stay_in_path() {
        let g = raw(".c.");
        let mut buf = SearchBuffers::new();
        assert!(walk().find(&g, p(0, 0), p(2, 0), &mut buf).is_err());
        let path = teleport().find(&g, p(0, 0), p(2, 0), &mut buf).unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn teleport_streak_is_capped() {
        let mut buf = SearchBuffers::new();
        let at_cap = raw(&format!(".{}.", "t".repeat(12)));
        let path = teleport().find(&at_cap, p(0, 0), p(13, 0), &mut buf).unwrap();
        assert_eq!(path.positions(), &[p(0, 0), p(13, 0)]);

        let over_cap = raw(&format!(".{}.", "t".repeat(13)));
        assert!(teleport().find(&over_cap, p(0, 0), p(14, 0), &mut buf).is_err());

        let relaxed = PathSearch { free_movement: true, max_teleport_streak: 13 };
        assert!(relaxed.find(&over_cap, p(0, 0), p(14, 0), &mut buf).is_ok());
    }

    #[test]
    fn walking_never_crosses_obstacles() {
        let g = raw("
            ##########
            #........#
            #.######.#
            #.#....#.#
            #.#.##.#.#
            #...##...#
            ##########
        ");
        let mut buf = SearchBuffers::new();
        let path = walk().find(&g, p(1, 1), p(3, 3), &mut buf).unwrap();
        assert_eq!(path.to(), Some(p(3, 3)));
        assert_adjacent_steps(&path);
        for &pos in &path {
            assert!(g.is_walkable(pos), "{pos} is not walkable");
        }
    }

    #[test]
    fn bridged_wall_crossable_only_by_teleport() {
        let g = TerrainBuilder::from_ascii(p(0, 0), "
            #########
            #...#...#
            #...#...#
            #...#...#
            #########
        ")
        .unwrap()
        .build();
        let mut buf = SearchBuffers::new();
        assert!(walk().find(&g, p(2, 2), p(6, 2), &mut buf).is_err());
        let path = teleport().find(&g, p(2, 2), p(6, 2), &mut buf).unwrap();
        assert_eq!(path.to(), Some(p(6, 2)));
        assert!(path.iter().all(|pos| pos.x != 4));
    }

    #[test]
    fn buffers_track_grid_size() {
        let mut buf = SearchBuffers::new();
        assert_eq!(buf.capacity(), 0);
        walk().find(&open(10, 10), p(0, 0), p(9, 9), &mut buf).unwrap();
        assert_eq!(buf.capacity(), 100);
        walk().find(&open(3, 1), p(0, 0), p(2, 0), &mut buf).unwrap();
        assert_eq!(buf.capacity(), 3);
        // Reuse with the same size gives the same answer.
        let g = open(3, 1);
        let a = walk().find(&g, p(0, 0), p(2, 0), &mut buf).unwrap();
        let b = walk().find(&g, p(0, 0), p(2, 0), &mut buf).unwrap();
        assert_eq!(a, b);
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use super::helpers::p;
    use crate::Path;

    fn straight(n: i32) -> Path {
        Path::new((0..n).map(|x| p(x, 0)).collect())
    }

    #[test]
    fn endpoints() {
        let path = straight(5);
        assert_eq!(path.from(), Some(p(0, 0)));
        assert_eq!(path.to(), Some(p(4, 0)));
        assert_eq!(Path::default().from(), None);
        assert!(Path::default().is_empty());
    }

    #[test]
    fn prefix_within_budget() {
        let path = straight(10);
        assert_eq!(path.prefix_within(0).len(), 10);
        assert_eq!(path.prefix_within(3), &[p(0, 0), p(1, 0), p(2, 0), p(3, 0)]);
        assert_eq!(path.prefix_within(50).len(), 10);
        assert_eq!(path.waypoint_within(3), Some(p(3, 0)));
    }

    #[test]
    fn intersects_with_padding() {
        let path = straight(5);
        assert!(path.intersects(p(2, 3), 4.0));
        assert!(!path.intersects(p(2, 5), 4.0));
        assert!(path.intersects(p(4, 0), 0.0));
    }
}

// ── Line of sight ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod sight {
    use super::helpers::{open, p, raw};
    use crate::line_of_sight;

    #[test]
    fn clear_across_open_floor() {
        let g = open(5, 5);
        assert!(line_of_sight(&g, p(0, 0), p(4, 4)));
        assert!(line_of_sight(&g, p(4, 0), p(0, 3)));
        assert!(line_of_sight(&g, p(2, 2), p(2, 2)));
    }

    #[test]
    fn wall_blocks() {
        let g = raw("
            .....
            ..#..
            .....
        ");
        assert!(!line_of_sight(&g, p(0, 1), p(4, 1)));
        assert!(line_of_sight(&g, p(0, 0), p(4, 0)));
    }

    #[test]
    fn teleport_tiles_block() {
        let g = raw("..t..");
        assert!(!line_of_sight(&g, p(0, 0), p(4, 0)));
    }

    #[test]
    fn leaving_the_grid_blocks() {
        let g = open(3, 3);
        assert!(!line_of_sight(&g, p(0, 0), p(5, 0)));
    }
}
