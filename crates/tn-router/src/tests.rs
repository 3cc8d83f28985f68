//! Unit tests for tn-router.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use tn_core::{NavConfig, ObjectId, Position, RegionId};
    use tn_spatial::CollisionGrid;
    use tn_world::{ObjectKind, Region, WorldObject, WorldSnapshot};

    use crate::RegionRouter;

    pub fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    pub fn region(id: u32, offset: Position, text: &str) -> Arc<Region> {
        Arc::new(Region::new(RegionId(id), CollisionGrid::from_ascii(offset, text).unwrap()))
    }

    pub fn open_region(id: u32, offset: Position, w: usize, h: usize) -> Arc<Region> {
        region(id, offset, &vec![".".repeat(w); h].join("\n"))
    }

    pub fn snapshot(region: Arc<Region>, at: Position) -> WorldSnapshot {
        WorldSnapshot::in_region(region, at)
    }

    pub fn router() -> RegionRouter {
        RegionRouter::new(NavConfig::default())
    }

    pub fn door(id: u32, at: Position) -> WorldObject {
        WorldObject::new(ObjectId(id), ObjectKind::Door, at)
    }

    pub fn barrel(id: u32, at: Position) -> WorldObject {
        WorldObject::new(ObjectId(id), ObjectKind::Destructible, at)
    }
}

// ── Stitching ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stitching {
    use super::helpers::{open_region, p, router, snapshot};
    use tn_core::RegionId;

    use crate::RouterError;

    #[test]
    fn adjacent_regions_combined_into_one_grid() {
        let a = open_region(1, p(0, 0), 20, 20);
        let b = open_region(2, p(20, 0), 20, 20);
        let mut snap = snapshot(a, p(5, 5));
        snap.neighbours.push(b);

        let r = router();
        let space = r.search_space(&snap, p(25, 5)).unwrap();
        assert_eq!(space.grid.width(), 40);
        assert_eq!(space.grid.height(), 20);
        assert_eq!(space.grid.offset(), p(0, 0));
        assert_eq!(space.to, p(25, 5));
    }

    #[test]
    fn route_crosses_region_boundary() {
        let a = open_region(1, p(0, 0), 20, 20);
        let b = open_region(2, p(20, 0), 20, 20);
        let mut snap = snapshot(a, p(5, 5));
        snap.neighbours.push(b);

        let path = router().search(&snap, p(25, 5)).unwrap();
        assert_eq!(path.from(), Some(p(5, 5)));
        assert_eq!(path.to(), Some(p(25, 5)));
        assert_eq!(path.len(), 21);
    }

    #[test]
    fn offset_regions_union_bounding_box() {
        let a = open_region(1, p(0, 0), 10, 10);
        let b = open_region(2, p(5, 10), 10, 5);
        let mut snap = snapshot(a, p(1, 1));
        snap.neighbours.push(b);

        let space = router().search_space(&snap, p(12, 12)).unwrap();
        assert_eq!(space.grid.offset(), p(0, 0));
        assert_eq!(space.grid.width(), 15);
        assert_eq!(space.grid.height(), 15);
        // Outside both regions: blocked filler.
        assert!(!space.grid.is_walkable(p(12, 2)));
        assert!(space.grid.is_walkable(p(12, 12)));
    }

    #[test]
    fn destination_in_no_known_region() {
        let a = open_region(1, p(0, 0), 10, 10);
        let snap = snapshot(a, p(1, 1));
        let err = router().search_from(&snap, p(1, 1), p(50, 50)).unwrap_err();
        assert_eq!(err, RouterError::DestinationRegionNotFound { to: p(50, 50) });
    }

    #[test]
    fn region_not_loaded() {
        let mut snap = snapshot(open_region(1, p(0, 0), 4, 4), p(0, 0));
        snap.current = None;
        snap.region = RegionId(7);
        assert_eq!(
            router().search(&snap, p(2, 2)).unwrap_err(),
            RouterError::RegionNotLoaded(RegionId(7))
        );
    }
}

// ── Overlays and substitution ─────────────────────────────────────────────────

#[cfg(test)]
mod overlays {
    use super::helpers::{door, open_region, p, region, router, snapshot};
    use tn_core::{EntityId, EntityKind};
    use tn_spatial::TileClass;
    use tn_world::{Entity, EntityIndex};

    #[test]
    fn objects_get_halo_entities_do_not() {
        let r = open_region(1, p(0, 0), 8, 8);
        let mut snap = snapshot(r, p(0, 7));
        snap.objects.push(door(1, p(3, 3)));
        snap.entities = EntityIndex::new(vec![Entity::hostile(EntityId(1), EntityKind(1), p(7, 0))]);

        let space = router().search_space(&snap, p(0, 0)).unwrap();
        let g = &space.grid;
        assert_eq!(g.class_at(p(3, 3)), Some(TileClass::Object));
        assert_eq!(g.class_at(p(5, 5)), Some(TileClass::LowPriority));
        assert_eq!(g.class_at(p(6, 6)), Some(TileClass::Walkable));
        assert_eq!(g.class_at(p(7, 0)), Some(TileClass::Entity));
        assert_eq!(g.class_at(p(6, 0)), Some(TileClass::Walkable));
    }

    #[test]
    fn canonical_grid_never_mutated() {
        let r = open_region(1, p(0, 0), 8, 8);
        let before = r.grid.clone();
        let mut snap = snapshot(r.clone(), p(0, 0));
        snap.objects.push(door(1, p(3, 3)));
        snap.entities = EntityIndex::new(vec![Entity::hostile(EntityId(1), EntityKind(1), p(5, 5))]);

        router().search(&snap, p(7, 7)).unwrap();
        assert_eq!(r.grid, before);
    }

    #[test]
    fn overlays_skip_unwalkable_tiles() {
        let r = region(1, p(0, 0), "...\n.#.\n...");
        let mut snap = snapshot(r, p(0, 0));
        snap.objects.push(door(1, p(1, 1)));
        let space = router().search_space(&snap, p(2, 2)).unwrap();
        assert_eq!(space.grid.class_at(p(1, 1)), Some(TileClass::NotWalkable));
        assert_eq!(space.grid.count(TileClass::LowPriority), 0);
    }

    #[test]
    fn unwalkable_destination_substituted() {
        let r = region(1, p(0, 0), "
            .....
            .....
            ..#..
            .....
        ");
        let snap = snapshot(r, p(0, 3));
        let mut router = router();
        let space = router.search_space(&snap, p(2, 2)).unwrap();
        assert_eq!(space.to, p(1, 1));
        let path = router.search(&snap, p(2, 2)).unwrap();
        assert_eq!(path.to(), Some(p(1, 1)));
    }

    #[test]
    fn fallback_to_nearby_tile_outside_region() {
        let r = open_region(1, p(0, 0), 8, 8);
        let snap = snapshot(r, p(0, 0));
        let path = router().search(&snap, p(8, 3)).unwrap();
        assert_eq!(path.to(), Some(p(7, 2)));
    }
}

// ── Fixups ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fixups {
    use super::helpers::{open_region, p, router, snapshot};
    use tn_core::{EntityId, EntityKind, RegionId};
    use tn_spatial::TileClass;
    use tn_world::{Entity, EntityIndex};

    use crate::{Fixup, FixupTable};

    #[test]
    fn local_positions_translated_after_stitching() {
        let a = open_region(1, p(0, 0), 20, 20);
        let b = open_region(2, p(20, 0), 20, 20);
        let mut snap = snapshot(a, p(5, 5));
        snap.neighbours.push(b);

        let table = FixupTable::new()
            .with(RegionId(2), Fixup::SealTile(p(2, 0)))
            .with(RegionId(1), Fixup::ClosePassage(p(4, 4)));
        let r = router().with_fixups(table);
        let space = r.search_space(&snap, p(25, 5)).unwrap();
        assert_eq!(space.grid.class_at(p(22, 0)), Some(TileClass::NotWalkable));
        assert_eq!(space.grid.class_at(p(2, 0)), Some(TileClass::Walkable));
        assert_eq!(space.grid.class_at(p(4, 4)), Some(TileClass::Closed));
    }

    #[test]
    fn sealed_tile_blocks_route() {
        let snap = snapshot(open_region(1, p(0, 0), 3, 1), p(0, 0));
        let mut r = router().with_fixups(FixupTable::new().with(RegionId(1), Fixup::SealTile(p(1, 0))));
        assert!(r.search_from(&snap, p(0, 0), p(2, 0)).is_err());
        assert!(router().search_from(&snap, p(0, 0), p(2, 0)).is_ok());
    }

    #[test]
    fn walls_softened_only_with_free_movement() {
        let r = super::helpers::region(1, p(0, 0), ".#.");
        let table = FixupTable::new().with(RegionId(1), Fixup::SoftenWallsWhenTeleporting);
        let router = router().with_fixups(table);

        let mut snap = snapshot(r, p(0, 0));
        let walking = router.search_space(&snap, p(2, 0)).unwrap();
        assert_eq!(walking.grid.class_at(p(1, 0)), Some(TileClass::NotWalkable));

        snap.can_teleport = true;
        let teleporting = router.search_space(&snap, p(2, 0)).unwrap();
        assert_eq!(teleporting.grid.class_at(p(1, 0)), Some(TileClass::LowPriority));
    }

    #[test]
    fn block_around_entity_kind() {
        let tower = EntityKind(42);
        let table = FixupTable::new().with(RegionId(1), Fixup::BlockAroundEntity { kind: tower, radius: 1 });
        let mut snap = snapshot(open_region(1, p(0, 0), 7, 7), p(0, 0));
        snap.entities = EntityIndex::new(vec![
            Entity::neutral(EntityId(1), tower, p(3, 3)),
            Entity::hostile(EntityId(2), EntityKind(1), p(6, 6)),
        ]);
        let space = router().with_fixups(table).search_space(&snap, p(0, 6)).unwrap();
        assert_eq!(space.grid.count(TileClass::NotWalkable), 9);
        assert_eq!(space.grid.class_at(p(6, 6)), Some(TileClass::Entity));
    }
}

// ── Barrier and visibility queries ────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use super::helpers::{barrel, door, open_region, p, region, router, snapshot};
    use tn_core::ObjectId;

    #[test]
    fn door_on_route() {
        let mut snap = snapshot(open_region(1, p(0, 0), 10, 3), p(0, 1));
        snap.objects.push(door(5, p(5, 1)));
        let mut r = router();
        assert_eq!(r.has_door_between(&snap, p(0, 1), p(9, 1)).map(|o| o.id), Some(ObjectId(5)));

        snap.objects[0].selectable = false;
        assert!(r.has_door_between(&snap, p(0, 1), p(9, 1)).is_none());
    }

    #[test]
    fn door_far_from_route_ignored() {
        let mut snap = snapshot(open_region(1, p(0, 0), 20, 20), p(0, 0));
        snap.objects.push(door(5, p(15, 19)));
        assert!(router().has_door_between(&snap, p(0, 0), p(5, 0)).is_none());
    }

    #[test]
    fn no_route_falls_back_to_nearby_door() {
        let r = region(1, p(0, 0), "
            ....#....
            ....#....
        ");
        let mut snap = snapshot(r, p(0, 0));
        snap.objects.push(door(3, p(3, 1)));
        let mut router = router();
        assert_eq!(router.has_door_between(&snap, p(0, 0), p(8, 0)).map(|o| o.id), Some(ObjectId(3)));
        assert!(router.has_door_between(&snap, p(8, 1), p(0, 0)).is_none());
    }

    #[test]
    fn closest_door_picks_nearest_within_vicinity() {
        let mut snap = snapshot(open_region(1, p(0, 0), 20, 20), p(0, 0));
        snap.objects.push(door(1, p(4, 0)));
        snap.objects.push(door(2, p(2, 0)));
        snap.objects.push(door(3, p(5, 0)));
        let r = router();
        assert_eq!(r.closest_door(&snap, p(0, 0)).map(|o| o.id), Some(ObjectId(2)));
        assert!(r.closest_door(&snap, p(10, 10)).is_none());
    }

    #[test]
    fn closest_destructible_is_strict() {
        let mut snap = snapshot(open_region(1, p(0, 0), 10, 10), p(0, 0));
        snap.objects.push(barrel(1, p(2, 0)));
        let r = router();
        assert!(r.closest_destructible(&snap, p(0, 0)).is_none());
        assert_eq!(r.closest_destructible(&snap, p(1, 1)).map(|o| o.id), Some(ObjectId(1)));
    }

    #[test]
    fn search_near_unwalkable_target() {
        let r = region(1, p(0, 0), "
            .........
            .........
            ....#....
            .........
        ");
        let snap = snapshot(r, p(0, 0));
        let path = router().search_near(&snap, p(0, 0), p(4, 2)).unwrap();
        assert_eq!(path.to(), Some(p(3, 1)));
    }

    #[test]
    fn search_near_walkable_target_is_direct() {
        let snap = snapshot(open_region(1, p(0, 0), 6, 6), p(0, 0));
        let path = router().search_near(&snap, p(0, 0), p(5, 5)).unwrap();
        assert_eq!(path.to(), Some(p(5, 5)));
    }

    #[test]
    fn line_of_sight_needs_loaded_region() {
        let mut snap = snapshot(region(1, p(0, 0), "...\n.#.\n..."), p(0, 0));
        let r = router();
        assert!(r.line_of_sight(&snap, p(0, 0), p(2, 0)));
        assert!(!r.line_of_sight(&snap, p(0, 1), p(2, 1)));
        assert_eq!(r.distance_from_agent(&snap, p(2, 2)), 2);
        snap.current = None;
        assert!(!r.line_of_sight(&snap, p(0, 0), p(2, 0)));
    }
}
