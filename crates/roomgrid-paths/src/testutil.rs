//! Helpers shared by the search tests.

use std::sync::Arc;

use rand::{RngExt, SeedableRng};
use roomgrid_core::{MapPosition, WorldPosition};

use crate::finder::PathFinder;
use crate::options::{Algorithm, Goal, SearchRequest};
use crate::terrain::{RoomTerrain, TerrainKind, TerrainStore};

/// A room far from the world edges.
pub(crate) const HOME: MapPosition = MapPosition::new(10, 10);

pub(crate) fn finder(store: TerrainStore) -> PathFinder {
    PathFinder::new(Arc::new(store))
}

/// An exact-goal request with an admissible heuristic and a generous budget.
pub(crate) fn request(
    origin: WorldPosition,
    goal: WorldPosition,
    algorithm: Algorithm,
) -> SearchRequest {
    let mut req = SearchRequest::new(origin, vec![Goal::exact(goal)]);
    req.options.algorithm = algorithm;
    req.options.heuristic_weight = 1.0;
    req.options.max_ops = 100_000;
    req
}

/// A store holding only [`HOME`].
pub(crate) fn single_room(terrain: RoomTerrain) -> TerrainStore {
    let mut store = TerrainStore::new();
    store.insert(HOME, terrain);
    store
}

/// Rooms with walls scattered at `density`; tiles in `keep` stay plain.
pub(crate) fn random_store(
    seed: u64,
    rooms: &[MapPosition],
    density: f64,
    keep: &[WorldPosition],
) -> TerrainStore {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    rooms
        .iter()
        .map(|&room| {
            let terrain = RoomTerrain::from_fn(|lx, ly| {
                let tile = room.tile(lx, ly);
                if !keep.contains(&tile) && rng.random_bool(density) {
                    TerrainKind::Wall
                } else {
                    TerrainKind::Plain
                }
            });
            (room, terrain)
        })
        .collect()
}

/// Rooms with `wall` percent walls and `swamp` percent swamp; tiles in
/// `keep` stay plain.
pub(crate) fn mixed_store(
    seed: u64,
    rooms: &[MapPosition],
    wall: u32,
    swamp: u32,
    keep: &[WorldPosition],
) -> TerrainStore {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    rooms
        .iter()
        .map(|&room| {
            let terrain = RoomTerrain::from_fn(|lx, ly| {
                let roll = rng.random_range(0..100);
                if keep.contains(&room.tile(lx, ly)) || roll >= wall + swamp {
                    TerrainKind::Plain
                } else if roll < wall {
                    TerrainKind::Wall
                } else {
                    TerrainKind::Swamp
                }
            });
            (room, terrain)
        })
        .collect()
}

/// Each step of `path` is one king move from the previous tile.
pub(crate) fn assert_contiguous(origin: WorldPosition, path: &[WorldPosition]) {
    let mut prev = origin;
    for &p in path {
        assert_eq!(prev.range_to(p), 1, "{prev} -> {p} is not a single step");
        prev = p;
    }
}
