//! Random 2x2-room world searched with both algorithms.
//!
//! Run: cargo run --bin route -- [seed]
//!
//! Set `ROOMGRID_LOG` to `debug` or `trace` to see search logging on stderr.

use std::sync::Arc;

use rand::{Rng, RngExt, SeedableRng};
use roomgrid_core::{MapPosition, ROOM_SIZE, WorldPosition};
use roomgrid_paths::{
    Algorithm, CostMatrix, CostOverrides, Goal, IMPASSABLE, PathFinder, RoomTerrain,
    SearchOptions, SearchRequest, SearchResult, TerrainKind, TerrainStore,
};
use tracing_subscriber::EnvFilter;

const ROOMS: [MapPosition; 4] = [
    MapPosition::new(20, 20),
    MapPosition::new(21, 20),
    MapPosition::new(20, 21),
    MapPosition::new(21, 21),
];

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Route `log` records from the library through a `tracing` subscriber,
/// filtered by `ROOMGRID_LOG` (default `warn`).
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("ROOMGRID_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

fn random_world(rng: &mut impl Rng) -> TerrainStore {
    ROOMS
        .iter()
        .map(|&room| {
            let terrain = RoomTerrain::from_fn(|_, _| match rng.random_range(0..100) {
                0..18 => TerrainKind::Wall,
                18..30 => TerrainKind::Swamp,
                _ => TerrainKind::Plain,
            });
            (room, terrain)
        })
        .collect()
}

/// A paved road across the bottom-left room, with one broken tile.
fn road() -> CostMatrix {
    let mut costs = CostMatrix::new();
    for lx in 0..ROOM_SIZE as u8 {
        costs.set(lx, 25, 1);
    }
    costs.set(30, 25, IMPASSABLE);
    costs
}

fn clear(store: &mut TerrainStore, pos: WorldPosition) {
    let room = pos.map_position();
    if let Some(terrain) = store.get(room) {
        let mut terrain = RoomTerrain::clone(terrain);
        let (lx, ly) = pos.local();
        terrain.set(lx, ly, TerrainKind::Plain);
        store.insert(room, terrain);
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn render(store: &TerrainStore, origin: WorldPosition, result: &SearchResult) {
    let top_left = ROOMS[0].origin();
    let size = 2 * ROOM_SIZE;
    for y in 0..size {
        let line: String = (0..size)
            .map(|x| {
                let pos = WorldPosition::new(top_left.x + x, top_left.y + y);
                if pos == origin {
                    return '@';
                }
                if result.path.last() == Some(&pos) {
                    return 'X';
                }
                if result.path.contains(&pos) {
                    return '*';
                }
                let (lx, ly) = pos.local();
                match store.get(pos.map_position()).map(|t| t.get(lx, ly)) {
                    Some(TerrainKind::Wall) => '#',
                    Some(TerrainKind::Swamp) => '~',
                    _ => '.',
                }
            })
            .collect();
        println!("{line}");
    }
}

fn report(name: &str, result: &SearchResult) {
    println!(
        "{name:<10} {:?}: {} steps, cost {}, {} ops{}",
        result.status,
        result.path.len(),
        result.cost,
        result.ops,
        if result.incomplete { " (incomplete)" } else { "" }
    );
}

fn main() {
    init_logging();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let origin = ROOMS[0].tile(2, 2);
    let goal = ROOMS[3].tile(47, 47);
    let mut store = random_world(&mut rng);
    clear(&mut store, origin);
    clear(&mut store, goal);
    let store = Arc::new(store);

    let mut overrides = CostOverrides::new();
    overrides.insert(ROOMS[2], road());

    let mut finder = PathFinder::new(Arc::clone(&store));
    let mut last = None;
    for algorithm in [Algorithm::AStar, Algorithm::JumpPoint] {
        let request = SearchRequest::new(origin, vec![Goal::exact(goal)]).with_options(
            SearchOptions {
                algorithm,
                max_ops: 20_000,
                ..Default::default()
            },
        );
        match finder.search(&request, &mut overrides) {
            Ok(result) => {
                report(&format!("{algorithm:?}"), &result);
                last = Some(result);
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    if let Some(result) = last {
        println!();
        render(&store, origin, &result);
    }
}
