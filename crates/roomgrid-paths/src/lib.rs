//! Multi-room grid pathfinding.
//!
//! The world is a plane of 50x50 rooms. A search may enter up to
//! [`MAX_ROOMS`] of them, resolving each through a [`RoomSource`] the first
//! time it is touched, and runs either plain A* or A* with jump point pruning
//! ([`Algorithm`]). Searches are bounded by an expansion budget and a cost
//! ceiling; when either runs out the result still carries a best-effort path.
//!
//! ```
//! use std::sync::Arc;
//! use roomgrid_core::MapPosition;
//! use roomgrid_paths::{Goal, NoOverrides, PathFinder, SearchRequest, SearchStatus, TerrainStore};
//!
//! let room = MapPosition::new(10, 10);
//! let mut finder = PathFinder::new(Arc::new(TerrainStore::new()));
//! let target = room.tile(20, 12);
//! let request = SearchRequest::new(room.tile(5, 5), vec![Goal::new(target, 1)]);
//! let result = finder.search(&request, &mut NoOverrides).unwrap();
//! assert_eq!(result.status, SearchStatus::Found);
//! assert_eq!(result.path.last().map(|p| p.range_to(target)), Some(1));
//! ```
//!
//! # Pieces
//!
//! | Item | Role |
//! |---|---|
//! | [`TerrainStore`] | Read-only 2-bit terrain per room, shared between finders |
//! | [`RoomSource`] | Per-search room admission and cost overrides |
//! | [`PathFinder`] | One reusable search instance |
//! | [`FinderPool`] | Idle finders shared between threads |
//! | [`PriorityQueue`] | Open list; [`ScanHeap`] by default, [`IndexedHeap`] for large searches |

mod astar;
mod error;
mod finder;
mod heap;
mod jps;
mod open_closed;
mod options;
mod pool;
mod room;
mod terrain;

#[cfg(test)]
mod testutil;

pub use error::SearchError;
pub use finder::{MAX_TILES, PathFinder, SearchResult, SearchStatus};
pub use heap::{HeapFull, IndexedHeap, PriorityQueue, ScanHeap};
pub use open_closed::OpenClosed;
pub use options::{Algorithm, Goal, SearchOptions, SearchRequest};
pub use pool::FinderPool;
pub use room::{CostOverrides, MAX_ROOMS, NoOverrides, ResolveError, RoomResolution, RoomSource};
pub use terrain::{
    CostMatrix, IMPASSABLE, RoomTerrain, TERRAIN_BYTES, TerrainError, TerrainKind, TerrainStore,
};
