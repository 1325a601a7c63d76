//! Coordinate types for tiled multi-room worlds.
//!
//! A world is a 256×256 grid of square rooms, each [`ROOM_SIZE`] tiles on a
//! side. Rooms are addressed by [`MapPosition`]; tiles are addressed on one
//! continuous plane by [`WorldPosition`], so that positions in different
//! rooms can be compared, differenced and hashed uniformly.

pub mod geom;

pub use geom::{Direction, MapPosition, ROOM_AREA, ROOM_SIZE, WORLD_SIZE, WorldPosition};
