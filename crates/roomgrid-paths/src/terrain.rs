//! Per-room terrain bitmaps, cost-matrix overrides and the shared store.
//!
//! Both [`RoomTerrain`] and [`CostMatrix`] address tile `(lx, ly)` at the
//! column-major offset `lx * 50 + ly`, matching
//! [`WorldPosition::local_index`](roomgrid_core::WorldPosition::local_index).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use roomgrid_core::{MapPosition, ROOM_AREA, ROOM_SIZE};

/// Size in bytes of a packed terrain bitmap (2 bits per tile).
pub const TERRAIN_BYTES: usize = ROOM_AREA / 4;

/// Cost-matrix value treated as impassable.
pub const IMPASSABLE: u8 = u8::MAX;

/// Terrain class of a single tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TerrainKind {
    Plain,
    Wall,
    Swamp,
}

impl TerrainKind {
    /// Decode a 2-bit terrain code. The reserved code 3 reads as a wall.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Plain,
            2 => Self::Swamp,
            _ => Self::Wall,
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Plain => 0,
            Self::Wall => 1,
            Self::Swamp => 2,
        }
    }
}

#[inline]
fn tile_offset(lx: u8, ly: u8) -> usize {
    debug_assert!(u16::from(lx) < ROOM_SIZE && u16::from(ly) < ROOM_SIZE);
    lx as usize * ROOM_SIZE as usize + ly as usize
}

// ---------------------------------------------------------------------------
// RoomTerrain
// ---------------------------------------------------------------------------

/// 2-bit-per-tile terrain bitmap for one room, four tiles per byte.
#[derive(Clone, PartialEq, Eq)]
pub struct RoomTerrain {
    bits: Box<[u8; TERRAIN_BYTES]>,
}

impl Default for RoomTerrain {
    fn default() -> Self {
        Self::plain()
    }
}

impl RoomTerrain {
    /// A room where every tile is plain.
    pub fn plain() -> Self {
        Self {
            bits: Box::new([0; TERRAIN_BYTES]),
        }
    }

    /// Wrap an already packed bitmap.
    pub fn from_packed(bytes: &[u8]) -> Result<Self, TerrainError> {
        let bits: [u8; TERRAIN_BYTES] =
            bytes.try_into().map_err(|_| TerrainError::BadLength {
                expected: TERRAIN_BYTES,
                actual: bytes.len(),
            })?;
        Ok(Self {
            bits: Box::new(bits),
        })
    }

    /// Build a room by asking `f` for the terrain of every local tile.
    pub fn from_fn(mut f: impl FnMut(u8, u8) -> TerrainKind) -> Self {
        let mut terrain = Self::plain();
        for lx in 0..ROOM_SIZE as u8 {
            for ly in 0..ROOM_SIZE as u8 {
                terrain.set(lx, ly, f(lx, ly));
            }
        }
        terrain
    }

    /// Terrain of local tile `(lx, ly)`.
    #[inline]
    pub fn get(&self, lx: u8, ly: u8) -> TerrainKind {
        let i = tile_offset(lx, ly);
        TerrainKind::from_bits(self.bits[i / 4] >> (i % 4 * 2))
    }

    /// Overwrite the terrain of local tile `(lx, ly)`.
    pub fn set(&mut self, lx: u8, ly: u8, kind: TerrainKind) {
        let i = tile_offset(lx, ly);
        let shift = i % 4 * 2;
        let byte = &mut self.bits[i / 4];
        *byte = (*byte & !(0x03 << shift)) | (kind.bits() << shift);
    }

    /// The packed bitmap.
    pub fn packed(&self) -> &[u8] {
        &self.bits[..]
    }
}

impl fmt::Debug for RoomTerrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let walls = self.bits.iter().map(|b| {
            (0..4)
                .filter(|k| TerrainKind::from_bits(b >> (k * 2)) == TerrainKind::Wall)
                .count()
        });
        f.debug_struct("RoomTerrain")
            .field("walls", &walls.sum::<usize>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// CostMatrix
// ---------------------------------------------------------------------------

/// Per-tile cost overrides for one room.
///
/// A zero byte defers to terrain. Any other value is the tile's movement
/// cost outright, with [`IMPASSABLE`] blocking the tile.
#[derive(Clone, PartialEq, Eq)]
pub struct CostMatrix {
    costs: Box<[u8; ROOM_AREA]>,
}

impl Default for CostMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl CostMatrix {
    /// A matrix with no overrides.
    pub fn new() -> Self {
        Self {
            costs: Box::new([0; ROOM_AREA]),
        }
    }

    /// Wrap 2500 raw override bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TerrainError> {
        let costs: [u8; ROOM_AREA] = bytes.try_into().map_err(|_| TerrainError::BadLength {
            expected: ROOM_AREA,
            actual: bytes.len(),
        })?;
        Ok(Self {
            costs: Box::new(costs),
        })
    }

    /// Override at local tile `(lx, ly)`; 0 means none.
    #[inline]
    pub fn get(&self, lx: u8, ly: u8) -> u8 {
        self.costs[tile_offset(lx, ly)]
    }

    pub fn set(&mut self, lx: u8, ly: u8, cost: u8) {
        self.costs[tile_offset(lx, ly)] = cost;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.costs[..]
    }
}

impl fmt::Debug for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overrides = self.costs.iter().filter(|&&c| c != 0).count();
        f.debug_struct("CostMatrix")
            .field("overrides", &overrides)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TerrainStore
// ---------------------------------------------------------------------------

/// Terrain bitmaps for every room a search may visit.
///
/// Build the store once, wrap it in an [`Arc`] and hand clones to each
/// [`PathFinder`](crate::PathFinder). The store is immutable once shared, so
/// any number of searches may read it concurrently; it is dropped when the
/// last finder referencing it goes away.
#[derive(Debug, Clone, Default)]
pub struct TerrainStore {
    rooms: HashMap<MapPosition, Arc<RoomTerrain>>,
}

impl TerrainStore {
    /// An empty store. Rooms missing from the store search as all-plain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load packed bitmaps keyed by packed room id.
    pub fn from_packed<I, B>(rooms: I) -> Result<Self, TerrainError>
    where
        I: IntoIterator<Item = (u16, B)>,
        B: AsRef<[u8]>,
    {
        let mut store = Self::new();
        for (id, bytes) in rooms {
            store.insert(MapPosition::from_id(id), RoomTerrain::from_packed(bytes.as_ref())?);
        }
        Ok(store)
    }

    /// Add or replace the terrain of one room.
    pub fn insert(&mut self, room: MapPosition, terrain: RoomTerrain) {
        self.rooms.insert(room, Arc::new(terrain));
    }

    pub fn get(&self, room: MapPosition) -> Option<&Arc<RoomTerrain>> {
        self.rooms.get(&room)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl FromIterator<(MapPosition, RoomTerrain)> for TerrainStore {
    fn from_iter<I: IntoIterator<Item = (MapPosition, RoomTerrain)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (room, terrain) in iter {
            store.insert(room, terrain);
        }
        store
    }
}

/// Errors raised while loading terrain or cost data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerrainError {
    /// A buffer did not have the required size.
    BadLength { expected: usize, actual: usize },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength { expected, actual } => {
                write!(f, "terrain: expected {expected} bytes, got {actual}")
            }
        }
    }
}

impl std::error::Error for TerrainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip_all_kinds() {
        let mut t = RoomTerrain::plain();
        t.set(0, 0, TerrainKind::Wall);
        t.set(0, 1, TerrainKind::Swamp);
        t.set(49, 49, TerrainKind::Swamp);
        t.set(12, 37, TerrainKind::Wall);
        assert_eq!(t.get(0, 0), TerrainKind::Wall);
        assert_eq!(t.get(0, 1), TerrainKind::Swamp);
        assert_eq!(t.get(0, 2), TerrainKind::Plain);
        assert_eq!(t.get(49, 49), TerrainKind::Swamp);
        assert_eq!(t.get(12, 37), TerrainKind::Wall);
        t.set(12, 37, TerrainKind::Plain);
        assert_eq!(t.get(12, 37), TerrainKind::Plain);
    }

    #[test]
    fn packed_layout_is_column_major() {
        // Tile (0, 1) is offset 1: second pair of bits in byte 0.
        // Tile (1, 0) is offset 50: byte 12, third pair of bits.
        let mut bytes = vec![0u8; TERRAIN_BYTES];
        bytes[0] = 0b0000_1000;
        bytes[12] = 0b0001_0000;
        let t = RoomTerrain::from_packed(&bytes).unwrap();
        assert_eq!(t.get(0, 1), TerrainKind::Swamp);
        assert_eq!(t.get(1, 0), TerrainKind::Wall);
        assert_eq!(t.get(0, 0), TerrainKind::Plain);
        assert_eq!(t.packed(), &bytes[..]);
    }

    #[test]
    fn reserved_code_reads_as_wall() {
        assert_eq!(TerrainKind::from_bits(3), TerrainKind::Wall);
    }

    #[test]
    fn from_fn_visits_every_tile() {
        let t = RoomTerrain::from_fn(|lx, ly| {
            if lx == ly {
                TerrainKind::Wall
            } else {
                TerrainKind::Plain
            }
        });
        assert_eq!(t.get(7, 7), TerrainKind::Wall);
        assert_eq!(t.get(7, 8), TerrainKind::Plain);
    }

    #[test]
    fn bad_lengths_are_rejected() {
        assert_eq!(
            RoomTerrain::from_packed(&[0; 10]),
            Err(TerrainError::BadLength {
                expected: TERRAIN_BYTES,
                actual: 10
            })
        );
        assert!(CostMatrix::from_bytes(&[0; ROOM_AREA - 1]).is_err());
        assert!(CostMatrix::from_bytes(&[0; ROOM_AREA]).is_ok());
    }

    #[test]
    fn store_bulk_load_by_packed_id() {
        let room = MapPosition::new(129, 126);
        let mut t = RoomTerrain::plain();
        t.set(3, 4, TerrainKind::Wall);
        let store = TerrainStore::from_packed([(room.id(), t.packed().to_vec())]).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(room).unwrap().get(3, 4), TerrainKind::Wall);
        assert!(store.get(MapPosition::new(0, 0)).is_none());
    }

    #[test]
    fn cost_matrix_overrides() {
        let mut m = CostMatrix::new();
        assert_eq!(m.get(10, 10), 0);
        m.set(10, 10, IMPASSABLE);
        assert_eq!(m.get(10, 10), IMPASSABLE);
        assert_eq!(m.as_bytes()[10 * 50 + 10], IMPASSABLE);
    }
}
