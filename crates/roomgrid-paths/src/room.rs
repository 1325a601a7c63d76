//! Room resolution and the per-search room table.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use roomgrid_core::MapPosition;

use crate::terrain::{CostMatrix, IMPASSABLE, RoomTerrain, TerrainKind, TerrainStore};

/// Maximum number of rooms a single search may enter.
pub const MAX_ROOMS: usize = 16;

// ---------------------------------------------------------------------------
// Room sources
// ---------------------------------------------------------------------------

/// What a [`RoomSource`] decided about a room.
#[derive(Debug, Clone)]
pub enum RoomResolution {
    /// The room may be searched, optionally with per-tile cost overrides.
    Open(Option<Arc<CostMatrix>>),
    /// The room must not be entered.
    Blocked,
}

/// Error reported by a [`RoomSource`]. The room is then treated as blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError(pub String);

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room resolution failed: {}", self.0)
    }
}

impl std::error::Error for ResolveError {}

/// Supplies per-room search data the first time a search touches a room.
///
/// Called at most once per room per search, synchronously, from inside the
/// search loop.
pub trait RoomSource {
    fn resolve(&mut self, room: MapPosition) -> Result<RoomResolution, ResolveError>;
}

impl<F> RoomSource for F
where
    F: FnMut(MapPosition) -> Result<RoomResolution, ResolveError>,
{
    fn resolve(&mut self, room: MapPosition) -> Result<RoomResolution, ResolveError> {
        self(room)
    }
}

/// Enters every room with its stored terrain and no overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl RoomSource for NoOverrides {
    fn resolve(&mut self, _room: MapPosition) -> Result<RoomResolution, ResolveError> {
        Ok(RoomResolution::Open(None))
    }
}

/// Cost matrices and blocked rooms known up front.
#[derive(Debug, Clone, Default)]
pub struct CostOverrides {
    costs: HashMap<MapPosition, Arc<CostMatrix>>,
    blocked: HashSet<MapPosition>,
}

impl CostOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `costs` whenever `room` is entered.
    pub fn insert(&mut self, room: MapPosition, costs: CostMatrix) -> &mut Self {
        self.costs.insert(room, Arc::new(costs));
        self
    }

    /// Never enter `room`.
    pub fn block(&mut self, room: MapPosition) -> &mut Self {
        self.blocked.insert(room);
        self
    }
}

impl RoomSource for CostOverrides {
    fn resolve(&mut self, room: MapPosition) -> Result<RoomResolution, ResolveError> {
        if self.blocked.contains(&room) {
            return Ok(RoomResolution::Blocked);
        }
        Ok(RoomResolution::Open(self.costs.get(&room).cloned()))
    }
}

// ---------------------------------------------------------------------------
// RoomInfo
// ---------------------------------------------------------------------------

/// Where a room's terrain comes from.
#[derive(Debug, Clone)]
pub(crate) enum TerrainSource {
    /// No bitmap was loaded; every tile is plain.
    AllPlain,
    Bitmap(Arc<RoomTerrain>),
}

/// Raw cost information of one tile, before plain/swamp costs are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tile {
    Override(u8),
    Terrain(TerrainKind),
}

/// Search context for one room.
#[derive(Debug, Clone)]
pub(crate) struct RoomInfo {
    pub(crate) room: MapPosition,
    terrain: TerrainSource,
    costs: Option<Arc<CostMatrix>>,
}

impl RoomInfo {
    #[inline]
    pub(crate) fn tile(&self, lx: u8, ly: u8) -> Tile {
        if let Some(costs) = &self.costs {
            let c = costs.get(lx, ly);
            if c != 0 {
                return Tile::Override(c);
            }
        }
        match &self.terrain {
            TerrainSource::AllPlain => Tile::Terrain(TerrainKind::Plain),
            TerrainSource::Bitmap(t) => Tile::Terrain(t.get(lx, ly)),
        }
    }
}

impl Tile {
    /// Movement cost of the tile, or `None` if it cannot be entered.
    #[inline]
    pub(crate) fn cost(self, plain_cost: u32, swamp_cost: u32) -> Option<u32> {
        match self {
            Self::Override(IMPASSABLE) => None,
            Self::Override(c) => Some(u32::from(c)),
            Self::Terrain(TerrainKind::Plain) => Some(plain_cost),
            Self::Terrain(TerrainKind::Swamp) => Some(swamp_cost),
            Self::Terrain(TerrainKind::Wall) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomTable
// ---------------------------------------------------------------------------

const NO_SLOT: u8 = u8::MAX;

/// Binds the rooms touched by one search to compact slots.
///
/// Slots are assigned in the order rooms are first resolved and never change
/// for the rest of the search.
pub(crate) struct RoomTable {
    rooms: Vec<RoomInfo>,
    /// Slot of each room, indexed by packed room id.
    reverse: Vec<u8>,
    blocked: HashSet<MapPosition>,
    max_rooms: usize,
}

impl RoomTable {
    pub(crate) fn new() -> Self {
        Self {
            rooms: Vec::with_capacity(MAX_ROOMS),
            reverse: vec![NO_SLOT; 1 << 16],
            blocked: HashSet::new(),
            max_rooms: MAX_ROOMS,
        }
    }

    /// Forget every room and accept up to `max_rooms` new ones.
    pub(crate) fn reset(&mut self, max_rooms: usize) {
        for info in self.rooms.drain(..) {
            self.reverse[info.room.id() as usize] = NO_SLOT;
        }
        self.blocked.clear();
        self.max_rooms = max_rooms.min(MAX_ROOMS);
    }

    /// Slot of `room`, loading it through `source` on first use.
    ///
    /// Returns `None` if the room is blocked, the source failed, or the table
    /// is full.
    pub(crate) fn resolve(
        &mut self,
        room: MapPosition,
        store: &TerrainStore,
        source: &mut dyn RoomSource,
    ) -> Option<usize> {
        let slot = self.reverse[room.id() as usize];
        if slot != NO_SLOT {
            return Some(slot as usize);
        }
        if self.blocked.contains(&room) {
            return None;
        }
        if self.rooms.len() >= self.max_rooms {
            log::debug!("room {room} refused: room table full ({} rooms)", self.max_rooms);
            self.blocked.insert(room);
            return None;
        }

        let costs = match source.resolve(room) {
            Ok(RoomResolution::Open(costs)) => costs,
            Ok(RoomResolution::Blocked) => {
                log::debug!("room {room} blocked by room source");
                self.blocked.insert(room);
                return None;
            }
            Err(e) => {
                log::warn!("room {room} treated as blocked: {e}");
                self.blocked.insert(room);
                return None;
            }
        };
        let terrain = match store.get(room) {
            Some(t) => TerrainSource::Bitmap(Arc::clone(t)),
            None => {
                log::trace!("room {room} has no terrain loaded, searching it as all plain");
                TerrainSource::AllPlain
            }
        };

        let slot = self.rooms.len();
        self.rooms.push(RoomInfo {
            room,
            terrain,
            costs,
        });
        self.reverse[room.id() as usize] = slot as u8;
        log::debug!("room {room} loaded into slot {slot}");
        Some(slot)
    }

    #[inline]
    pub(crate) fn get(&self, slot: usize) -> &RoomInfo {
        &self.rooms[slot]
    }

    pub(crate) fn len(&self) -> usize {
        self.rooms.len()
    }
}
