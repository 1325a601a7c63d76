//! Geometry primitives: [`MapPosition`], [`WorldPosition`] and [`Direction`].
//!
//! Tiles live on a single continuous plane in which room `(rx, ry)` covers
//! the block `[rx * 50, rx * 50 + 50) × [ry * 50, ry * 50 + 50)`. Y grows
//! down, so [`Direction::Top`] decreases y.

use std::cmp::Ordering;
use std::fmt;

/// Side length of a room, in tiles.
pub const ROOM_SIZE: u16 = 50;

/// Number of tiles in one room.
pub const ROOM_AREA: usize = (ROOM_SIZE as usize) * (ROOM_SIZE as usize);

/// Side length of the world plane, in tiles (256 rooms).
pub const WORLD_SIZE: u16 = 256 * ROOM_SIZE;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the eight compass directions, clockwise from the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Direction {
    /// All directions in clockwise order, starting at [`Direction::Top`].
    pub const ALL: [Direction; 8] = [
        Direction::Top,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
        Direction::Left,
        Direction::TopLeft,
    ];

    /// Unit step `(dx, dy)` of this direction.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Top => (0, -1),
            Self::TopRight => (1, -1),
            Self::Right => (1, 0),
            Self::BottomRight => (1, 1),
            Self::Bottom => (0, 1),
            Self::BottomLeft => (-1, 1),
            Self::Left => (-1, 0),
            Self::TopLeft => (-1, -1),
        }
    }

    /// Direction matching the signs of `(dx, dy)`. `None` for `(0, 0)`.
    ///
    /// Only the signs matter, so `(5, -2)` maps to [`Direction::TopRight`].
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        let dir = match (dx.signum(), dy.signum()) {
            (0, -1) => Self::Top,
            (1, -1) => Self::TopRight,
            (1, 0) => Self::Right,
            (1, 1) => Self::BottomRight,
            (0, 1) => Self::Bottom,
            (-1, 1) => Self::BottomLeft,
            (-1, 0) => Self::Left,
            (-1, -1) => Self::TopLeft,
            _ => return None,
        };
        Some(dir)
    }

    /// Whether this is one of the four diagonal directions.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    /// The direction pointing the other way.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::TopRight => Self::BottomLeft,
            Self::Right => Self::Left,
            Self::BottomRight => Self::TopLeft,
            Self::Bottom => Self::Top,
            Self::BottomLeft => Self::TopRight,
            Self::Left => Self::Right,
            Self::TopLeft => Self::BottomRight,
        }
    }
}

// ---------------------------------------------------------------------------
// MapPosition
// ---------------------------------------------------------------------------

/// Address of a room in the global room grid.
///
/// The pair packs into a 16-bit [`id`](Self::id) (x in the low byte, y in the
/// high byte), which is what terrain bulk loads are keyed by.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapPosition {
    pub x: u8,
    pub y: u8,
}

impl MapPosition {
    /// Create a new room position.
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Unpack a room position from its 16-bit id.
    #[inline]
    pub const fn from_id(id: u16) -> Self {
        Self {
            x: (id & 0xff) as u8,
            y: (id >> 8) as u8,
        }
    }

    /// Packed 16-bit id of this room.
    #[inline]
    pub const fn id(self) -> u16 {
        self.x as u16 | (self.y as u16) << 8
    }

    /// World position of this room's top-left tile.
    #[inline]
    pub const fn origin(self) -> WorldPosition {
        WorldPosition::new(self.x as u16 * ROOM_SIZE, self.y as u16 * ROOM_SIZE)
    }

    /// World position of local tile `(lx, ly)` in this room.
    #[inline]
    pub const fn tile(self, lx: u8, ly: u8) -> WorldPosition {
        WorldPosition::new(
            self.x as u16 * ROOM_SIZE + lx as u16,
            self.y as u16 * ROOM_SIZE + ly as u16,
        )
    }
}

impl PartialOrd for MapPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MapPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }
}

impl fmt::Display for MapPosition {
    /// Formats as a room name: `W0N0` is `(127, 127)`, `E0S0` is `(128, 128)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (we, xx) = if self.x <= 127 {
            ('W', 127 - self.x)
        } else {
            ('E', self.x - 128)
        };
        let (ns, yy) = if self.y <= 127 {
            ('N', 127 - self.y)
        } else {
            ('S', self.y - 128)
        };
        write!(f, "{we}{xx}{ns}{yy}")
    }
}

// ---------------------------------------------------------------------------
// WorldPosition
// ---------------------------------------------------------------------------

/// Address of a tile on the continuous world plane.
///
/// Valid positions have both coordinates below [`WORLD_SIZE`]. The origin
/// `(0, 0)` is reserved as the [`NULL`](Self::NULL) sentinel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPosition {
    pub x: u16,
    pub y: u16,
}

impl WorldPosition {
    /// The "no position" sentinel.
    pub const NULL: Self = Self { x: 0, y: 0 };

    /// Create a new world position.
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Whether both coordinates are below [`WORLD_SIZE`].
    #[inline]
    pub const fn in_world(self) -> bool {
        self.x < WORLD_SIZE && self.y < WORLD_SIZE
    }

    /// The room containing this tile. Only meaningful when
    /// [`in_world`](Self::in_world) holds.
    #[inline]
    pub const fn map_position(self) -> MapPosition {
        MapPosition::new((self.x / ROOM_SIZE) as u8, (self.y / ROOM_SIZE) as u8)
    }

    /// Coordinates of this tile inside its room.
    #[inline]
    pub const fn local(self) -> (u8, u8) {
        ((self.x % ROOM_SIZE) as u8, (self.y % ROOM_SIZE) as u8)
    }

    /// Column-major offset of this tile inside its room (`lx * 50 + ly`).
    #[inline]
    pub const fn local_index(self) -> usize {
        (self.x % ROOM_SIZE) as usize * ROOM_SIZE as usize + (self.y % ROOM_SIZE) as usize
    }

    /// Whether the tile lies on the outer ring of its room.
    #[inline]
    pub const fn is_room_border(self) -> bool {
        let (lx, ly) = self.local();
        lx == 0 || ly == 0 || lx == ROOM_SIZE as u8 - 1 || ly == ROOM_SIZE as u8 - 1
    }

    /// Shift by `(dx, dy)`. `None` if the result leaves the world plane.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = u16::try_from(i32::from(self.x) + dx).ok()?;
        let y = u16::try_from(i32::from(self.y) + dy).ok()?;
        let pos = Self { x, y };
        pos.in_world().then_some(pos)
    }

    /// The adjacent tile in direction `dir`.
    #[inline]
    pub fn neighbor(self, dir: Direction) -> Option<Self> {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// Chebyshev distance to `other`.
    #[inline]
    pub const fn range_to(self, other: Self) -> u16 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// Compass direction towards `other`, following the signs of the deltas.
    ///
    /// Returns `None` when both positions are equal.
    #[inline]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::from_delta(
            i32::from(other.x) - i32::from(self.x),
            i32::from(other.y) - i32::from(self.y),
        )
    }
}

impl fmt::Display for WorldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lx, ly) = self.local();
        write!(f, "[{}] {lx}, {ly}", self.map_position())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_position_id_packing() {
        let m = MapPosition::new(129, 126);
        assert_eq!(m.id(), 129 | 126 << 8);
        assert_eq!(MapPosition::from_id(m.id()), m);
        assert_eq!(MapPosition::from_id(0xffff), MapPosition::new(255, 255));
    }

    #[test]
    fn map_position_orders_by_id() {
        let a = MapPosition::new(200, 1);
        let b = MapPosition::new(0, 2);
        assert!(a < b);
    }

    #[test]
    fn room_names() {
        assert_eq!(MapPosition::new(127, 127).to_string(), "W0N0");
        assert_eq!(MapPosition::new(128, 128).to_string(), "E0S0");
        assert_eq!(MapPosition::new(129, 126).to_string(), "E1N1");
        assert_eq!(MapPosition::new(0, 255).to_string(), "W127S127");
    }

    #[test]
    fn world_position_room_and_local() {
        let p = WorldPosition::new(129 * 50 + 7, 126 * 50 + 49);
        assert_eq!(p.map_position(), MapPosition::new(129, 126));
        assert_eq!(p.local(), (7, 49));
        assert_eq!(p.local_index(), 7 * 50 + 49);
        assert!(p.is_room_border());
        assert_eq!(MapPosition::new(129, 126).tile(7, 49), p);
        assert_eq!(p.to_string(), "[E1N1] 7, 49");
    }

    #[test]
    fn border_detection() {
        let room = MapPosition::new(3, 3);
        assert!(room.tile(0, 10).is_room_border());
        assert!(room.tile(10, 0).is_room_border());
        assert!(room.tile(49, 49).is_room_border());
        assert!(!room.tile(1, 48).is_room_border());
    }

    #[test]
    fn null_sentinel() {
        assert!(WorldPosition::NULL.is_null());
        assert!(WorldPosition::default().is_null());
        assert!(!WorldPosition::new(0, 1).is_null());
    }

    #[test]
    fn neighbors_step_one_tile() {
        let p = WorldPosition::new(100, 100);
        for dir in Direction::ALL {
            let n = p.neighbor(dir).unwrap();
            assert_eq!(p.range_to(n), 1);
            assert_eq!(p.direction_to(n), Some(dir));
            assert_eq!(n.neighbor(dir.opposite()), Some(p));
        }
    }

    #[test]
    fn offset_guards_plane_edges() {
        assert_eq!(WorldPosition::new(0, 5).neighbor(Direction::Left), None);
        assert_eq!(WorldPosition::new(5, 0).neighbor(Direction::TopRight), None);
        assert_eq!(WorldPosition::new(u16::MAX, 5).offset(1, 0), None);
        let last = MapPosition::new(255, 255).tile(49, 49);
        assert_eq!(last.offset(1, 0), None);
        assert_eq!(last.offset(0, 1), None);
        assert_eq!(last.offset(-1, -1).map(|p| p.map_position()), Some(MapPosition::new(255, 255)));
        assert_eq!(
            WorldPosition::new(1, 1).offset(-1, 0),
            Some(WorldPosition::new(0, 1))
        );
    }

    #[test]
    fn world_bounds() {
        assert!(MapPosition::new(255, 255).tile(49, 49).in_world());
        assert!(!WorldPosition::new(WORLD_SIZE, 5).in_world());
        assert!(!WorldPosition::new(5, WORLD_SIZE + 50).in_world());
    }

    #[test]
    fn chebyshev_range() {
        let a = WorldPosition::new(10, 10);
        assert_eq!(a.range_to(WorldPosition::new(13, 5)), 5);
        assert_eq!(a.range_to(WorldPosition::new(7, 12)), 3);
        assert_eq!(a.range_to(a), 0);
    }

    #[test]
    fn direction_to_follows_signs() {
        let a = WorldPosition::new(10, 10);
        assert_eq!(a.direction_to(WorldPosition::new(20, 3)), Some(Direction::TopRight));
        assert_eq!(a.direction_to(WorldPosition::new(3, 3)), Some(Direction::TopLeft));
        assert_eq!(a.direction_to(WorldPosition::new(10, 30)), Some(Direction::Bottom));
        assert_eq!(a.direction_to(WorldPosition::new(4, 10)), Some(Direction::Left));
        assert_eq!(a.direction_to(a), None);
    }

    #[test]
    fn direction_helpers() {
        assert!(Direction::TopLeft.is_diagonal());
        assert!(!Direction::Bottom.is_diagonal());
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(-3, 7), Some(Direction::BottomLeft));
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn world_position_round_trip() {
        let p = WorldPosition::new(6407, 6349);
        let json = serde_json::to_string(&p).unwrap();
        let back: WorldPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn direction_round_trip() {
        let json = serde_json::to_string(&Direction::BottomLeft).unwrap();
        let back: Direction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Direction::BottomLeft);
    }
}
