use std::fmt;

use roomgrid_core::{MapPosition, WorldPosition};

use crate::heap::HeapFull;

/// Errors that abort a search call.
///
/// A search that merely fails to reach its goals is not an error; see
/// [`SearchStatus`](crate::SearchStatus).
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The request has no goals.
    NoGoals,
    /// The origin or a goal is the reserved null position.
    NullPosition,
    /// The origin or a goal lies outside the world plane.
    OutOfBounds(WorldPosition),
    /// `heuristic_weight` is not a finite number >= 1.
    InvalidWeight(f64),
    /// `max_rooms` is outside `1..=16`.
    InvalidRoomLimit(u8),
    /// The origin's room could not be entered.
    OriginUnavailable(MapPosition),
    /// The open list outgrew the priority queue.
    HeapFull { capacity: usize },
    /// The finder was abandoned mid-search by a panic and cannot be reused.
    InUse,
}

impl SearchError {
    /// Whether the error stems from malformed input rather than exhaustion.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::HeapFull { .. } | Self::InUse)
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoGoals => write!(f, "search has no goals"),
            Self::NullPosition => write!(f, "search position is the null position"),
            Self::OutOfBounds(pos) => {
                write!(f, "position ({}, {}) is outside the world", pos.x, pos.y)
            }
            Self::InvalidWeight(w) => write!(f, "invalid heuristic weight {w}"),
            Self::InvalidRoomLimit(n) => write!(f, "max_rooms must be 1..=16, got {n}"),
            Self::OriginUnavailable(room) => write!(f, "origin room {room} cannot be entered"),
            Self::HeapFull { capacity } => {
                write!(f, "open list exceeded {capacity} entries")
            }
            Self::InUse => write!(f, "path finder is already in use"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<HeapFull> for SearchError {
    fn from(e: HeapFull) -> Self {
        Self::HeapFull {
            capacity: e.capacity,
        }
    }
}
