//! Search inputs: goals, tuning options and the request bundle.

use roomgrid_core::WorldPosition;

use crate::error::SearchError;
use crate::room::MAX_ROOMS;

/// A position to reach, accepted anywhere within `range` tiles (Chebyshev).
///
/// In flee mode the meaning flips: the search ends once it is more than
/// `range` tiles away from every goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    pub pos: WorldPosition,
    pub range: u16,
}

impl Goal {
    pub const fn new(pos: WorldPosition, range: u16) -> Self {
        Self { pos, range }
    }

    /// A goal that only accepts `pos` itself.
    pub const fn exact(pos: WorldPosition) -> Self {
        Self { pos, range: 0 }
    }
}

/// Node expansion strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Plain A*: every node expands its eight neighbours.
    AStar,
    /// A* with jump point pruning along uniform-cost rays.
    #[default]
    JumpPoint,
}

/// Tuning parameters for one search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchOptions {
    /// Cost of entering a plain tile.
    pub plain_cost: u32,
    /// Cost of entering a swamp tile.
    pub swamp_cost: u32,
    /// Number of distinct rooms the search may enter (1..=16).
    pub max_rooms: u8,
    /// Node expansions allowed before giving up.
    pub max_ops: u32,
    /// Highest g-cost a node may carry before the search gives up.
    pub max_cost: u32,
    /// Move away from the goals instead of towards them.
    pub flee: bool,
    /// Multiplier on the heuristic; 1 keeps A* admissible, larger values
    /// trade path quality for fewer expansions.
    pub heuristic_weight: f64,
    pub algorithm: Algorithm,
    /// Expand jump edges into single steps in the returned path.
    pub interpolate: bool,
    /// On room border tiles only allow moves that cross straight into the
    /// neighbouring room or step back inside.
    pub border_exits: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            plain_cost: 1,
            swamp_cost: 5,
            max_rooms: MAX_ROOMS as u8,
            max_ops: 2000,
            max_cost: u32::MAX,
            flee: false,
            heuristic_weight: 1.2,
            algorithm: Algorithm::JumpPoint,
            interpolate: true,
            border_exits: false,
        }
    }
}

impl SearchOptions {
    /// Reject option values no search can run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.heuristic_weight.is_finite() || self.heuristic_weight < 1.0 {
            return Err(SearchError::InvalidWeight(self.heuristic_weight));
        }
        if self.max_rooms == 0 || self.max_rooms as usize > MAX_ROOMS {
            return Err(SearchError::InvalidRoomLimit(self.max_rooms));
        }
        Ok(())
    }
}

/// Everything one search call needs besides terrain and room data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchRequest {
    pub origin: WorldPosition,
    pub goals: Vec<Goal>,
    pub options: SearchOptions,
}

impl SearchRequest {
    /// A request with default options.
    pub fn new(origin: WorldPosition, goals: Vec<Goal>) -> Self {
        Self {
            origin,
            goals,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Check positions and options before searching.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.goals.is_empty() {
            return Err(SearchError::NoGoals);
        }
        if self.origin.is_null() || self.goals.iter().any(|g| g.pos.is_null()) {
            return Err(SearchError::NullPosition);
        }
        let mut positions = std::iter::once(self.origin).chain(self.goals.iter().map(|g| g.pos));
        if let Some(pos) = positions.find(|p| !p.in_world()) {
            return Err(SearchError::OutOfBounds(pos));
        }
        self.options.validate()
    }
}
