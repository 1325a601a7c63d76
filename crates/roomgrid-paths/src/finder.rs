use std::sync::Arc;

use roomgrid_core::{ROOM_AREA, ROOM_SIZE, WorldPosition};

use crate::error::SearchError;
use crate::heap::{PriorityQueue, ScanHeap};
use crate::open_closed::OpenClosed;
use crate::options::{Algorithm, Goal, SearchOptions, SearchRequest};
use crate::room::{MAX_ROOMS, RoomSource, RoomTable};
use crate::terrain::TerrainStore;

/// Size of the node index space: every tile of every room a search may enter.
pub const MAX_TILES: usize = ROOM_AREA * MAX_ROOMS;

/// Movement cost of a tile that cannot be entered.
pub(crate) const OBSTACLE: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// A node satisfying the goals was reached.
    Found,
    /// Every reachable node was expanded without satisfying the goals.
    NotFound,
    /// `max_ops` expansions were spent.
    OpsExceeded,
    /// The cheapest open node cost more than `max_cost`.
    CostExceeded,
}

/// Outcome of one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub status: SearchStatus,
    /// Tiles from the first step after the origin to the terminal node.
    ///
    /// Empty when the origin already satisfies the goals or nothing was
    /// found. When a budget runs out this leads to the expanded node with the
    /// lowest heuristic.
    pub path: Vec<WorldPosition>,
    /// Node expansions performed.
    pub ops: u32,
    /// Total movement cost of `path`.
    pub cost: u32,
    /// Whether `path` stops short of the goals.
    pub incomplete: bool,
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// A reusable search instance.
///
/// `PathFinder` owns every per-search buffer (room table, open/closed set,
/// priority queue, parent and cost arrays) sized for [`MAX_ROOMS`] rooms, so
/// repeated searches allocate nothing after construction. Instances share
/// only the read-only [`TerrainStore`]; run concurrent searches on separate
/// instances, or through a [`FinderPool`](crate::FinderPool).
pub struct PathFinder<Q = ScanHeap> {
    store: Arc<TerrainStore>,
    pub(crate) rooms: RoomTable,
    pub(crate) open_closed: OpenClosed,
    pub(crate) heap: Q,
    pub(crate) parents: Vec<usize>,
    pub(crate) g_costs: Vec<u32>,
    in_use: bool,
}

impl PathFinder {
    /// A finder over `store` with the default linear-scan priority queue.
    pub fn new(store: Arc<TerrainStore>) -> Self {
        Self::with_heap_capacity(store, MAX_TILES)
    }
}

impl<Q: PriorityQueue> PathFinder<Q> {
    /// A finder whose open list holds at most `capacity` nodes.
    pub fn with_heap_capacity(store: Arc<TerrainStore>, capacity: usize) -> Self {
        Self {
            store,
            rooms: RoomTable::new(),
            open_closed: OpenClosed::new(MAX_TILES),
            heap: Q::with_capacity(MAX_TILES, capacity),
            parents: vec![0; MAX_TILES],
            g_costs: vec![0; MAX_TILES],
            in_use: false,
        }
    }

    /// The terrain this finder searches.
    pub fn store(&self) -> &Arc<TerrainStore> {
        &self.store
    }

    /// Whether a search is running, or was abandoned by a panic.
    pub fn is_in_use(&self) -> bool {
        self.in_use
    }

    /// Run one search.
    ///
    /// Rooms are resolved through `source` the first time the search touches
    /// them. Running out of ops or cost budget is reported through
    /// [`SearchResult::status`], not as an error.
    pub fn search(
        &mut self,
        request: &SearchRequest,
        source: &mut dyn RoomSource,
    ) -> Result<SearchResult, SearchError> {
        if self.in_use {
            return Err(SearchError::InUse);
        }
        request.validate()?;

        self.in_use = true;
        let store = Arc::clone(&self.store);
        let result = Search {
            finder: self,
            store: &store,
            source,
            goals: &request.goals,
            opts: &request.options,
        }
        .run(request.origin);
        self.in_use = false;
        result
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// State borrowed for the duration of one search call.
pub(crate) struct Search<'a, Q> {
    pub(crate) finder: &'a mut PathFinder<Q>,
    store: &'a TerrainStore,
    source: &'a mut dyn RoomSource,
    goals: &'a [Goal],
    pub(crate) opts: &'a SearchOptions,
}

/// Expanded node closest to the goals so far.
#[derive(Clone, Copy)]
struct Best {
    index: usize,
    h: u32,
    g: u32,
}

impl<Q: PriorityQueue> Search<'_, Q> {
    fn run(mut self, origin: WorldPosition) -> Result<SearchResult, SearchError> {
        self.finder.open_closed.clear();
        self.finder.heap.clear();
        self.finder.rooms.reset(self.opts.max_rooms as usize);

        log::debug!(
            "search from {origin}: {} goal(s), {:?}, flee={}",
            self.goals.len(),
            self.opts.algorithm,
            self.opts.flee
        );

        let Some(start) = self.index_of(origin) else {
            return Err(SearchError::OriginUnavailable(origin.map_position()));
        };
        let start_h = self.heuristic(origin);
        if start_h == 0 {
            return Ok(SearchResult {
                status: SearchStatus::Found,
                path: Vec::new(),
                ops: 0,
                cost: 0,
                incomplete: false,
            });
        }

        let priority = self.weighted(start_h);
        let finder = &mut *self.finder;
        finder.parents[start] = start;
        finder.g_costs[start] = 0;
        finder.heap.insert(start, priority)?;
        finder.open_closed.open(start);

        let mut best = Best {
            index: start,
            h: start_h,
            g: 0,
        };
        let mut ops = 0;
        let status = loop {
            if ops >= self.opts.max_ops && !self.finder.heap.is_empty() {
                break SearchStatus::OpsExceeded;
            }
            let Some((index, _)) = self.finder.heap.pop() else {
                break SearchStatus::NotFound;
            };
            self.finder.open_closed.close(index);

            // The cost ceiling applies to the popped node's g, so `best`
            // never holds a node above it.
            let g = self.finder.g_costs[index];
            if g > self.opts.max_cost {
                break SearchStatus::CostExceeded;
            }
            let pos = self.pos_at(index);
            let h = self.heuristic(pos);
            if h < best.h {
                best = Best { index, h, g };
            }
            if h == 0 {
                break SearchStatus::Found;
            }

            ops += 1;
            match self.opts.algorithm {
                Algorithm::AStar => self.expand_astar(index, pos, g)?,
                Algorithm::JumpPoint => self.expand_jps(index, pos, g)?,
            }
        };

        let (path, cost) = match status {
            SearchStatus::NotFound => (Vec::new(), 0),
            _ => (self.reconstruct(best.index), best.g),
        };
        log::debug!(
            "search from {origin} ended {status:?} after {ops} ops: {} steps, cost {cost}, {} room(s)",
            path.len(),
            self.finder.rooms.len()
        );
        Ok(SearchResult {
            status,
            path,
            ops,
            cost,
            incomplete: status != SearchStatus::Found,
        })
    }

    // -----------------------------------------------------------------------
    // Coordinates and costs
    // -----------------------------------------------------------------------

    /// Node index of `pos`, loading its room if needed. `None` if the room
    /// cannot be entered.
    pub(crate) fn index_of(&mut self, pos: WorldPosition) -> Option<usize> {
        let slot = self
            .finder
            .rooms
            .resolve(pos.map_position(), self.store, &mut *self.source)?;
        Some(slot * ROOM_AREA + pos.local_index())
    }

    pub(crate) fn pos_at(&self, index: usize) -> WorldPosition {
        let room = self.finder.rooms.get(index / ROOM_AREA).room;
        let local = index % ROOM_AREA;
        let size = ROOM_SIZE as usize;
        room.tile((local / size) as u8, (local % size) as u8)
    }

    /// Movement cost of entering `pos`, or [`OBSTACLE`].
    pub(crate) fn look(&mut self, pos: WorldPosition) -> u32 {
        let Some(slot) = self
            .finder
            .rooms
            .resolve(pos.map_position(), self.store, &mut *self.source)
        else {
            return OBSTACLE;
        };
        let (lx, ly) = pos.local();
        self.finder
            .rooms
            .get(slot)
            .tile(lx, ly)
            .cost(self.opts.plain_cost, self.opts.swamp_cost)
            .unwrap_or(OBSTACLE)
    }

    /// [`look`](Self::look) at `pos + (dx, dy)`.
    #[inline]
    pub(crate) fn look_offset(&mut self, pos: WorldPosition, dx: i32, dy: i32) -> u32 {
        match pos.offset(dx, dy) {
            Some(p) => self.look(p),
            None => OBSTACLE,
        }
    }

    /// Remaining distance to satisfy the goals; 0 once they are satisfied.
    ///
    /// Normal mode: Chebyshev distance to the nearest goal's acceptance area.
    /// Flee mode: how far the search still has to move to be more than
    /// `range` tiles from every goal.
    pub(crate) fn heuristic(&self, pos: WorldPosition) -> u32 {
        let dist = |g: &Goal| u32::from(pos.range_to(g.pos));
        if self.opts.flee {
            self.goals
                .iter()
                .map(|g| (u32::from(g.range) + 1).saturating_sub(dist(g)))
                .max()
                .unwrap_or(0)
        } else {
            self.goals
                .iter()
                .map(|g| dist(g).saturating_sub(u32::from(g.range)))
                .min()
                .unwrap_or(0)
        }
    }

    #[inline]
    fn weighted(&self, h: u32) -> u32 {
        (f64::from(h) * self.opts.heuristic_weight) as u32
    }

    // -----------------------------------------------------------------------
    // Open list
    // -----------------------------------------------------------------------

    /// Offer `pos` to the open list with parent `parent` and cost `g`.
    ///
    /// Closed nodes are never reopened. An open node only takes the new
    /// parent if `g` improves on its recorded cost.
    pub(crate) fn push_node(
        &mut self,
        parent: usize,
        pos: WorldPosition,
        g: u32,
    ) -> Result<(), SearchError> {
        let Some(index) = self.index_of(pos) else {
            return Ok(());
        };
        if self.finder.open_closed.is_closed(index) {
            return Ok(());
        }
        let priority = g.saturating_add(self.weighted(self.heuristic(pos)));

        let finder = &mut *self.finder;
        if finder.open_closed.is_open(index) {
            if g >= finder.g_costs[index] {
                return Ok(());
            }
            finder.heap.update(index, priority);
        } else {
            if let Err(e) = finder.heap.insert(index, priority) {
                log::warn!("open list full at {pos}: {e}");
                return Err(e.into());
            }
            finder.open_closed.open(index);
        }
        finder.parents[index] = parent;
        finder.g_costs[index] = g;
        Ok(())
    }

    /// Walk parents back from `index` to the origin.
    ///
    /// Jump edges are expanded into single steps when `interpolate` is set.
    fn reconstruct(&self, mut index: usize) -> Vec<WorldPosition> {
        let mut path = Vec::new();
        let mut pos = self.pos_at(index);
        loop {
            let parent = self.finder.parents[index];
            if parent == index {
                break;
            }
            let next = self.pos_at(parent);
            path.push(pos);
            if self.opts.interpolate {
                if let Some(dir) = pos.direction_to(next) {
                    let mut step = pos;
                    while step.range_to(next) > 1 {
                        let Some(s) = step.neighbor(dir) else { break };
                        step = s;
                        path.push(step);
                    }
                }
            }
            index = parent;
            pos = next;
        }
        path.reverse();
        path
    }
}
