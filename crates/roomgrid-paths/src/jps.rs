//! Jump point expansion over uniform-cost rays.
//!
//! Jumps treat any change of tile cost like a wall corner: a ray stops in
//! front of a tile that costs something else, and next to any tile whose
//! cost differs from the ray's. Rays never cross a room border; border tiles
//! are jump points expanded with plain A*, so room resolution and exit rules
//! stay in one place.

use roomgrid_core::WorldPosition;

use crate::error::SearchError;
use crate::finder::{OBSTACLE, Search};
use crate::heap::PriorityQueue;

impl<Q: PriorityQueue> Search<'_, Q> {
    /// Expand `pos` by jumping in the directions its parent leaves open.
    pub(crate) fn expand_jps(
        &mut self,
        index: usize,
        pos: WorldPosition,
        g: u32,
    ) -> Result<(), SearchError> {
        let parent = self.finder.parents[index];
        if parent == index || pos.is_room_border() {
            return self.expand_astar(index, pos, g);
        }
        let Some(dir) = self.pos_at(parent).direction_to(pos) else {
            return self.expand_astar(index, pos, g);
        };

        let cost = self.look(pos);
        let (dx, dy) = dir.delta();
        // Natural neighbours first, then the ones that may be forced.
        let (candidates, count) = if dir.is_diagonal() {
            ([(0, dy), (dx, 0), (dx, dy), (-dx, dy), (dx, -dy)], 5)
        } else if dx != 0 {
            ([(dx, 0), (dx, 1), (dx, -1), (0, 0), (0, 0)], 3)
        } else {
            ([(0, dy), (1, dy), (-1, dy), (0, 0), (0, 0)], 3)
        };

        for &(cx, cy) in &candidates[..count] {
            let Some(neighbor) = pos.offset(cx, cy) else {
                continue;
            };
            let n_cost = self.look(neighbor);
            if n_cost == OBSTACLE {
                continue;
            }
            self.jump_neighbor(index, pos, g, cost, neighbor, n_cost)?;
        }
        Ok(())
    }

    fn jump_neighbor(
        &mut self,
        index: usize,
        pos: WorldPosition,
        g: u32,
        cost: u32,
        neighbor: WorldPosition,
        n_cost: u32,
    ) -> Result<(), SearchError> {
        if n_cost != cost || neighbor.is_room_border() {
            return self.push_node(index, neighbor, g.saturating_add(n_cost));
        }
        let dx = i32::from(neighbor.x) - i32::from(pos.x);
        let dy = i32::from(neighbor.y) - i32::from(pos.y);
        let jump = if dx != 0 && dy != 0 {
            self.jump_diagonal(n_cost, neighbor, dx, dy)
        } else {
            self.jump_straight(n_cost, neighbor, dx, dy)
        };
        match jump {
            Some(jp) => {
                let steps = u32::from(pos.range_to(jp));
                self.push_node(index, jp, g.saturating_add(n_cost.saturating_mul(steps)))
            }
            None => Ok(()),
        }
    }

    /// Follow a straight ray of `cost` tiles starting at `pos`.
    ///
    /// Returns the jump point, or `None` if the ray runs into an obstacle
    /// without finding one.
    fn jump_straight(
        &mut self,
        cost: u32,
        mut pos: WorldPosition,
        dx: i32,
        dy: i32,
    ) -> Option<WorldPosition> {
        loop {
            if pos.is_room_border() || self.heuristic(pos) == 0 {
                return Some(pos);
            }
            for s in [-1, 1] {
                let (sx, sy) = if dx != 0 { (0, s) } else { (s, 0) };
                let side = self.look_offset(pos, sx, sy);
                let ahead = self.look_offset(pos, dx + sx, dy + sy);
                if ahead != OBSTACLE && (side != cost || ahead != cost) {
                    return Some(pos);
                }
            }
            let next = pos.offset(dx, dy)?;
            match self.look(next) {
                OBSTACLE => return None,
                c if c != cost => return Some(pos),
                _ => pos = next,
            }
        }
    }

    /// Follow a diagonal ray of `cost` tiles starting at `pos`, probing both
    /// axis directions at every step.
    fn jump_diagonal(
        &mut self,
        cost: u32,
        mut pos: WorldPosition,
        dx: i32,
        dy: i32,
    ) -> Option<WorldPosition> {
        loop {
            if pos.is_room_border() || self.heuristic(pos) == 0 {
                return Some(pos);
            }
            for (bx, by, ax, ay) in [(-dx, 0, -dx, dy), (0, -dy, dx, -dy)] {
                let behind = self.look_offset(pos, bx, by);
                let around = self.look_offset(pos, ax, ay);
                if around != OBSTACLE && (behind != cost || around != cost) {
                    return Some(pos);
                }
            }
            for (ax, ay) in [(dx, 0), (0, dy)] {
                let Some(n) = pos.offset(ax, ay) else {
                    continue;
                };
                match self.look(n) {
                    OBSTACLE => {}
                    c if c != cost => return Some(pos),
                    _ => {
                        if self.jump_straight(cost, n, ax, ay).is_some() {
                            return Some(pos);
                        }
                    }
                }
            }
            let next = pos.offset(dx, dy)?;
            match self.look(next) {
                OBSTACLE => return None,
                c if c != cost => return Some(pos),
                _ => pos = next,
            }
        }
    }
}
