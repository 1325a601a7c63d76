//! Plain A* expansion.

use roomgrid_core::{Direction, ROOM_SIZE, WorldPosition};

use crate::error::SearchError;
use crate::finder::{OBSTACLE, Search};
use crate::heap::PriorityQueue;

impl<Q: PriorityQueue> Search<'_, Q> {
    /// Push every enterable neighbour of `pos`.
    pub(crate) fn expand_astar(
        &mut self,
        index: usize,
        pos: WorldPosition,
        g: u32,
    ) -> Result<(), SearchError> {
        for dir in Direction::ALL {
            let Some(neighbor) = pos.neighbor(dir) else {
                continue;
            };
            if self.opts.border_exits && !exit_allowed(pos, neighbor) {
                continue;
            }
            let cost = self.look(neighbor);
            if cost == OBSTACLE {
                continue;
            }
            self.push_node(index, neighbor, g.saturating_add(cost))?;
        }
        Ok(())
    }
}

/// Whether the move `pos -> neighbor` respects room exit rules.
///
/// From a tile on a vertical room edge the only way across is straight
/// sideways, and sliding along the edge is not allowed. Horizontal edges
/// follow the same rule with the axes swapped. Corner tiles use the vertical
/// edge rule.
pub(crate) fn exit_allowed(pos: WorldPosition, neighbor: WorldPosition) -> bool {
    let last = (ROOM_SIZE - 1) as u8;
    let (lx, ly) = pos.local();
    if lx == 0 || lx == last {
        if neighbor.x == pos.x {
            return false;
        }
        let crosses = neighbor.x / ROOM_SIZE != pos.x / ROOM_SIZE;
        !crosses || neighbor.y == pos.y
    } else if ly == 0 || ly == last {
        if neighbor.y == pos.y {
            return false;
        }
        let crosses = neighbor.y / ROOM_SIZE != pos.y / ROOM_SIZE;
        !crosses || neighbor.x == pos.x
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::SearchStatus;
    use crate::options::Algorithm;
    use crate::room::NoOverrides;
    use crate::terrain::{RoomTerrain, TerrainKind, TerrainStore};
    use crate::testutil::*;
    use roomgrid_core::MapPosition;

    #[test]
    fn exit_rules_on_edges() {
        let left = HOME.tile(0, 20);
        let west = MapPosition::new(HOME.x - 1, HOME.y);
        assert!(exit_allowed(left, west.tile(49, 20)));
        assert!(!exit_allowed(left, west.tile(49, 21)));
        assert!(!exit_allowed(left, HOME.tile(0, 21)));
        assert!(exit_allowed(left, HOME.tile(1, 21)));

        let top = HOME.tile(20, 0);
        let north = MapPosition::new(HOME.x, HOME.y - 1);
        assert!(exit_allowed(top, north.tile(20, 49)));
        assert!(!exit_allowed(top, north.tile(19, 49)));
        assert!(!exit_allowed(top, HOME.tile(21, 0)));
        assert!(exit_allowed(top, HOME.tile(21, 1)));

        assert!(exit_allowed(HOME.tile(20, 20), HOME.tile(21, 21)));
    }

    #[test]
    fn border_exits_cross_straight() {
        let east = MapPosition::new(HOME.x + 1, HOME.y);
        let origin = HOME.tile(47, 10);
        let goal = east.tile(2, 20);
        let mut pf = finder(TerrainStore::new());
        let mut req = request(origin, goal, Algorithm::AStar);
        req.options.border_exits = true;
        let r = pf.search(&req, &mut NoOverrides).unwrap();
        assert_eq!(r.status, SearchStatus::Found);
        assert_contiguous(origin, &r.path);
        let mut prev = origin;
        for &p in &r.path {
            if prev.map_position() != p.map_position() {
                assert_eq!(prev.y, p.y, "diagonal room crossing {prev} -> {p}");
            }
            prev = p;
        }
    }

    #[test]
    fn expands_every_node_in_a_corridor() {
        // A one-tile corridor: A* expands each tile on the way.
        let terrain = RoomTerrain::from_fn(|_, ly| {
            if ly == 25 {
                TerrainKind::Plain
            } else {
                TerrainKind::Wall
            }
        });
        let mut pf = finder(single_room(terrain));
        let req = request(HOME.tile(10, 25), HOME.tile(30, 25), Algorithm::AStar);
        let r = pf.search(&req, &mut NoOverrides).unwrap();
        assert_eq!(r.status, SearchStatus::Found);
        assert_eq!(r.ops, 20);
        assert_eq!(r.cost, 20);
    }

    #[test]
    fn swamp_is_avoided_when_cheaper_around() {
        // A swamp square sits between origin and goal.
        let terrain = RoomTerrain::from_fn(|lx, ly| {
            if (15..=25).contains(&lx) && (15..=35).contains(&ly) {
                TerrainKind::Swamp
            } else {
                TerrainKind::Plain
            }
        });
        let mut pf = finder(single_room(terrain));
        let origin = HOME.tile(10, 25);
        let req = request(origin, HOME.tile(30, 25), Algorithm::AStar);
        let r = pf.search(&req, &mut NoOverrides).unwrap();
        assert_eq!(r.status, SearchStatus::Found);
        // Around the top of the square costs 32, straight through it 64.
        assert_eq!(r.cost, 32);
        assert_eq!(r.cost as usize, r.path.len());
    }
}
