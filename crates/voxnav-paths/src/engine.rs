//! The A* expansion loop over a lazily probed voxel world.

use std::sync::Arc;

use log::{debug, trace};
use voxnav_core::BlockPos;

use crate::cell::{CellId, CellStatus};
use crate::config::SearchConfig;
use crate::distance::{DIAGONAL_COST, ORTHOGONAL_COST};
use crate::frontier::Frontier;
use crate::grid::CellGrid;
use crate::guard::AccessGuard;
use crate::probe::WorldProbe;
use crate::status::{PathStatus, Waypoint};
use crate::traits::VoxelWorld;

/// Offsets from the destination at which a search counts as arrived.
const ARRIVAL_OFFSETS: [BlockPos; 5] = [
    BlockPos::new(0, 0, 1),
    BlockPos::new(1, 0, 0),
    BlockPos::new(-1, 0, 0),
    BlockPos::new(0, 0, -1),
    BlockPos::new(0, -1, 0),
];

/// State of one search: the cell cache, the open list and the result.
///
/// Advanced one expansion at a time with [`advance_one`](Self::advance_one).
/// Once a terminal status is reached every cell is released; only the
/// waypoints survive.
#[derive(Debug)]
pub struct SearchEngine<W> {
    probe: WorldProbe<W>,
    grid: CellGrid,
    frontier: Frontier,
    source: BlockPos,
    destination: BlockPos,
    config: SearchConfig,
    status: PathStatus,
    waypoints: Vec<Waypoint>,
    expansions: u64,
    // scratch buffer for neighbour generation
    nbuf: Vec<(CellId, i32)>,
    guard: AccessGuard,
}

impl<W: VoxelWorld> SearchEngine<W> {
    /// Set up a search from `source` to `destination`.
    ///
    /// If either endpoint is solid the engine is born finished with
    /// [`PathStatus::PathNotFound`] and no expansion ever happens.
    pub fn new(world: Arc<W>, source: BlockPos, destination: BlockPos, config: SearchConfig) -> Self {
        let mut engine = Self {
            probe: WorldProbe::new(world),
            grid: CellGrid::new(),
            frontier: Frontier::new(),
            source,
            destination,
            config,
            status: PathStatus::Calculating,
            waypoints: Vec::new(),
            expansions: 0,
            nbuf: Vec::with_capacity(16),
            guard: AccessGuard::default(),
        };

        let _entered = engine.guard.enter();
        let src = engine.cell(source);
        let dst = engine.cell(destination);
        if engine.grid[src].is_solid || engine.grid[dst].is_solid {
            debug!("rejecting search {source} -> {destination}: endpoint is solid");
            engine.finish(PathStatus::PathNotFound);
            return engine;
        }

        debug!("starting search {source} -> {destination}");
        engine.process_cell(src, None, 0);
        engine
    }

    /// Perform one expansion.
    ///
    /// Returns `true` once the search has reached a terminal status (calling
    /// it again after that is a no-op that keeps returning `true`).
    pub fn advance_one(&mut self) -> bool {
        if self.status.is_terminal() {
            return true;
        }
        let _entered = self.guard.enter();

        let Some(current) = self.frontier.pop_min(&mut self.grid) else {
            debug!(
                "search {} -> {} exhausted after {} expansions",
                self.source, self.destination, self.expansions
            );
            self.finish(PathStatus::PathNotFound);
            return true;
        };
        self.expansions += 1;

        let at = self.grid[current].location;
        trace!("expanding {at} (g = {}, f = {})", self.grid[current].g, self.grid[current].f);

        if self.is_arrival(at) {
            self.collect_waypoints(current);
            debug!(
                "search {} -> {} found {} waypoints after {} expansions",
                self.source,
                self.destination,
                self.waypoints.len(),
                self.expansions
            );
            self.finish(PathStatus::PathFound);
            return true;
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        self.walkable_neighbors_into(at, &mut nbuf);
        for &(id, cost) in &nbuf {
            self.process_cell(id, Some(current), cost);
        }
        self.nbuf = nbuf;

        false
    }

    /// Handle of the cell at `p`, probing the world on first use.
    fn cell(&mut self, p: BlockPos) -> CellId {
        self.grid.get_or_create(p, &self.probe)
    }

    fn solid(&mut self, p: BlockPos) -> bool {
        let id = self.cell(p);
        self.grid[id].is_solid
    }

    /// The cell at `p` if an agent could stand there: free itself, solid
    /// below, free above.
    fn walkable(&mut self, p: BlockPos) -> Option<CellId> {
        // Probe all three before reading any flag, so overlays raised by the
        // floor or the head block are already in place.
        let floor = self.cell(p.below());
        let body = self.cell(p);
        let head = self.cell(p.above());
        let g = &self.grid;
        (!g[body].is_solid && g[floor].is_solid && !g[head].is_solid).then_some(body)
    }

    /// Collect the walkable neighbours of `at` with their step costs.
    fn walkable_neighbors_into(&mut self, at: BlockPos, out: &mut Vec<(CellId, i32)>) {
        // Cardinal moves, stepping up or down at most one block.
        for dy in -1..=1 {
            for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                if let Some(id) = self.walkable(at.shift(dx, dy, dz)) {
                    out.push((id, ORTHOGONAL_COST));
                }
            }
        }

        // Diagonal moves at the current height only.
        for dx in [-1, 1] {
            for dz in [-1, 1] {
                let side_x = at.shift(dx, 0, 0);
                let side_z = at.shift(0, 0, dz);
                // No cutting through a solid corner.
                let corners_free = !self.solid(side_x) && !self.solid(side_z);
                // No diagonal over a gap where the route bends sharply.
                let corners_floored = self.solid(side_x.below()) && self.solid(side_z.below());
                if corners_free && corners_floored {
                    if let Some(id) = self.walkable(at.shift(dx, 0, dz)) {
                        out.push((id, DIAGONAL_COST));
                    }
                }
            }
        }
    }

    fn process_cell(&mut self, id: CellId, parent: Option<CellId>, delta: i32) {
        match self.grid[id].status {
            CellStatus::Closed => {}
            CellStatus::Unvisited => {
                let g = parent.map_or(0, |p| self.grid[p].g + delta);
                let h = self.config.distance.estimate(self.grid[id].location, self.destination);
                let cell = &mut self.grid[id];
                cell.parent = parent;
                cell.g = g;
                cell.h = h;
                cell.f = self.config.score(g, h);
                self.frontier.push(&mut self.grid, id);
            }
            CellStatus::Open => {
                let Some(p) = parent else {
                    return;
                };
                let new_g = self.grid[p].g + delta;
                if new_g >= self.grid[id].g {
                    return;
                }
                let h = self.config.distance.estimate(self.grid[id].location, self.destination);
                let cell = &mut self.grid[id];
                cell.parent = Some(p);
                cell.g = new_g;
                cell.h = h;
                cell.f = self.config.score(new_g, h);
                self.frontier.push(&mut self.grid, id);
            }
        }
    }

    #[inline]
    fn is_arrival(&self, p: BlockPos) -> bool {
        ARRIVAL_OFFSETS.iter().any(|&d| p == self.destination + d)
    }
}

impl<W> SearchEngine<W> {
    /// Walk the parent chain from `last` back to the source.
    fn collect_waypoints(&mut self, last: CellId) {
        self.waypoints.clear();
        let mut cur = Some(last);
        while let Some(id) = cur {
            let cell = &self.grid[id];
            self.waypoints.push(Waypoint {
                pos: cell.location,
                g: cell.g,
            });
            cur = cell.parent;
        }
    }

    /// Enter a terminal status and release all search state.
    pub fn finish(&mut self, status: PathStatus) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.release();
    }

    /// Drop every cell and reset the frontier. Safe to call repeatedly.
    pub fn release(&mut self) {
        let _entered = self.guard.enter();
        self.grid.clear();
        self.frontier.clear();
        self.nbuf = Vec::new();
    }

    #[inline]
    pub fn status(&self) -> PathStatus {
        self.status
    }

    /// Waypoints of a found path, near-destination first, source last.
    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub(crate) fn take_waypoints(&mut self) -> Vec<Waypoint> {
        std::mem::take(&mut self.waypoints)
    }

    /// Number of cells popped off the frontier so far.
    #[inline]
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Number of cells currently cached.
    #[inline]
    pub fn cached_cells(&self) -> usize {
        self.grid.len()
    }

    /// Read access to the cell cache.
    #[inline]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[inline]
    pub fn source(&self) -> BlockPos {
        self.source
    }

    #[inline]
    pub fn destination(&self) -> BlockPos {
        self.destination
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[cfg(test)]
impl<W: VoxelWorld> SearchEngine<W> {
    /// Positions and costs of the moves available from `at`.
    pub(crate) fn walkable_neighbors(&mut self, at: BlockPos) -> Vec<(BlockPos, i32)> {
        let mut out = Vec::new();
        self.walkable_neighbors_into(at, &mut out);
        out.into_iter()
            .map(|(id, cost)| (self.grid[id].location, cost))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Distance;
    use crate::testworld::TestWorld;
    use crate::traits::Surface;
    use voxnav_core::Cuboid;

    fn open_field() -> TestWorld {
        TestWorld::flat(Cuboid::new(BlockPos::new(-16, -1, -16), BlockPos::new(32, 8, 32)), 0)
    }

    fn engine(w: TestWorld, from: BlockPos, to: BlockPos) -> SearchEngine<TestWorld> {
        SearchEngine::new(Arc::new(w), from, to, SearchConfig::default())
    }

    fn run(e: &mut SearchEngine<TestWorld>) {
        for _ in 0..100_000 {
            if e.advance_one() {
                return;
            }
        }
        panic!("search did not terminate");
    }

    fn cost_of_step(a: BlockPos, b: BlockPos) -> i32 {
        let d = b - a;
        assert!(d.y.abs() <= 1, "climbs at most one block: {a} -> {b}");
        match (d.x.abs(), d.z.abs()) {
            (1, 0) | (0, 1) => ORTHOGONAL_COST,
            (1, 1) => {
                assert_eq!(d.y, 0, "diagonals stay level");
                DIAGONAL_COST
            }
            _ => panic!("not a single step: {a} -> {b}"),
        }
    }

    #[test]
    fn straight_line_on_flat_floor() {
        let mut e = engine(open_field(), BlockPos::new(0, 1, 0), BlockPos::new(5, 1, 0));
        run(&mut e);
        assert_eq!(e.status(), PathStatus::PathFound);
        let pts = e.waypoints();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], Waypoint { pos: BlockPos::new(4, 1, 0), g: 40 });
        assert_eq!(pts[4], Waypoint { pos: BlockPos::new(0, 1, 0), g: 0 });
        for w in pts.windows(2) {
            assert_eq!(w[0].pos.y, 1);
            assert_eq!(w[0].pos - w[1].pos, BlockPos::new(1, 0, 0));
        }
        assert_eq!(e.cached_cells(), 0);
    }

    #[test]
    fn solid_endpoint_is_rejected_without_expansion() {
        let mut w = open_field();
        w.set_solid(BlockPos::new(5, 1, 0));
        let mut e = engine(w, BlockPos::new(0, 1, 0), BlockPos::new(5, 1, 0));
        assert_eq!(e.status(), PathStatus::PathNotFound);
        assert!(e.advance_one());
        assert_eq!(e.expansions(), 0);
        assert_eq!(e.cached_cells(), 0);

        let e = engine(open_field(), BlockPos::new(0, 0, 0), BlockPos::new(5, 1, 0));
        assert_eq!(e.status(), PathStatus::PathNotFound);
        assert_eq!(e.expansions(), 0);
    }

    #[test]
    fn unloaded_destination_is_rejected() {
        let e = engine(open_field(), BlockPos::new(0, 1, 0), BlockPos::new(100, 1, 0));
        assert_eq!(e.status(), PathStatus::PathNotFound);
    }

    #[test]
    fn costs_follow_the_steps_taken() {
        let mut w = open_field();
        // A wall with a single gap forces a detour.
        for z in -6..=6 {
            if z != 4 {
                w.set_solid(BlockPos::new(3, 1, z));
                w.set_solid(BlockPos::new(3, 2, z));
            }
        }
        let mut e = engine(w, BlockPos::new(0, 1, 0), BlockPos::new(6, 1, 0));
        run(&mut e);
        assert_eq!(e.status(), PathStatus::PathFound);

        let mut pts = e.waypoints().to_vec();
        pts.reverse();
        assert_eq!(pts[0].pos, BlockPos::new(0, 1, 0));
        assert_eq!(pts[0].g, 0);
        assert!(pts.iter().any(|p| p.pos == BlockPos::new(3, 1, 4)));
        for w in pts.windows(2) {
            assert_eq!(w[1].g, w[0].g + cost_of_step(w[0].pos, w[1].pos));
        }
    }

    #[test]
    fn first_waypoint_is_next_to_destination() {
        let dest = BlockPos::new(-4, 1, 7);
        let mut e = engine(open_field(), BlockPos::new(3, 1, -2), dest);
        run(&mut e);
        assert_eq!(e.status(), PathStatus::PathFound);
        let first = e.waypoints()[0].pos;
        assert_ne!(first, dest);
        assert!(ARRIVAL_OFFSETS.iter().any(|&d| dest + d == first));
    }

    #[test]
    fn arrives_directly_below_raised_destination() {
        // Nothing to stand on at y = 2, so only the block underneath counts.
        let dest = BlockPos::new(5, 2, 0);
        let mut e = engine(open_field(), BlockPos::new(0, 1, 0), dest);
        run(&mut e);
        assert_eq!(e.status(), PathStatus::PathFound);
        assert_eq!(e.waypoints()[0], Waypoint { pos: dest.below(), g: 50 });
        assert_eq!(e.waypoints().len(), 6);
    }

    #[test]
    fn steps_up_and_down_single_blocks() {
        let mut w = open_field();
        // A one-block ledge across the whole route.
        for z in -16..32 {
            w.set_solid(BlockPos::new(2, 1, z));
            w.set_solid(BlockPos::new(3, 1, z));
        }
        let mut e = engine(w, BlockPos::new(0, 1, 0), BlockPos::new(6, 1, 0));
        run(&mut e);
        assert_eq!(e.status(), PathStatus::PathFound);
        let pts = e.waypoints();
        assert!(pts.iter().any(|p| p.pos.y == 2));
        for w in pts.windows(2) {
            cost_of_step(w[1].pos, w[0].pos);
        }
    }

    #[test]
    fn two_block_wall_blocks_everything() {
        let mut w = open_field();
        for z in -16..32 {
            for y in 1..=2 {
                w.set_solid(BlockPos::new(2, y, z));
            }
        }
        let mut e = engine(w, BlockPos::new(0, 1, 0), BlockPos::new(6, 1, 0));
        run(&mut e);
        assert_eq!(e.status(), PathStatus::PathNotFound);
        assert!(e.expansions() > 0);
        assert_eq!(e.cached_cells(), 0);
    }

    #[test]
    fn diagonal_blocked_by_solid_corner() {
        let mut w = open_field();
        // A one-block stub on the +x side of the origin column.
        w.set_solid(BlockPos::new(1, 1, 0));
        let mut e = engine(w, BlockPos::new(0, 1, 0), BlockPos::new(9, 1, 9));
        let moves = e.walkable_neighbors(BlockPos::new(0, 1, 0));
        // (1,1,1) is itself walkable, but only reachable by going around.
        assert!(!moves.contains(&(BlockPos::new(1, 1, 1), DIAGONAL_COST)));
        assert!(!moves.contains(&(BlockPos::new(1, 1, -1), DIAGONAL_COST)));
        assert!(moves.contains(&(BlockPos::new(-1, 1, 1), DIAGONAL_COST)));
        assert!(moves.contains(&(BlockPos::new(0, 1, 1), ORTHOGONAL_COST)));
        assert!(!moves.iter().any(|(p, _)| *p == BlockPos::new(1, 1, 0)));
        // Climbing onto the stub is fine.
        assert!(moves.contains(&(BlockPos::new(1, 2, 0), ORTHOGONAL_COST)));
    }

    #[test]
    fn diagonal_needs_floor_under_both_corners() {
        let mut w = TestWorld::new(Cuboid::new(BlockPos::new(-4, -1, -4), BlockPos::new(8, 8, 8)));
        // A narrow walkway bending at a right angle: (0,0,0) -> (1,0,0),
        // and (0,0,0) -> (0,0,1) -> (1,0,1) is missing its inner corner.
        for p in [
            BlockPos::new(0, 0, 0),
            BlockPos::new(1, 0, 0),
            BlockPos::new(1, 0, 1),
        ] {
            w.set_solid(p);
        }
        let mut e = engine(w, BlockPos::new(0, 1, 0), BlockPos::new(3, 1, 3));
        let moves = e.walkable_neighbors(BlockPos::new(0, 1, 0));
        assert!(moves.contains(&(BlockPos::new(1, 1, 0), ORTHOGONAL_COST)));
        assert!(!moves.iter().any(|(p, _)| *p == BlockPos::new(1, 1, 1)));
    }

    #[test]
    fn fence_tops_are_not_walkable() {
        let mut w = open_field();
        for z in -16..32 {
            w.set(BlockPos::new(2, 1, z), true, Surface::Fence);
        }
        let mut e = engine(w, BlockPos::new(0, 1, 0), BlockPos::new(6, 1, 0));
        let moves = e.walkable_neighbors(BlockPos::new(1, 1, 0));
        assert!(!moves.iter().any(|(p, _)| *p == BlockPos::new(2, 2, 0)));
        run(&mut e);
        assert_eq!(e.status(), PathStatus::PathNotFound);
    }

    #[test]
    fn greedy_and_manhattan_still_find_a_path() {
        for config in [
            SearchConfig {
                greedy: true,
                ..SearchConfig::default()
            },
            SearchConfig {
                distance: Distance::Manhattan,
                ..SearchConfig::default()
            },
        ] {
            let w = Arc::new(open_field());
            let mut e = SearchEngine::new(w, BlockPos::new(0, 1, 0), BlockPos::new(8, 1, 5), config);
            run(&mut e);
            assert_eq!(e.status(), PathStatus::PathFound);
        }
    }

    #[test]
    fn cheaper_route_updates_open_cell() {
        let mut e = engine(open_field(), BlockPos::new(0, 1, 0), BlockPos::new(10, 1, 0));
        let _entered = e.guard.enter();
        let a = e.cell(BlockPos::new(1, 1, 0));
        let b = e.cell(BlockPos::new(2, 1, 0));
        let c = e.cell(BlockPos::new(3, 1, 0));
        let src = e.grid.find(BlockPos::new(0, 1, 0)).unwrap();
        e.grid[a].g = 40;
        e.grid[a].status = CellStatus::Closed;
        e.process_cell(c, Some(a), ORTHOGONAL_COST);
        assert_eq!(e.grid[c].g, 50);
        assert_eq!(e.grid[c].h, 70);
        assert_eq!(e.grid[c].f, 120);

        e.grid[b].g = 10;
        e.grid[b].status = CellStatus::Closed;
        e.process_cell(c, Some(b), ORTHOGONAL_COST);
        assert_eq!(e.grid[c].g, 20);
        assert_eq!(e.grid[c].h, 70);
        assert_eq!(e.grid[c].f, 90);
        assert_eq!(e.grid[c].parent, Some(b));

        // A worse route changes nothing.
        e.process_cell(c, Some(a), ORTHOGONAL_COST);
        assert_eq!(e.grid[c].g, 20);
        assert_eq!(e.grid[c].parent, Some(b));
        assert_eq!(e.grid[src].g, 0);
    }
}
