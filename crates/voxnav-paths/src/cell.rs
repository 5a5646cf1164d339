use voxnav_core::BlockPos;

/// Handle to a [`Cell`] inside a [`CellGrid`](crate::CellGrid).
///
/// Handles are only meaningful for the grid that issued them and become
/// dangling once that grid is cleared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl CellId {
    /// Position of the cell in the grid's arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which list a cell is in. Moves forward only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellStatus {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Search-time record for one world block.
#[derive(Clone, Debug)]
pub struct Cell {
    pub location: BlockPos,
    /// Total estimated cost, `g + h` (or `h` alone in greedy mode).
    pub f: i32,
    /// Best known cost from the source.
    pub g: i32,
    /// Heuristic estimate to the destination.
    pub h: i32,
    pub status: CellStatus,
    pub parent: Option<CellId>,
    /// Cached on first visit. Partial blocks count as solid.
    pub is_solid: bool,
}

impl Cell {
    pub(crate) fn new(location: BlockPos, is_solid: bool) -> Self {
        Self {
            location,
            f: 0,
            g: 0,
            h: 0,
            status: CellStatus::Unvisited,
            parent: None,
            is_solid,
        }
    }
}
