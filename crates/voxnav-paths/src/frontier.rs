//! The open list.

use std::collections::BinaryHeap;

use crate::cell::{CellId, CellStatus};
use crate::grid::CellGrid;

/// Reference into the cell grid, ordered by `f` for use in `BinaryHeap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Entry {
    id: CellId,
    f: i32,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.cmp(&self.f)
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of open cells keyed by `f`.
///
/// The frontier only stores handles; the cells themselves stay in the
/// [`CellGrid`]. Ties between equal `f` values come out in no particular
/// order.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the cell open and queue it at its current `f`.
    ///
    /// Pushing a cell that is already open re-queues it; the entry carrying
    /// the old `f` is discarded when it surfaces.
    pub fn push(&mut self, grid: &mut CellGrid, id: CellId) {
        let cell = &mut grid[id];
        debug_assert_ne!(cell.status, CellStatus::Closed, "closed cells are never re-opened");
        cell.status = CellStatus::Open;
        self.heap.push(Entry { id, f: cell.f });
    }

    /// Remove the open cell with the lowest `f` and close it.
    ///
    /// Returns `None` once no open cell remains.
    pub fn pop_min(&mut self, grid: &mut CellGrid) -> Option<CellId> {
        while let Some(entry) = self.heap.pop() {
            let Some(cell) = grid.get_mut(entry.id) else {
                continue;
            };
            // Skip stale entries.
            if cell.status != CellStatus::Open || cell.f != entry.f {
                continue;
            }
            cell.status = CellStatus::Closed;
            return Some(entry.id);
        }
        None
    }

    /// Number of queued entries, superseded ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap = BinaryHeap::new();
    }
}
