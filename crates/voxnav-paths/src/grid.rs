//! Sparse, lazily populated map from block position to [`Cell`].

use std::collections::{HashMap, HashSet};
use std::ops::{Index, IndexMut};

use voxnav_core::BlockPos;

use crate::cell::{Cell, CellId};
use crate::probe::{Probe, WorldProbe};
use crate::traits::VoxelWorld;

/// Owns every [`Cell`] created during one search.
///
/// Cells live in an arena and are addressed by [`CellId`], so parent links
/// are plain indices. Nothing is evicted until [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct CellGrid {
    cells: Vec<Cell>,
    index: HashMap<BlockPos, CellId>,
    // Overlay markers aimed at positions that have no cell yet.
    pending_solid: HashSet<BlockPos>,
}

impl CellGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cell at `p`, creating and probing it on first use.
    ///
    /// Probing may force some other position solid (see [`Probe`]); that is
    /// applied immediately if the cell exists, or when it gets created.
    pub fn get_or_create<W: VoxelWorld>(&mut self, p: BlockPos, probe: &WorldProbe<W>) -> CellId {
        if let Some(&id) = self.index.get(&p) {
            return id;
        }
        let Probe { solid, overlay } = probe.probe(p);
        let forced = self.pending_solid.remove(&p);
        let id = CellId(self.cells.len());
        self.cells.push(Cell::new(p, solid || forced));
        self.index.insert(p, id);
        if let Some(target) = overlay {
            self.force_solid(target);
        }
        id
    }

    /// Mark `p` solid, now or when its cell is created.
    pub fn force_solid(&mut self, p: BlockPos) {
        match self.index.get(&p) {
            Some(&id) => self.cells[id.0].is_solid = true,
            None => {
                self.pending_solid.insert(p);
            }
        }
    }

    /// Handle of the cell at `p`, if it has been created.
    #[inline]
    pub fn find(&self, p: BlockPos) -> Option<CellId> {
        self.index.get(&p).copied()
    }

    /// The cell behind `id`, if the handle is still valid.
    #[inline]
    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    /// Mutable access to the cell behind `id`.
    #[inline]
    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.0)
    }

    /// Number of cells created so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop every cell and pending overlay. Outstanding handles dangle.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.index.clear();
        self.pending_solid.clear();
        self.cells.shrink_to_fit();
        self.index.shrink_to_fit();
    }
}

impl Index<CellId> for CellGrid {
    type Output = Cell;

    #[inline]
    fn index(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }
}

impl IndexMut<CellId> for CellGrid {
    #[inline]
    fn index_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }
}
