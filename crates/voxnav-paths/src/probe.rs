//! Solidity queries against the world, with the fence and liquid overlays.

use std::sync::Arc;

use voxnav_core::BlockPos;

use crate::traits::{Surface, VoxelWorld};

/// Outcome of probing one block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Probe {
    /// Whether the probed block itself is solid.
    pub solid: bool,
    /// Another position that must be treated as solid because of what was
    /// found here.
    pub overlay: Option<BlockPos>,
}

/// Adapter between the search and a [`VoxelWorld`].
///
/// Fails closed: anything in a region that is not loaded is solid.
#[derive(Debug)]
pub struct WorldProbe<W> {
    world: Arc<W>,
}

impl<W> Clone for WorldProbe<W> {
    fn clone(&self) -> Self {
        Self {
            world: Arc::clone(&self.world),
        }
    }
}

impl<W> WorldProbe<W> {
    /// Wrap a shared world.
    pub fn new(world: Arc<W>) -> Self {
        Self { world }
    }

    /// The underlying world.
    pub fn world(&self) -> &Arc<W> {
        &self.world
    }
}

impl<W: VoxelWorld> WorldProbe<W> {
    /// Classify the block at `p`.
    pub fn probe(&self, p: BlockPos) -> Probe {
        if !self.world.region_valid_at(p) {
            return Probe {
                solid: true,
                overlay: None,
            };
        }
        let overlay = match self.world.surface_at(p) {
            Surface::Plain => None,
            Surface::Fence => Some(p.above()),
            Surface::StillLiquid => Some(p.below()),
        };
        Probe {
            solid: self.world.solid_at(p),
            overlay,
        }
    }

    /// Shorthand for `probe(p).solid`.
    #[inline]
    pub fn is_solid(&self, p: BlockPos) -> bool {
        self.probe(p).solid
    }
}
