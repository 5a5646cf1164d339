//! A sparse in-memory world for unit tests.

use std::collections::{HashMap, HashSet};

use voxnav_core::{BlockPos, Cuboid};

use crate::traits::{Surface, VoxelWorld};

/// Everything inside `loaded` is valid; only listed positions are solid.
#[derive(Debug, Clone)]
pub(crate) struct TestWorld {
    loaded: Cuboid,
    solid: HashSet<BlockPos>,
    surfaces: HashMap<BlockPos, Surface>,
}

impl TestWorld {
    pub(crate) fn new(loaded: Cuboid) -> Self {
        Self {
            loaded,
            solid: HashSet::new(),
            surfaces: HashMap::new(),
        }
    }

    /// A loaded box with a solid floor filling layer `floor_y`.
    pub(crate) fn flat(loaded: Cuboid, floor_y: i32) -> Self {
        let mut w = Self::new(loaded);
        for p in loaded.layer(floor_y) {
            w.solid.insert(p);
        }
        w
    }

    pub(crate) fn set(&mut self, p: BlockPos, solid: bool, surface: Surface) {
        if solid {
            self.solid.insert(p);
        } else {
            self.solid.remove(&p);
        }
        if surface == Surface::Plain {
            self.surfaces.remove(&p);
        } else {
            self.surfaces.insert(p, surface);
        }
    }

    pub(crate) fn set_solid(&mut self, p: BlockPos) {
        self.set(p, true, Surface::Plain);
    }
}

impl VoxelWorld for TestWorld {
    fn region_valid_at(&self, p: BlockPos) -> bool {
        self.loaded.contains(p)
    }

    fn solid_at(&self, p: BlockPos) -> bool {
        self.solid.contains(&p)
    }

    fn surface_at(&self, p: BlockPos) -> Surface {
        self.surfaces.get(&p).copied().unwrap_or_default()
    }
}
