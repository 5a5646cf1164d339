//! A sparse collection of chunks forming one world.

use std::collections::HashMap;

use log::debug;
use voxnav_core::{BlockPos, Cuboid};
use voxnav_paths::{Surface, VoxelWorld};

use crate::block::BlockType;
use crate::chunk::{Chunk, ChunkPos};

/// Chunks keyed by position. Anything outside a loaded, valid chunk is
/// reported as solid to the path finder.
#[derive(Debug, Clone, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkPos, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every chunk overlapping `c` and fill the box with `block`.
    ///
    /// Handy for building test worlds:
    ///
    /// ```
    /// use voxnav_core::{BlockPos, Cuboid};
    /// use voxnav_world::{BlockType, ChunkMap};
    ///
    /// let floor = Cuboid::new(BlockPos::new(-8, 0, -8), BlockPos::new(8, 1, 8));
    /// let map = ChunkMap::filled(floor, BlockType::Stone);
    /// assert_eq!(map.block_at(BlockPos::new(3, 0, -2)), Some(BlockType::Stone));
    /// assert_eq!(map.block_at(BlockPos::new(3, 1, -2)), Some(BlockType::Air));
    /// ```
    pub fn filled(c: Cuboid, block: BlockType) -> Self {
        let mut map = Self::new();
        map.load_cuboid(c);
        map.fill(c, block);
        map
    }

    /// Insert a chunk, replacing any chunk at the same position.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.pos(), chunk)
    }

    /// Make sure a chunk exists at `pos`, creating an empty one if needed.
    pub fn load(&mut self, pos: ChunkPos) -> &mut Chunk {
        self.chunks.entry(pos).or_insert_with(|| {
            debug!("loading empty chunk {pos}");
            Chunk::new(pos)
        })
    }

    /// Load every chunk overlapping the horizontal extent of `c`.
    pub fn load_cuboid(&mut self, c: Cuboid) {
        if c.is_empty() {
            return;
        }
        let lo = ChunkPos::of(c.min);
        let hi = ChunkPos::of(c.max.shift(-1, 0, -1));
        for cz in lo.z..=hi.z {
            for cx in lo.x..=hi.x {
                self.load(ChunkPos::new(cx, cz));
            }
        }
    }

    pub fn unload(&mut self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.remove(&pos)
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Number of chunks, valid or not.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Block at `p`, or `None` when its chunk is missing or `p` is out of
    /// height range.
    pub fn block_at(&self, p: BlockPos) -> Option<BlockType> {
        self.chunks.get(&ChunkPos::of(p))?.get(p)
    }

    /// Set the block at `p`. Returns `false` when its chunk is not loaded
    /// or `p` is out of height range.
    pub fn set_block(&mut self, p: BlockPos, block: BlockType) -> bool {
        match self.chunks.get_mut(&ChunkPos::of(p)) {
            Some(chunk) => chunk.set(p, block),
            None => false,
        }
    }

    /// Fill the loaded part of `c` with `block`.
    pub fn fill(&mut self, c: Cuboid, block: BlockType) {
        for chunk in self.chunks.values_mut() {
            chunk.fill(c, block);
        }
    }

    /// Height of the highest solid block in the column at (x, z).
    pub fn top_solid(&self, x: i32, z: i32) -> Option<i32> {
        self.chunks
            .get(&ChunkPos::of(BlockPos::new(x, 0, z)))?
            .top_solid(x, z)
    }
}

impl VoxelWorld for ChunkMap {
    fn region_valid_at(&self, p: BlockPos) -> bool {
        self.chunks
            .get(&ChunkPos::of(p))
            .is_some_and(|c| c.is_valid() && c.contains(p))
    }

    fn solid_at(&self, p: BlockPos) -> bool {
        self.block_at(p).is_none_or(BlockType::is_solid)
    }

    fn surface_at(&self, p: BlockPos) -> Surface {
        self.block_at(p).map_or(Surface::Plain, BlockType::surface)
    }
}
