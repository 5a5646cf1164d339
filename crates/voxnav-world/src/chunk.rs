//! Fixed-size columns of blocks.

use std::fmt;

use voxnav_core::{BlockPos, Cuboid};

use crate::block::BlockType;

/// Width of a chunk along x and z.
pub const CHUNK_WIDTH: i32 = 16;

/// Height of every chunk. Valid block heights are `0..CHUNK_HEIGHT`.
pub const CHUNK_HEIGHT: i32 = 256;

const CHUNK_VOLUME: usize = (CHUNK_WIDTH * CHUNK_HEIGHT * CHUNK_WIDTH) as usize;

/// Horizontal position of a chunk, in chunk units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk containing block `p`.
    pub const fn of(p: BlockPos) -> Self {
        Self {
            x: p.x.div_euclid(CHUNK_WIDTH),
            z: p.z.div_euclid(CHUNK_WIDTH),
        }
    }

    /// World position of the chunk's lowest corner.
    pub const fn origin(self) -> BlockPos {
        BlockPos::new(self.x * CHUNK_WIDTH, 0, self.z * CHUNK_WIDTH)
    }

    /// Every block position the chunk covers.
    pub fn bounds(self) -> Cuboid {
        let o = self.origin();
        Cuboid::new(o, o.shift(CHUNK_WIDTH, CHUNK_HEIGHT, CHUNK_WIDTH))
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

/// A 16×256×16 column of blocks.
///
/// A chunk may exist without being valid, for example while its contents
/// are still being generated. Path searches treat invalid chunks as solid.
#[derive(Debug, Clone)]
pub struct Chunk {
    pos: ChunkPos,
    blocks: Box<[BlockType]>,
    valid: bool,
}

impl Chunk {
    /// A valid chunk full of air.
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            blocks: vec![BlockType::Air; CHUNK_VOLUME].into_boxed_slice(),
            valid: true,
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Index of a world position, or `None` outside this chunk.
    fn index(&self, p: BlockPos) -> Option<usize> {
        let o = self.pos.origin();
        let (rx, ry, rz) = (p.x - o.x, p.y, p.z - o.z);
        if !(0..CHUNK_WIDTH).contains(&rx)
            || !(0..CHUNK_HEIGHT).contains(&ry)
            || !(0..CHUNK_WIDTH).contains(&rz)
        {
            return None;
        }
        Some(((ry * CHUNK_WIDTH + rz) * CHUNK_WIDTH + rx) as usize)
    }

    /// Whether the world position `p` falls inside this chunk.
    pub fn contains(&self, p: BlockPos) -> bool {
        self.index(p).is_some()
    }

    /// Block at world position `p`, or `None` outside this chunk.
    pub fn get(&self, p: BlockPos) -> Option<BlockType> {
        self.index(p).map(|i| self.blocks[i])
    }

    /// Set the block at world position `p`. Returns `false` if `p` is
    /// outside this chunk.
    pub fn set(&mut self, p: BlockPos, block: BlockType) -> bool {
        match self.index(p) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }

    /// Fill the part of `c` that overlaps this chunk.
    pub fn fill(&mut self, c: Cuboid, block: BlockType) {
        for p in c.intersect(self.pos.bounds()) {
            self.set(p, block);
        }
    }

    /// Count blocks of the given type.
    pub fn count(&self, block: BlockType) -> usize {
        self.blocks.iter().filter(|&&b| b == block).count()
    }

    /// Height of the highest solid block in column (x, z), if any.
    pub fn top_solid(&self, x: i32, z: i32) -> Option<i32> {
        (0..CHUNK_HEIGHT)
            .rev()
            .find(|&y| self.get(BlockPos::new(x, y, z)).is_some_and(BlockType::is_solid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_pos_of_negative_coords() {
        assert_eq!(ChunkPos::of(BlockPos::new(0, 5, 0)), ChunkPos::new(0, 0));
        assert_eq!(ChunkPos::of(BlockPos::new(15, 5, 15)), ChunkPos::new(0, 0));
        assert_eq!(ChunkPos::of(BlockPos::new(16, 5, -1)), ChunkPos::new(1, -1));
        assert_eq!(ChunkPos::of(BlockPos::new(-16, 0, -17)), ChunkPos::new(-1, -2));
    }

    #[test]
    fn get_set_in_world_coords() {
        let mut c = Chunk::new(ChunkPos::new(-1, 2));
        let p = BlockPos::new(-3, 10, 40);
        assert!(c.contains(p));
        assert_eq!(c.get(p), Some(BlockType::Air));
        assert!(c.set(p, BlockType::Stone));
        assert_eq!(c.get(p), Some(BlockType::Stone));
        assert_eq!(c.count(BlockType::Stone), 1);

        assert!(!c.set(BlockPos::new(0, 10, 40), BlockType::Stone));
        assert_eq!(c.get(BlockPos::new(-3, -1, 40)), None);
        assert_eq!(c.get(BlockPos::new(-3, CHUNK_HEIGHT, 40)), None);
    }

    #[test]
    fn fill_clips_to_chunk() {
        let mut c = Chunk::new(ChunkPos::new(0, 0));
        c.fill(
            Cuboid::new(BlockPos::new(-4, 0, -4), BlockPos::new(4, 2, 4)),
            BlockType::Dirt,
        );
        assert_eq!(c.count(BlockType::Dirt), 4 * 2 * 4);
        assert_eq!(c.top_solid(1, 1), Some(1));
        assert_eq!(c.top_solid(8, 8), None);
    }

    #[test]
    fn validity_flag() {
        let mut c = Chunk::new(ChunkPos::default());
        assert!(c.is_valid());
        c.set_valid(false);
        assert!(!c.is_valid());
    }
}
