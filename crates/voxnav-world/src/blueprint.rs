//! Worlds and structures described as stacked ASCII layers.
//!
//! A [`Blueprint`] is a box of blocks written as text. Each layer is a
//! rectangle of block runes (see [`BlockType::rune`]), rows running along
//! z and columns along x. Layers are separated by a blank line and listed
//! from the bottom up.
//!
//! ```
//! use voxnav_core::BlockPos;
//! use voxnav_world::{Blueprint, BlockType};
//!
//! let bp = Blueprint::new("\
//! ####
//! ####
//!
//! .f.
//! ...").unwrap();
//! assert_eq!(bp.size(), BlockPos::new(3, 2, 2));
//! assert_eq!(bp.get(BlockPos::new(1, 1, 0)), Some(BlockType::Fence));
//! ```

use std::fmt;

use voxnav_core::{BlockPos, Cuboid};

use crate::block::BlockType;
use crate::map::ChunkMap;

/// A box of blocks parsed from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    blocks: Vec<BlockType>,
    size: BlockPos,
}

impl Blueprint {
    /// Parse a blueprint.
    ///
    /// Leading and trailing whitespace of the whole text is ignored, as is
    /// trailing whitespace on each line. Every layer must have the same
    /// number of rows and every row the same width.
    pub fn new(s: &str) -> Result<Self, BlueprintError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BlueprintError::Empty);
        }

        let mut layers: Vec<Vec<Vec<BlockType>>> = vec![Vec::new()];
        for (line_no, line) in s.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                if layers.last().is_some_and(|l| !l.is_empty()) {
                    layers.push(Vec::new());
                }
                continue;
            }
            let y = layers.len() as i32 - 1;
            let z = layers.last().map_or(0, Vec::len) as i32;
            let row = line
                .chars()
                .enumerate()
                .map(|(x, ch)| {
                    BlockType::from_rune(ch).ok_or(BlueprintError::InvalidRune {
                        ch,
                        pos: BlockPos::new(x as i32, y, z),
                        line: line_no + 1,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(layer) = layers.last_mut() {
                layer.push(row);
            }
        }

        let width = layers[0][0].len();
        let depth = layers[0].len();
        for (y, layer) in layers.iter().enumerate() {
            if layer.len() != depth {
                return Err(BlueprintError::InconsistentSize {
                    layer: y,
                    expected: (width, depth),
                    found: (layer.first().map_or(0, Vec::len), layer.len()),
                });
            }
            if let Some(row) = layer.iter().find(|r| r.len() != width) {
                return Err(BlueprintError::InconsistentSize {
                    layer: y,
                    expected: (width, depth),
                    found: (row.len(), layer.len()),
                });
            }
        }

        let size = BlockPos::new(width as i32, layers.len() as i32, depth as i32);
        let blocks = layers.into_iter().flatten().flatten().collect();
        Ok(Self { blocks, size })
    }

    /// Extent along x, y and z.
    pub fn size(&self) -> BlockPos {
        self.size
    }

    /// The box covered by the blueprint when placed at the origin.
    pub fn bounds(&self) -> Cuboid {
        Cuboid::new(BlockPos::ZERO, self.size)
    }

    fn index(&self, p: BlockPos) -> Option<usize> {
        if !self.bounds().contains(p) {
            return None;
        }
        Some(((p.y * self.size.z + p.z) * self.size.x + p.x) as usize)
    }

    /// Block at a position relative to the blueprint's corner.
    pub fn get(&self, p: BlockPos) -> Option<BlockType> {
        self.index(p).map(|i| self.blocks[i])
    }

    /// All blocks with their relative positions, bottom layer first.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, BlockType)> + '_ {
        self.bounds().iter().zip(self.blocks.iter().copied())
    }

    /// Write the blueprint into `map` with its corner at `origin`, loading
    /// chunks as needed. Air in the blueprint overwrites existing blocks.
    pub fn place(&self, map: &mut ChunkMap, origin: BlockPos) {
        map.load_cuboid(self.bounds().translate(origin));
        for (p, block) in self.iter() {
            map.set_block(p + origin, block);
        }
    }

    /// A fresh world holding only this blueprint, corner at `origin`.
    pub fn to_map(&self, origin: BlockPos) -> ChunkMap {
        let mut map = ChunkMap::new();
        self.place(&mut map, origin);
        map
    }

    /// Mirror along x.
    pub fn reflect(&mut self) {
        let w = self.size.x as usize;
        for row in self.blocks.chunks_mut(w) {
            row.reverse();
        }
    }

    /// Rotate n quarter turns counter-clockwise seen from above. Negative
    /// n rotates clockwise.
    pub fn rotate(&mut self, n: i32) {
        for _ in 0..n.rem_euclid(4) {
            self.rotate90();
        }
    }

    fn rotate90(&mut self) {
        let old = self.clone();
        let (w, h, d) = (old.size.x, old.size.y, old.size.z);
        self.size = BlockPos::new(d, h, w);
        for p in self.bounds() {
            let src = BlockPos::new(w - 1 - p.z, p.y, p.x);
            if let (Some(i), Some(b)) = (self.index(p), old.get(src)) {
                self.blocks[i] = b;
            }
        }
    }
}

impl fmt::Display for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.y {
            if y > 0 {
                f.write_str("\n\n")?;
            }
            for z in 0..self.size.z {
                if z > 0 {
                    f.write_str("\n")?;
                }
                for x in 0..self.size.x {
                    let b = self.get(BlockPos::new(x, y, z)).unwrap_or_default();
                    write!(f, "{}", b.rune())?;
                }
            }
        }
        Ok(())
    }
}

/// Errors that can occur when parsing a blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlueprintError {
    /// Nothing but whitespace.
    Empty,
    /// A layer's width or depth differs from the first layer's.
    InconsistentSize {
        layer: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A character that names no block type.
    InvalidRune { ch: char, pos: BlockPos, line: usize },
}

impl fmt::Display for BlueprintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("blueprint: empty"),
            Self::InconsistentSize {
                layer,
                expected,
                found,
            } => write!(
                f,
                "blueprint: layer {layer} is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::InvalidRune { ch, pos, line } => write!(
                f,
                "blueprint contains invalid rune \u{201c}{ch}\u{201d} at {pos} (line {line})"
            ),
        }
    }
}

impl std::error::Error for BlueprintError {}
