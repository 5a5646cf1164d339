//! Block types and their collision classification.

use std::fmt;

use voxnav_paths::Surface;

/// The kind of block occupying one grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockType {
    #[default]
    Air,
    Stone,
    Dirt,
    Grass,
    Planks,
    Fence,
    FenceGate,
    /// Flowing water. Not solid and no overlay.
    Water,
    /// Still water surface.
    StationaryWater,
    TallGrass,
}

impl BlockType {
    /// Every block type, in declaration order.
    pub const ALL: [BlockType; 10] = [
        BlockType::Air,
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Planks,
        BlockType::Fence,
        BlockType::FenceGate,
        BlockType::Water,
        BlockType::StationaryWater,
        BlockType::TallGrass,
    ];

    /// Whether the block blocks movement. Partial blocks such as fences
    /// count as solid.
    pub const fn is_solid(self) -> bool {
        matches!(
            self,
            BlockType::Stone
                | BlockType::Dirt
                | BlockType::Grass
                | BlockType::Planks
                | BlockType::Fence
                | BlockType::FenceGate
        )
    }

    /// Shape hint reported to the path finder.
    pub const fn surface(self) -> Surface {
        match self {
            BlockType::Fence | BlockType::FenceGate => Surface::Fence,
            BlockType::StationaryWater => Surface::StillLiquid,
            _ => Surface::Plain,
        }
    }

    /// Character used by blueprints and map dumps.
    pub const fn rune(self) -> char {
        match self {
            BlockType::Air => '.',
            BlockType::Stone => '#',
            BlockType::Dirt => 'd',
            BlockType::Grass => 'g',
            BlockType::Planks => '=',
            BlockType::Fence => 'f',
            BlockType::FenceGate => 'F',
            BlockType::Water => 'w',
            BlockType::StationaryWater => '~',
            BlockType::TallGrass => '"',
        }
    }

    /// Inverse of [`rune`](Self::rune).
    pub fn from_rune(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.rune() == ch)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::Air => "air",
            BlockType::Stone => "stone",
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
            BlockType::Planks => "planks",
            BlockType::Fence => "fence",
            BlockType::FenceGate => "fence gate",
            BlockType::Water => "water",
            BlockType::StationaryWater => "stationary water",
            BlockType::TallGrass => "tall grass",
        };
        f.write_str(name)
    }
}
