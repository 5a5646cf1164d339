//! Seeded random terrain.
//!
//! Generation runs in five passes:
//! - random column heights, smoothed by repeated neighbourhood averaging;
//! - stone/dirt/grass columns up to those heights;
//! - ponds of still water sunk into the surface;
//! - fence runs standing on the surface;
//! - structure [`Blueprint`]s, randomly turned and mirrored, set on the
//!   surface.

use log::debug;
use rand::{Rng, RngExt};
use voxnav_core::{BlockPos, Cuboid};

use crate::block::BlockType;
use crate::blueprint::Blueprint;
use crate::chunk::{CHUNK_HEIGHT, CHUNK_WIDTH, ChunkPos};
use crate::map::ChunkMap;

/// Parameters for [`TerrainGen`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerrainConfig {
    /// Chunks generated along each side; the area is centred on the origin
    /// chunk.
    pub chunks: i32,
    /// Lowest surface height.
    pub base_height: i32,
    /// Random extra height added on top of `base_height`.
    pub relief: i32,
    /// Number of averaging passes over the height map.
    pub smoothing: usize,
    pub ponds: usize,
    pub max_pond_radius: i32,
    pub fences: usize,
    pub max_fence_len: i32,
    /// Structures placed from [`TerrainGen::structures`].
    pub structures: usize,
    /// Chance for a grass block to carry tall grass.
    pub foliage: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            chunks: 2,
            base_height: 4,
            relief: 6,
            smoothing: 3,
            ponds: 2,
            max_pond_radius: 3,
            fences: 4,
            max_fence_len: 8,
            structures: 2,
            foliage: 0.1,
        }
    }
}

/// Terrain generator driven by a caller-supplied random source.
pub struct TerrainGen<R: Rng> {
    pub rng: R,
    pub config: TerrainConfig,
    /// Blueprints to pick from in the structure pass. None by default.
    pub structures: Vec<Blueprint>,
}

impl<R: Rng> TerrainGen<R> {
    pub fn new(config: TerrainConfig, rng: R) -> Self {
        Self {
            rng,
            config,
            structures: Vec::new(),
        }
    }

    /// Set the blueprints used by the structure pass.
    pub fn with_structures(mut self, structures: Vec<Blueprint>) -> Self {
        self.structures = structures;
        self
    }

    /// Horizontal area covered by the generated chunks.
    pub fn area(&self) -> Cuboid {
        let n = self.config.chunks.max(1);
        let lo = ChunkPos::new(-(n / 2), -(n / 2)).origin();
        Cuboid::new(lo, lo.shift(n * CHUNK_WIDTH, CHUNK_HEIGHT, n * CHUNK_WIDTH))
    }

    /// Generate a complete world.
    pub fn generate(&mut self) -> ChunkMap {
        let area = self.area();
        let mut map = ChunkMap::new();
        map.load_cuboid(area);

        let heights = self.height_map(area);
        let width = area.size().x;
        for (i, &h) in heights.iter().enumerate() {
            let x = area.min.x + i as i32 % width;
            let z = area.min.z + i as i32 / width;
            self.column(&mut map, x, z, h);
        }
        for _ in 0..self.config.ponds {
            self.pond(&mut map, area);
        }
        for _ in 0..self.config.fences {
            self.fence(&mut map, area);
        }
        let structures = if self.structures.is_empty() {
            0
        } else {
            self.config.structures
        };
        for _ in 0..structures {
            self.structure(&mut map, area);
        }
        debug!(
            "generated {} chunks over {area}, {} ponds, {} fences, {structures} structures",
            map.len(),
            self.config.ponds,
            self.config.fences
        );
        map
    }

    /// Surface height of every column in `area`, row-major over (x, z).
    fn height_map(&mut self, area: Cuboid) -> Vec<i32> {
        let (w, d) = (area.size().x, area.size().z);
        let top = CHUNK_HEIGHT - 3;
        let base = self.config.base_height.clamp(1, top);
        let relief = self.config.relief.clamp(0, top - base);
        let mut heights: Vec<i32> = (0..w * d)
            .map(|_| base + self.rng.random_range(0..=relief))
            .collect();

        // Scratch buffer for the next generation.
        let mut scratch = heights.clone();
        for _ in 0..self.config.smoothing {
            for z in 0..d {
                for x in 0..w {
                    let (mut sum, mut n) = (0, 0);
                    for dz in -1..=1 {
                        for dx in -1..=1 {
                            let (nx, nz) = (x + dx, z + dz);
                            if (0..w).contains(&nx) && (0..d).contains(&nz) {
                                sum += heights[(nz * w + nx) as usize];
                                n += 1;
                            }
                        }
                    }
                    scratch[(z * w + x) as usize] = (sum + n / 2) / n;
                }
            }
            std::mem::swap(&mut heights, &mut scratch);
        }
        heights
    }

    fn column(&mut self, map: &mut ChunkMap, x: i32, z: i32, h: i32) {
        for y in 0..h {
            let block = if y < h - 3 { BlockType::Stone } else { BlockType::Dirt };
            map.set_block(BlockPos::new(x, y, z), block);
        }
        map.set_block(BlockPos::new(x, h, z), BlockType::Grass);
        if self.rng.random_bool(self.config.foliage.clamp(0.0, 1.0)) {
            map.set_block(BlockPos::new(x, h + 1, z), BlockType::TallGrass);
        }
    }

    fn random_column(&mut self, area: Cuboid) -> (i32, i32) {
        (
            self.rng.random_range(area.min.x..area.max.x),
            self.rng.random_range(area.min.z..area.max.z),
        )
    }

    /// Replace the surface layer around a random centre with still water,
    /// levelled at the centre's height.
    fn pond(&mut self, map: &mut ChunkMap, area: Cuboid) {
        let (cx, cz) = self.random_column(area);
        let Some(level) = map.top_solid(cx, cz) else {
            return;
        };
        let r = self.rng.random_range(1..=self.config.max_pond_radius.max(1));
        for z in cz - r..=cz + r {
            for x in cx - r..=cx + r {
                if (x - cx).pow(2) + (z - cz).pow(2) > r * r {
                    continue;
                }
                let p = BlockPos::new(x, level, z);
                if !area.contains(p) {
                    continue;
                }
                // Clear anything standing above the water line.
                let top = map.top_solid(x, z).unwrap_or(level);
                for y in level + 1..=top + 1 {
                    map.set_block(BlockPos::new(x, y, z), BlockType::Air);
                }
                map.set_block(p, BlockType::StationaryWater);
                if map.block_at(p.below()) == Some(BlockType::Air) {
                    map.set_block(p.below(), BlockType::Dirt);
                }
            }
        }
    }

    /// A straight run of fence along x or z, following the surface. Every
    /// other run gets a gate in the middle.
    fn fence(&mut self, map: &mut ChunkMap, area: Cuboid) {
        let (x0, z0) = self.random_column(area);
        let len = self.rng.random_range(2..=self.config.max_fence_len.max(2));
        let along_x = self.rng.random_bool(0.5);
        let gate = self.rng.random_bool(0.5);
        for i in 0..len {
            let (x, z) = if along_x { (x0 + i, z0) } else { (x0, z0 + i) };
            let Some(top) = map.top_solid(x, z) else {
                continue;
            };
            let p = BlockPos::new(x, top + 1, z);
            if !area.contains(p) || map.block_at(p) == Some(BlockType::StationaryWater) {
                continue;
            }
            let block = if gate && i == len / 2 {
                BlockType::FenceGate
            } else {
                BlockType::Fence
            };
            map.set_block(p, block);
        }
    }

    /// Pick a blueprint, turn and mirror it at random, and set it on the
    /// surface. Each column of the blueprint rests on that column's ground,
    /// so the structure follows the terrain. Air in the blueprint leaves the
    /// world untouched and columns over water are skipped.
    fn structure(&mut self, map: &mut ChunkMap, area: Cuboid) {
        let i = self.rng.random_range(0..self.structures.len());
        let mut bp = self.structures[i].clone();
        bp.rotate(self.rng.random_range(0..4));
        if self.rng.random_bool(0.5) {
            bp.reflect();
        }

        let size = bp.size();
        if size.x > area.size().x || size.z > area.size().z {
            return;
        }
        let x0 = self.rng.random_range(area.min.x..=area.max.x - size.x);
        let z0 = self.rng.random_range(area.min.z..=area.max.z - size.z);

        // Ground height per blueprint column, read before anything is placed.
        let ground: Vec<Option<i32>> = Cuboid::new(BlockPos::ZERO, size)
            .layer(0)
            .iter()
            .map(|p| {
                let (x, z) = (x0 + p.x, z0 + p.z);
                map.top_solid(x, z).filter(|&y| {
                    map.block_at(BlockPos::new(x, y + 1, z)) != Some(BlockType::StationaryWater)
                })
            })
            .collect();

        for (p, block) in bp.iter() {
            if block == BlockType::Air {
                continue;
            }
            let Some(y) = ground[(p.z * size.x + p.x) as usize] else {
                continue;
            };
            map.set_block(BlockPos::new(x0 + p.x, y + 1 + p.y, z0 + p.z), block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn generate(seed: u64, config: TerrainConfig) -> ChunkMap {
        TerrainGen::new(config, StdRng::seed_from_u64(seed)).generate()
    }

    fn surface_blocks(map: &ChunkMap, area: Cuboid) -> Vec<Option<BlockType>> {
        area.layer(0)
            .iter()
            .map(|p| map.top_solid(p.x, p.z).and_then(|y| map.block_at(p.shift(0, y, 0))))
            .collect()
    }

    #[test]
    fn same_seed_same_world() {
        let config = TerrainConfig::default();
        let area = TerrainGen::new(config.clone(), StdRng::seed_from_u64(0)).area();
        let a = generate(7, config.clone());
        let b = generate(7, config);
        assert_eq!(surface_blocks(&a, area), surface_blocks(&b, area));
    }

    #[test]
    fn covers_requested_chunks() {
        let config = TerrainConfig {
            chunks: 3,
            ..TerrainConfig::default()
        };
        let map = generate(1, config);
        assert_eq!(map.len(), 9);
        assert!(map.chunk(ChunkPos::new(-1, -1)).is_some());
        assert!(map.chunk(ChunkPos::new(1, 1)).is_some());
        assert!(map.chunk(ChunkPos::new(2, 0)).is_none());
    }

    #[test]
    fn heights_stay_in_range() {
        let config = TerrainConfig {
            ponds: 0,
            fences: 0,
            foliage: 0.0,
            ..TerrainConfig::default()
        };
        let (lo, hi) = (config.base_height, config.base_height + config.relief);
        let mut tg = TerrainGen::new(config, StdRng::seed_from_u64(3));
        let area = tg.area();
        let map = tg.generate();
        for p in area.layer(0) {
            let top = map.top_solid(p.x, p.z);
            assert!(top.is_some_and(|y| (lo..=hi).contains(&y)), "{p}: {top:?}");
            let y = top.unwrap_or_default();
            assert_eq!(map.block_at(p.shift(0, y, 0)), Some(BlockType::Grass));
            assert_eq!(map.block_at(p.shift(0, y + 1, 0)), Some(BlockType::Air));
        }
    }

    #[test]
    fn ponds_and_fences_appear() {
        let config = TerrainConfig {
            ponds: 3,
            fences: 6,
            ..TerrainConfig::default()
        };
        let map = generate(11, config);
        let count = |b| {
            [ChunkPos::new(-1, -1), ChunkPos::new(-1, 0), ChunkPos::new(0, -1), ChunkPos::new(0, 0)]
                .into_iter()
                .filter_map(|c| map.chunk(c))
                .map(|c| c.count(b))
                .sum::<usize>()
        };
        assert!(count(BlockType::StationaryWater) > 0);
        assert!(count(BlockType::Fence) + count(BlockType::FenceGate) > 0);
    }

    #[test]
    fn flat_when_no_relief() {
        let config = TerrainConfig {
            relief: 0,
            ponds: 0,
            fences: 0,
            foliage: 0.0,
            ..TerrainConfig::default()
        };
        let mut tg = TerrainGen::new(config, StdRng::seed_from_u64(5));
        let area = tg.area();
        let map = tg.generate();
        assert!(area.layer(0).iter().all(|p| map.top_solid(p.x, p.z) == Some(4)));
    }

    #[test]
    fn structures_are_turned_and_mirrored() {
        let config = TerrainConfig {
            relief: 0,
            ponds: 0,
            fences: 0,
            foliage: 0.0,
            structures: 1,
            ..TerrainConfig::default()
        };
        let gate_row = Blueprint::new("Fff").unwrap();
        let mut directions = Vec::new();
        for seed in 0..16 {
            let mut tg = TerrainGen::new(config.clone(), StdRng::seed_from_u64(seed))
                .with_structures(vec![gate_row.clone()]);
            let area = tg.area();
            let map = tg.generate();
            let at = |b| {
                area.layer(0)
                    .iter()
                    .map(|p| p.shift(0, 5, 0))
                    .filter(|&p| map.block_at(p) == Some(b))
                    .collect::<Vec<_>>()
            };
            let gates = at(BlockType::FenceGate);
            let fences = at(BlockType::Fence);
            assert_eq!(gates.len(), 1, "seed {seed}");
            assert_eq!(fences.len(), 2, "seed {seed}");
            // The two fences sit one and two blocks from the gate.
            let g = gates[0];
            let d = fences[0] + fences[1] - g - g;
            assert!(d.x % 3 == 0 && d.z % 3 == 0 && d.y == 0, "seed {seed}: {d}");
            let d = (d.x / 3, d.z / 3);
            assert_eq!(d.0.abs() + d.1.abs(), 1, "seed {seed}");
            if !directions.contains(&d) {
                directions.push(d);
            }
        }
        assert!(directions.len() > 1, "{directions:?}");
    }

    #[test]
    fn no_structures_without_blueprints() {
        let config = TerrainConfig {
            fences: 0,
            structures: 4,
            ..TerrainConfig::default()
        };
        let map = generate(2, config);
        let gates: usize = [ChunkPos::new(-1, -1), ChunkPos::new(-1, 0), ChunkPos::new(0, -1), ChunkPos::new(0, 0)]
            .into_iter()
            .filter_map(|c| map.chunk(c))
            .map(|c| c.count(BlockType::FenceGate))
            .sum();
        assert_eq!(gates, 0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let cfg: TerrainConfig = serde_json::from_str(r#"{"ponds": 0, "structures": 5}"#).unwrap();
        let def = TerrainConfig::default();
        assert_eq!(cfg.ponds, 0);
        assert_eq!(cfg.structures, 5);
        assert_eq!(cfg.chunks, def.chunks);
        assert_eq!(cfg.base_height, def.base_height);
        assert_eq!(cfg.relief, def.relief);
    }

    #[test]
    fn blocks_and_chunk_positions_survive_json() {
        let blocks = vec![BlockType::FenceGate, BlockType::StationaryWater, BlockType::Air];
        let json = serde_json::to_string(&blocks).unwrap();
        assert_eq!(serde_json::from_str::<Vec<BlockType>>(&json).unwrap(), blocks);

        let cp = ChunkPos::new(-3, 7);
        let back: ChunkPos = serde_json::from_str(&serde_json::to_string(&cp).unwrap()).unwrap();
        assert_eq!(back, cp);
    }
}
