//! Shared helpers for the voxnav demos: endpoint selection and a top-down
//! text rendering of a world with a route drawn over it.

use std::collections::HashSet;

use voxnav_core::{BlockPos, Cuboid};
use voxnav_world::{BlockType, ChunkMap};

/// Where an agent standing in column (x, z) would be, if the column's top
/// block is something to stand on.
pub fn standing_spot(map: &ChunkMap, x: i32, z: i32) -> Option<BlockPos> {
    let y = map.top_solid(x, z)?;
    match map.block_at(BlockPos::new(x, y, z))? {
        BlockType::Grass | BlockType::Dirt | BlockType::Stone | BlockType::Planks => {
            Some(BlockPos::new(x, y + 1, z))
        }
        _ => None,
    }
}

/// The standing spot nearest to `(x, z)`, searching rings of growing radius
/// inside `area`.
pub fn nearest_spot(map: &ChunkMap, area: Cuboid, x: i32, z: i32) -> Option<BlockPos> {
    let max_r = area.size().x.max(area.size().z);
    (0..=max_r).find_map(|r| {
        (-r..=r)
            .flat_map(|dz| (-r..=r).map(move |dx| (dx, dz)))
            .filter(|&(dx, dz)| dx.abs() == r || dz.abs() == r)
            .map(|(dx, dz)| (x + dx, z + dz))
            .filter(|&(px, pz)| area.contains(BlockPos::new(px, area.min.y, pz)))
            .find_map(|(px, pz)| standing_spot(map, px, pz))
    })
}

/// Render `area` seen from above, one character per column.
///
/// Columns show the rune of their highest non-air block. Route blocks are
/// drawn as `*`, the source as `S` and the destination as `D`.
pub fn render_top_down(
    map: &ChunkMap,
    area: Cuboid,
    route: &[BlockPos],
    source: BlockPos,
    destination: BlockPos,
) -> String {
    let on_route: HashSet<(i32, i32)> = route.iter().map(|p| (p.x, p.z)).collect();
    let mut out = String::with_capacity(((area.size().x + 1) * area.size().z) as usize);
    for z in area.min.z..area.max.z {
        for x in area.min.x..area.max.x {
            let ch = if (x, z) == (source.x, source.z) {
                'S'
            } else if (x, z) == (destination.x, destination.z) {
                'D'
            } else if on_route.contains(&(x, z)) {
                '*'
            } else {
                top_block(map, x, z).map_or(' ', BlockType::rune)
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn top_block(map: &ChunkMap, x: i32, z: i32) -> Option<BlockType> {
    let y = map.top_solid(x, z)?;
    // Show what stands on the ground rather than the ground itself.
    match map.block_at(BlockPos::new(x, y + 1, z)) {
        Some(b) if b != BlockType::Air => Some(b),
        _ => map.block_at(BlockPos::new(x, y, z)),
    }
}
