use voxnav_core::BlockPos;

/// Cost of one orthogonal step, with or without a one-block climb or drop.
pub const ORTHOGONAL_COST: i32 = 10;

/// Cost of one diagonal step, 10·√2 rounded.
pub const DIAGONAL_COST: i32 = 14;

/// Manhattan (L1) distance between two blocks.
#[inline]
pub fn manhattan(a: BlockPos, b: BlockPos) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
}

/// Euclidean (L2) distance between two blocks.
#[inline]
pub fn euclidean(a: BlockPos, b: BlockPos) -> f64 {
    (a - b).length()
}
