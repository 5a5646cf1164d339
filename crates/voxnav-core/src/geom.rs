//! Geometry primitives: [`BlockPos`], [`Vec3`] and [`Cuboid`].
//!
//! Y grows up. X and Z span the horizontal plane.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// BlockPos
// ---------------------------------------------------------------------------

/// An integer block coordinate in the world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new block position.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return a position shifted by (dx, dy, dz).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// The block directly above.
    #[inline]
    pub const fn above(self) -> Self {
        self.shift(0, 1, 0)
    }

    /// The block directly below.
    #[inline]
    pub const fn below(self) -> Self {
        self.shift(0, -1, 0)
    }

    /// Euclidean length of the position seen as a vector from the origin.
    #[inline]
    pub fn length(self) -> f64 {
        let (x, y, z) = (self.x as f64, self.y as f64, self.z as f64);
        (x * x + y * y + z * z).sqrt()
    }
}

impl PartialOrd for BlockPos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockPos {
    /// Layer by layer, then row by row: y, then z, then x.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y
            .cmp(&other.y)
            .then(self.z.cmp(&other.z))
            .then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for BlockPos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for BlockPos {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

// ---------------------------------------------------------------------------
// Vec3
// ---------------------------------------------------------------------------

/// A continuous point in world space, e.g. an entity's feet.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The block containing this point (each axis rounded toward negative
    /// infinity, so `-0.5` lands in block `-1`).
    #[inline]
    pub fn floor(self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl From<BlockPos> for Vec3 {
    /// The minimum corner of the block.
    fn from(p: BlockPos) -> Self {
        Self::new(p.x as f64, p.y as f64, p.z as f64)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Cuboid
// ---------------------------------------------------------------------------

/// A half-open box of blocks \[min, max). `min` is inclusive, `max` is
/// exclusive.
///
/// All empty cuboids are considered equal.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cuboid {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl PartialEq for Cuboid {
    fn eq(&self, other: &Self) -> bool {
        (self.min == other.min && self.max == other.max) || (self.is_empty() && other.is_empty())
    }
}

impl Eq for Cuboid {}

impl Hash for Cuboid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_empty() {
            // All empty cuboids hash the same.
            BlockPos::ZERO.hash(state);
            BlockPos::ZERO.hash(state);
        } else {
            self.min.hash(state);
            self.max.hash(state);
        }
    }
}

impl Cuboid {
    /// Create a new cuboid from two corners, canonicalized so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(self) -> BlockPos {
        self.max - self.min
    }

    /// Number of blocks in the cuboid.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let s = self.size();
        (s.x as usize) * (s.y as usize) * (s.z as usize)
    }

    /// Whether the cuboid has zero or negative volume.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    /// Whether `p` is inside the half-open cuboid.
    #[inline]
    pub fn contains(self, p: BlockPos) -> bool {
        p.x >= self.min.x
            && p.x < self.max.x
            && p.y >= self.min.y
            && p.y < self.max.y
            && p.z >= self.min.z
            && p.z < self.max.z
    }

    /// Intersection of two cuboids. Non-overlapping cuboids give the zero
    /// (empty) cuboid.
    #[inline]
    pub fn intersect(self, other: Cuboid) -> Self {
        let c = Self {
            min: BlockPos::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: BlockPos::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        };
        if c.is_empty() { Self::default() } else { c }
    }

    /// Return a cuboid of the same size translated by `+p`.
    #[inline]
    pub fn translate(self, p: BlockPos) -> Self {
        Self {
            min: self.min + p,
            max: self.max + p,
        }
    }

    /// The single horizontal layer at absolute height `y`, or an empty
    /// cuboid if `y` is out of range.
    #[inline]
    pub fn layer(self, y: i32) -> Self {
        if y < self.min.y || y >= self.max.y {
            return Self::default();
        }
        Self {
            min: BlockPos::new(self.min.x, y, self.min.z),
            max: BlockPos::new(self.max.x, y + 1, self.max.z),
        }
    }

    /// Iterator over every block, layer by layer (y), then row by row (z).
    #[inline]
    pub fn iter(self) -> CuboidIter {
        CuboidIter {
            cuboid: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for Cuboid {
    type Item = BlockPos;
    type IntoIter = CuboidIter;
    #[inline]
    fn into_iter(self) -> CuboidIter {
        self.iter()
    }
}

impl fmt::Display for Cuboid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

/// Iterator over the blocks in a [`Cuboid`], in [`BlockPos`] order.
#[derive(Clone, Debug)]
pub struct CuboidIter {
    cuboid: Cuboid,
    cur: BlockPos,
}

impl Iterator for CuboidIter {
    type Item = BlockPos;

    #[inline]
    fn next(&mut self) -> Option<BlockPos> {
        if self.cuboid.is_empty() || self.cur.y >= self.cuboid.max.y {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.cuboid.max.x {
            self.cur.x = self.cuboid.min.x;
            self.cur.z += 1;
            if self.cur.z >= self.cuboid.max.z {
                self.cur.z = self.cuboid.min.z;
                self.cur.y += 1;
            }
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cuboid.is_empty() || self.cur.y >= self.cuboid.max.y {
            return (0, Some(0));
        }
        let s = self.cuboid.size();
        let (w, d) = (s.x as usize, s.z as usize);
        let in_row = (self.cuboid.max.x - self.cur.x) as usize;
        let rows_in_layer = (self.cuboid.max.z - self.cur.z - 1) as usize;
        let layers = (self.cuboid.max.y - self.cur.y - 1) as usize;
        let total = in_row + rows_in_layer * w + layers * w * d;
        (total, Some(total))
    }
}

impl ExactSizeIterator for CuboidIter {}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn block_pos_round_trip() {
        let p = BlockPos::new(-3, 64, 12);
        let json = serde_json::to_string(&p).unwrap();
        let back: BlockPos = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
