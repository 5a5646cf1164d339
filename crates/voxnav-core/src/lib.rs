//! Geometry primitives shared by the voxnav crates.
//!
//! Provides [`BlockPos`] (an integer block coordinate), [`Vec3`] (a
//! continuous world point that floors to a block) and [`Cuboid`] (a
//! half-open box of blocks).

pub mod geom;

pub use geom::{BlockPos, Cuboid, CuboidIter, Vec3};
