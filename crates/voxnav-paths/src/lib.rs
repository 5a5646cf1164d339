//! Incremental A* path finding over chunked voxel worlds.
//!
//! A search is spread across many short time slices instead of running to
//! completion in one call. The world is consulted lazily through
//! [`VoxelWorld`] as the frontier grows:
//!
//! - [`WorldProbe`] answers solidity queries, fails closed on unloaded
//!   regions, and reports the fence and liquid overlays.
//! - [`CellGrid`] caches one [`Cell`] per visited block.
//! - [`Frontier`] orders open cells by `f`.
//! - [`SearchEngine`] performs one expansion per
//!   [`advance_one`](SearchEngine::advance_one) call.
//! - [`Path`] bounds the work done per call, runs a search on a background
//!   thread on request, and hands out the resulting waypoints.
//!
//! # Movement rules
//!
//! | Move | Cost | Condition |
//! |---|---|---|
//! | ±x, ±z, same height or one block up/down | 10 | target walkable |
//! | diagonal, same height | 14 | target walkable, both corners open, floor under both corners |
//!
//! A block is walkable when it is not solid, the block below is solid and
//! the block above is not.

mod cell;
mod config;
mod distance;
mod engine;
mod error;
mod frontier;
mod grid;
mod guard;
mod path;
mod probe;
mod status;
#[cfg(test)]
mod testworld;
mod traits;

pub use cell::{Cell, CellId, CellStatus};
pub use config::{CALCULATIONS_PER_STEP, Distance, PathRequest, SearchConfig};
pub use distance::{DIAGONAL_COST, ORTHOGONAL_COST, euclidean, manhattan};
pub use engine::SearchEngine;
pub use error::PathError;
pub use frontier::Frontier;
pub use grid::CellGrid;
pub use path::Path;
pub use probe::{Probe, WorldProbe};
pub use status::{PathStatus, Waypoint};
pub use traits::{Surface, VoxelWorld};
