//! In-memory chunked voxel worlds for the voxnav path finder.
//!
//! [`ChunkMap`] implements [`VoxelWorld`](voxnav_paths::VoxelWorld): missing
//! or invalid chunks read as solid, fences and gates report
//! [`Surface::Fence`](voxnav_paths::Surface::Fence) and still water reports
//! [`Surface::StillLiquid`](voxnav_paths::Surface::StillLiquid).
//! Worlds are built by hand, from ASCII [`Blueprint`]s, or by the seeded
//! [`TerrainGen`].

pub mod block;
pub mod blueprint;
pub mod chunk;
pub mod map;
pub mod terrain;

pub use block::BlockType;
pub use blueprint::{Blueprint, BlueprintError};
pub use chunk::{CHUNK_HEIGHT, CHUNK_WIDTH, Chunk, ChunkPos};
pub use map::ChunkMap;
pub use terrain::{TerrainConfig, TerrainGen};
