//! # Voxels
//!
//! Everything about the voxel data itself, independent of rendering:
//!
//! * **Block**: the packed 32-bit voxel and its texture protocol
//! * **NoiseSystem**: the seeded heightmap
//! * **HeightCache**: heightmap columns shared between vertically stacked chunks
//! * **Chunk**: keys, storage, generation and the neighbour shell used for culling
//! * **World**: the sparse block map of generated chunks

pub mod block;
pub mod chunk;
pub mod height_cache;
pub mod noise_system;
pub mod world;
