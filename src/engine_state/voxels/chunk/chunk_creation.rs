//! # Chunk Creation Module
//!
//! World generation. Every block is a pure function of its world coordinate and
//! the noise seed:
//!
//! | world y            | block        |
//! |--------------------|--------------|
//! | `y > H`, `y <= SEA_LEVEL` | water |
//! | `y > H`, above sea | air          |
//! | `y == H`           | grass        |
//! | `H - DIRT_DEPTH <= y < H` | dirt  |
//! | deeper             | cobblestone  |
//!
//! where `H` is the surface height of the column.

use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::height_cache::{compute_column, HeightCache};
use crate::engine_state::voxels::noise_system::NoiseSystem;

use super::{Chunk, ChunkKey, CHUNK_DIMENSION};

/// Air above the surface is filled with water up to and including this height.
pub const SEA_LEVEL: i32 = 32;
/// Number of dirt blocks between grass and cobblestone.
pub const DIRT_DEPTH: i32 = 3;

/// The block type at world height `gy` in a column whose surface is at `height`.
pub fn block_type_for_height(gy: i32, height: i32) -> BlockType {
    if gy > height {
        if gy <= SEA_LEVEL {
            BlockType::WATER
        } else {
            BlockType::AIR
        }
    } else if gy == height {
        BlockType::GRASS
    } else if gy >= height - DIRT_DEPTH {
        BlockType::DIRT
    } else {
        BlockType::COBBLESTONE
    }
}

/// Generates the block at world coordinate `(gx, gy, gz)`.
pub fn generate_block(gx: i32, gy: i32, gz: i32, noise: &NoiseSystem) -> Block {
    block_type_for_height(gy, noise.surface_height(gx, gz)).block()
}

/// Generates a chunk from its column's precomputed surface heights.
///
/// # Arguments
/// * `key` - The chunk to generate
/// * `heights` - Column heights indexed `x + CHUNK_DIMENSION * z`
/// * `stride` - Sampling stride; 1 generates every block exactly
pub fn generate_from_heights(key: ChunkKey, heights: &[i32], stride: usize) -> Chunk {
    let d = CHUNK_DIMENSION as usize;
    let stride = stride.clamp(1, d);
    let origin = key.origin();

    let mut chunk = Chunk::empty(key);
    for z in 0..d {
        let sz = z - z % stride;
        for x in 0..d {
            let sx = x - x % stride;
            let height = heights[sx + d * sz];
            for y in 0..d {
                let sy = y - y % stride;
                let gy = origin.y + sy as i32;
                chunk.set_block_at(x, y, z, block_type_for_height(gy, height).block());
            }
        }
    }

    chunk
}

/// Generates the voxel data of chunk `key`.
pub fn generate_chunk(key: ChunkKey, noise: &NoiseSystem) -> Chunk {
    generate_from_heights(key, &compute_column(noise, key.x, key.z), 1)
}

/// Generates chunk `key` at reduced detail: each `stride³` cell takes the block
/// found at its minimum corner.
pub fn generate_chunk_strided(key: ChunkKey, noise: &NoiseSystem, stride: usize) -> Chunk {
    generate_from_heights(key, &compute_column(noise, key.x, key.z), stride)
}

/// Generates chunk `key` using (and filling) a shared height cache.
pub fn generate_chunk_cached(key: ChunkKey, heights: &HeightCache) -> Chunk {
    generate_from_heights(key, &heights.column(key.x, key.z), 1)
}
