//! # Chunk Module
//!
//! This module provides the `Chunk` struct and the `ChunkKey` that identifies it.
//! A chunk is a 32x32x32 block region of the world, the unit of generation,
//! meshing and streaming.
//!
//! ## Storage
//!
//! Blocks are stored densely in one heap allocation of `BLOCKS_PER_CHUNK` entries
//! indexed `x + D*y + D²*z`. A chunk is built by exactly one worker thread and then
//! moved into the shared block map; it is never mutated after that.

use std::hash::{Hash, Hasher};

use cgmath::{Point3, Vector3};

use super::block::block_side::BlockSide;
use super::block::Block;

pub mod chunk_creation;
pub mod chunk_neighborhood;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 32;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const BLOCKS_PER_CHUNK: usize = (CHUNK_PLANE_SIZE * CHUNK_DIMENSION) as usize;
/// The dimension of a chunk including an extra layer of blocks on each side for neighbor lookups.
pub const CHUNK_DIMENSION_WRAPPED: usize = (CHUNK_DIMENSION + 2) as usize;
/// The number of blocks in a wrapped 2D chunk plane.
pub const CHUNK_PLANE_SIZE_WRAPPED: usize = CHUNK_DIMENSION_WRAPPED * CHUNK_DIMENSION_WRAPPED;
/// The total number of blocks in a wrapped chunk.
pub const CHUNK_SIZE_WRAPPED: usize = CHUNK_PLANE_SIZE_WRAPPED * CHUNK_DIMENSION_WRAPPED;

/// Smallest chunk coordinate whose blocks, and whose neighbours' blocks, have
/// i32 world coordinates.
pub const MIN_CHUNK_COORD: i32 = i32::MIN / CHUNK_DIMENSION + 1;
/// Largest such chunk coordinate.
pub const MAX_CHUNK_COORD: i32 = i32::MAX / CHUNK_DIMENSION - 1;

/// Position of a chunk in chunk-grid units.
///
/// Two chunks are the same entity iff their keys are equal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChunkKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Spreads one axis over 64 bits; distinct multipliers per axis keep `(a, b, c)`
/// and its permutations from colliding once XORed together.
fn axis_hash(value: i32, multiplier: u64) -> u64 {
    let mut h = (value as u32 as u64).wrapping_mul(multiplier);
    h ^= h >> 29;
    h.wrapping_mul(0xBF58_476D_1CE4_E5B9)
}

impl Hash for ChunkKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = axis_hash(self.x, 0x9E37_79B9_7F4A_7C15)
            ^ axis_hash(self.y, 0xC2B2_AE3D_27D4_EB4F)
            ^ axis_hash(self.z, 0x1656_67B1_9E37_79F9);
        state.write_u64(combined);
    }
}

impl ChunkKey {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Manhattan distance in chunk units, saturating at `i32::MAX`.
    pub fn manhattan_distance(&self, other: &ChunkKey) -> i32 {
        let total = self.x.abs_diff(other.x) as u64
            + self.y.abs_diff(other.y) as u64
            + self.z.abs_diff(other.z) as u64;
        total.min(i32::MAX as u64) as i32
    }

    /// Whether the chunk and its six neighbours lie inside i32 world space.
    /// Only such chunks can be generated.
    pub fn is_representable(&self) -> bool {
        let range = MIN_CHUNK_COORD..=MAX_CHUNK_COORD;
        range.contains(&self.x) && range.contains(&self.y) && range.contains(&self.z)
    }

    /// The key of the chunk sharing this chunk's `side` face.
    pub fn offset(&self, side: BlockSide) -> ChunkKey {
        let n = side.normal();
        ChunkKey::new(
            self.x.saturating_add(n.x),
            self.y.saturating_add(n.y),
            self.z.saturating_add(n.z),
        )
    }

    /// World-space block coordinate of this chunk's minimum corner.
    ///
    /// Saturates for keys that are not representable.
    pub fn origin(&self) -> Point3<i32> {
        Point3::new(
            self.x.saturating_mul(CHUNK_DIMENSION),
            self.y.saturating_mul(CHUNK_DIMENSION),
            self.z.saturating_mul(CHUNK_DIMENSION),
        )
    }

    /// The chunk containing the world block `(gx, gy, gz)`.
    pub fn containing_block(gx: i32, gy: i32, gz: i32) -> ChunkKey {
        ChunkKey::new(
            gx.div_euclid(CHUNK_DIMENSION),
            gy.div_euclid(CHUNK_DIMENSION),
            gz.div_euclid(CHUNK_DIMENSION),
        )
    }

    /// The chunk containing a world-space position.
    pub fn from_world_position(position: Point3<f32>) -> ChunkKey {
        Self::containing_block(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        )
    }
}

impl From<Point3<i32>> for ChunkKey {
    fn from(p: Point3<i32>) -> Self {
        ChunkKey::new(p.x, p.y, p.z)
    }
}

impl std::ops::Add<Vector3<i32>> for ChunkKey {
    type Output = ChunkKey;

    fn add(self, rhs: Vector3<i32>) -> ChunkKey {
        ChunkKey::new(
            self.x.saturating_add(rhs.x),
            self.y.saturating_add(rhs.y),
            self.z.saturating_add(rhs.z),
        )
    }
}

/// Index of local block `(x, y, z)` in a chunk's block array.
#[inline]
pub fn block_index(x: usize, y: usize, z: usize) -> usize {
    let d = CHUNK_DIMENSION as usize;
    x + d * y + d * d * z
}

/// A generated 32x32x32 region of blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub key: ChunkKey,
    blocks: Box<[Block]>,
}

impl Chunk {
    /// Creates a chunk completely filled with air.
    pub fn empty(key: ChunkKey) -> Self {
        Self {
            key,
            blocks: vec![Block::AIR; BLOCKS_PER_CHUNK].into_boxed_slice(),
        }
    }

    /// Wraps an already generated block array.
    ///
    /// # Returns
    /// `None` if `blocks` does not hold exactly `BLOCKS_PER_CHUNK` entries.
    pub fn from_blocks(key: ChunkKey, blocks: Box<[Block]>) -> Option<Self> {
        (blocks.len() == BLOCKS_PER_CHUNK).then_some(Self { key, blocks })
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if any coordinate is outside `0..CHUNK_DIMENSION`.
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[block_index(x, y, z)]
    }

    pub fn set_block_at(&mut self, x: usize, y: usize, z: usize, block: Block) {
        self.blocks[block_index(x, y, z)] = block;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of non-air blocks.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_air)
    }
}
