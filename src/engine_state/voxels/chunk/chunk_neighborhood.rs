//! # Chunk Neighborhood
//!
//! Face culling needs to know, for every block on a chunk's surface, whether the
//! block across the face is air. The mesher works on a padded solidity mask:
//! one bit per block of the chunk plus a one-block shell holding the touching
//! layer of each of the six face neighbours (`CHUNK_DIMENSION_WRAPPED`³ bits,
//! indexed `x + W*y + W²*z`).
//!
//! Neighbour layers come from resident chunks when available and are otherwise
//! synthesised from the generation rule. Edge and corner cells of the shell are
//! never consulted and stay air.

use bitvec::prelude::BitVec;

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::block_type::BlockType;

use super::chunk_creation::block_type_for_height;
use super::{
    Chunk, ChunkKey, CHUNK_DIMENSION, CHUNK_DIMENSION_WRAPPED, CHUNK_PLANE_SIZE_WRAPPED,
    CHUNK_SIZE_WRAPPED,
};

const D: usize = CHUNK_DIMENSION as usize;

/// Local coordinate of cell `(a, b)` of the layer on a chunk's `side` face.
fn layer_coordinate(side: BlockSide, a: usize, b: usize) -> (usize, usize, usize) {
    match side {
        BlockSide::FRONT => (0, a, b),
        BlockSide::BACK => (D - 1, a, b),
        BlockSide::BOTTOM => (a, 0, b),
        BlockSide::TOP => (a, D - 1, b),
        BlockSide::LEFT => (a, b, 0),
        BlockSide::RIGHT => (a, b, D - 1),
    }
}

/// Solidity of the one-block-thick layer on one face of a chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorderLayer {
    solid: BitVec,
}

impl BorderLayer {
    /// Copies the layer on `chunk`'s own `side` face.
    pub fn from_chunk(chunk: &Chunk, side: BlockSide) -> Self {
        Self::build(side, |x, y, z| !chunk.block_at(x, y, z).is_air())
    }

    /// Computes the layer on the `side` face of chunk `key` straight from the
    /// generation rule, without materialising the chunk.
    ///
    /// # Arguments
    /// * `heights` - Surface heights of `key`'s column, indexed `x + D * z`
    pub fn synthesize(key: ChunkKey, side: BlockSide, heights: &[i32]) -> Self {
        let base_y = key.origin().y;
        Self::build(side, |x, y, z| {
            block_type_for_height(base_y + y as i32, heights[x + D * z]) != BlockType::AIR
        })
    }

    fn build(side: BlockSide, is_solid: impl Fn(usize, usize, usize) -> bool) -> Self {
        let mut solid = BitVec::repeat(false, D * D);
        for b in 0..D {
            for a in 0..D {
                let (x, y, z) = layer_coordinate(side, a, b);
                solid.set(a + D * b, is_solid(x, y, z));
            }
        }
        Self { solid }
    }

    pub fn is_solid(&self, a: usize, b: usize) -> bool {
        self.solid[a + D * b]
    }
}

/// Padded solidity mask of one chunk and its six face neighbours' touching layers.
pub struct ChunkNeighborhood {
    solid_array: BitVec,
}

impl ChunkNeighborhood {
    /// Creates the mask for `chunk` with an all-air shell.
    pub fn new(chunk: &Chunk) -> Self {
        let mut solid_array = BitVec::repeat(false, CHUNK_SIZE_WRAPPED);
        for z in 0..D {
            for y in 0..D {
                for x in 0..D {
                    if !chunk.block_at(x, y, z).is_air() {
                        solid_array.set(Self::wrapped_index(x + 1, y + 1, z + 1), true);
                    }
                }
            }
        }
        Self { solid_array }
    }

    /// Fills the shell on `side` with the neighbour's touching layer.
    ///
    /// # Arguments
    /// * `side` - Face of the centre chunk the neighbour lies across
    /// * `layer` - The neighbour's layer on its `side.opposite()` face
    pub fn set_neighbor_layer(&mut self, side: BlockSide, layer: &BorderLayer) {
        let n = side.normal();
        let shift = |local: usize, normal: i32| (local as i32 + 1 + normal * D as i32) as usize;
        for b in 0..D {
            for a in 0..D {
                let (x, y, z) = layer_coordinate(side.opposite(), a, b);
                let index = Self::wrapped_index(shift(x, n.x), shift(y, n.y), shift(z, n.z));
                self.solid_array.set(index, layer.is_solid(a, b));
            }
        }
    }

    #[inline]
    fn wrapped_index(i: usize, j: usize, k: usize) -> usize {
        i + CHUNK_DIMENSION_WRAPPED * j + CHUNK_PLANE_SIZE_WRAPPED * k
    }

    /// Checks the padded mask at wrapped coordinates (0 and `D + 1` are the shell).
    pub fn is_block_solid(&self, i: usize, j: usize, k: usize) -> bool {
        self.solid_array[Self::wrapped_index(i, j, k)]
    }

    /// For the block at local `(x, y, z)`, whether the neighbour across each face
    /// (in `BlockSide` order) is solid.
    pub fn generate_adjacent_blocks(&self, x: usize, y: usize, z: usize) -> [bool; 6] {
        // Shell offset.
        let i = x + 1;
        let j = y + 1;
        let k = z + 1;

        let mut adjacency_data = [false; 6];
        adjacency_data[BlockSide::FRONT as usize] = self.is_block_solid(i - 1, j, k);
        adjacency_data[BlockSide::BACK as usize] = self.is_block_solid(i + 1, j, k);
        adjacency_data[BlockSide::BOTTOM as usize] = self.is_block_solid(i, j - 1, k);
        adjacency_data[BlockSide::TOP as usize] = self.is_block_solid(i, j + 1, k);
        adjacency_data[BlockSide::LEFT as usize] = self.is_block_solid(i, j, k - 1);
        adjacency_data[BlockSide::RIGHT as usize] = self.is_block_solid(i, j, k + 1);
        adjacency_data
    }
}
