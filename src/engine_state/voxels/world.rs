//! # World Module
//!
//! `BlockMap` is the in-memory voxel world: a sparse map from chunk key to the
//! generated chunk. Only chunks that a worker finished generating and that have
//! not been unloaded are present, which makes the world effectively unbounded
//! while memory stays proportional to the streaming radius.

use std::collections::HashMap;

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::chunk::chunk_neighborhood::BorderLayer;
use crate::engine_state::voxels::chunk::{Chunk, ChunkKey, CHUNK_DIMENSION};

/// Sparse 3D grid of generated chunks.
#[derive(Default)]
pub struct BlockMap {
    chunks: HashMap<ChunkKey, Chunk>,
}

impl BlockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a generated chunk into the map, replacing any previous data for its key.
    pub fn insert(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.key, chunk);
    }

    pub fn remove(&mut self, key: &ChunkKey) -> Option<Chunk> {
        self.chunks.remove(key)
    }

    pub fn get(&self, key: &ChunkKey) -> Option<&Chunk> {
        self.chunks.get(key)
    }

    pub fn contains(&self, key: &ChunkKey) -> bool {
        self.chunks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ChunkKey> {
        self.chunks.keys()
    }

    /// The block at world coordinate `(gx, gy, gz)`, if its chunk is present.
    pub fn block_at(&self, gx: i32, gy: i32, gz: i32) -> Option<Block> {
        let key = ChunkKey::containing_block(gx, gy, gz);
        let chunk = self.chunks.get(&key)?;
        Some(chunk.block_at(
            gx.rem_euclid(CHUNK_DIMENSION) as usize,
            gy.rem_euclid(CHUNK_DIMENSION) as usize,
            gz.rem_euclid(CHUNK_DIMENSION) as usize,
        ))
    }

    /// Copies the layer of `key`'s neighbour across `side` that touches `key`.
    ///
    /// # Returns
    /// `None` if that neighbour is not in the map.
    pub fn neighbor_layer(&self, key: ChunkKey, side: BlockSide) -> Option<BorderLayer> {
        self.chunks
            .get(&key.offset(side))
            .map(|neighbor| BorderLayer::from_chunk(neighbor, side.opposite()))
    }
}
