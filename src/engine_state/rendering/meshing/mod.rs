//! Mesh generation for voxel chunks.
//!
//! A chunk is meshed into a flat triangle list: every non-air block emits one
//! quad (six vertices) for each face whose neighbour, inside the chunk or across
//! its boundary, is air. The resulting vertices are already in world space, so
//! all resident chunks can share one vertex buffer and one pipeline.
//!
//! # Architecture
//! - `face`: quad corner layout and triangle emission
//! - `slot_allocator`: free-list ranges inside the shared vertex buffer
//! - `renderer`: the draw-call seam towards the GPU

use cgmath::Point3;

use crate::engine_state::rendering::texture_atlas::TextureAtlas;
use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::chunk::chunk_neighborhood::ChunkNeighborhood;
use crate::engine_state::voxels::chunk::{Chunk, ChunkKey, BLOCKS_PER_CHUNK, CHUNK_DIMENSION};

pub mod face;
pub mod renderer;
pub mod slot_allocator;

pub use face::{Face, VERTICES_PER_FACE};
pub use renderer::{ChunkDrawSink, DrawCall, RecordingDrawSink, RenderPassDrawSink};
pub use slot_allocator::{FreeSlot, SlotAllocator, TOTAL_VERT_CAP};

/// Upper bound on the vertices one chunk mesh can contain.
pub const MAX_VERTICES_PER_CHUNK: usize = BLOCKS_PER_CHUNK * 6 * VERTICES_PER_FACE;

/// Where a resident chunk's geometry lives in the shared vertex buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkMesh {
    pub vertex_offset: u32,
    pub vertex_count: u32,
    pub world_x: i32,
    pub world_y: i32,
    pub world_z: i32,
}

impl ChunkMesh {
    pub fn new(key: ChunkKey, vertex_offset: u32, vertex_count: u32) -> Self {
        let origin = key.origin();
        Self {
            vertex_offset,
            vertex_count,
            world_x: origin.x,
            world_y: origin.y,
            world_z: origin.z,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// World-space bounding box of the chunk, `origin` to `origin + CHUNK_DIMENSION`.
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        let min = Point3::new(self.world_x as f32, self.world_y as f32, self.world_z as f32);
        let size = CHUNK_DIMENSION as f32;
        (min, Point3::new(min.x + size, min.y + size, min.z + size))
    }
}

/// Builds the triangle list of `chunk`.
///
/// # Arguments
/// * `chunk` - The chunk being meshed
/// * `neighborhood` - Solidity of the chunk padded with its neighbours' touching layers
/// * `atlas` - Tile grid used to compute each face's UV rectangle
///
/// # Returns
/// Whole quads only: the length is always a multiple of `VERTICES_PER_FACE`.
pub fn build_chunk_mesh(
    chunk: &Chunk,
    neighborhood: &ChunkNeighborhood,
    atlas: &TextureAtlas,
) -> Vec<Vertex> {
    let d = CHUNK_DIMENSION as usize;
    let origin = chunk.key.origin();
    let mut vertices = Vec::new();

    for z in 0..d {
        for y in 0..d {
            for x in 0..d {
                let block = chunk.block_at(x, y, z);
                if block.is_air() {
                    continue;
                }

                let adjacent = neighborhood.generate_adjacent_blocks(x, y, z);
                for side in BlockSide::all() {
                    if adjacent[side.index()] {
                        continue;
                    }
                    let Some(tile) = block.tile_index(side) else {
                        continue;
                    };
                    let face = Face::new(x as i32, y as i32, z as i32, block, side);
                    vertices.extend_from_slice(&face.triangles(origin, atlas.tile_rect(tile)));
                }
            }
        }
    }

    vertices
}
