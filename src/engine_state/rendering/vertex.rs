//! Vertex data structures and layouts for voxel rendering.
//!
//! Chunk meshes are plain triangle lists of this vertex type, stored back to back
//! in one shared vertex buffer and drawn without an index buffer.

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, Block};

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: [f32; 3] world space (12 bytes)
/// - Texture Coordinates: [f32; 2] atlas UV (8 bytes)
/// - Block: f32 carrying the packed block bits (4 bytes)
/// - Side: u32 face index (4 bytes)
///
/// Total size: 28 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// UV coordinates into the texture atlas
    pub tex_coords: [f32; 2],
    /// `Block::to_float` of the block this face belongs to. Bit pattern only.
    pub block: f32,
    /// `BlockSide` index of the face
    pub side: u32,
}

/// Size of one vertex in bytes, as laid out in the shared buffer.
pub const VERTEX_SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `pos` - World-space block-grid position of the corner
    /// * `tex_coords` - Atlas UV of the corner
    /// * `block` - The block the face belongs to
    /// * `side` - Which face of the block
    pub fn new(pos: Point3<i32>, tex_coords: [f32; 2], block: Block, side: BlockSide) -> Self {
        Vertex {
            position: [pos.x as f32, pos.y as f32, pos.z as f32],
            tex_coords,
            block: block.to_float(),
            side: side.index() as u32,
        }
    }

    /// The block this vertex was emitted for.
    pub fn block(&self) -> Block {
        Block::from_float(self.block)
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: tex_coords (vec2<f32>)
    /// - `location = 2`: block (f32, bitcast to u32 in the shader)
    /// - `location = 3`: side (u32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                shader_location: 3,
                format: wgpu::VertexFormat::Uint32,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: VERTEX_SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(VERTEX_SIZE, 28);
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 28);
        assert_eq!(layout.attributes.last().map(|a| a.offset), Some(24));
    }

    #[test]
    fn block_survives_the_vertex() {
        let grass = BlockType::GRASS.block();
        let vertex = Vertex::new(Point3::new(1, -2, 3), [0.0, 1.0], grass, BlockSide::TOP);
        assert_eq!(vertex.block(), grass);
        assert_eq!(vertex.side, 3);
        assert_eq!(vertex.position, [1.0, -2.0, 3.0]);
    }
}
