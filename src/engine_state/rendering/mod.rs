//! Rendering side of the terrain.
//!
//! This module turns voxel data into GPU-ready geometry and decides what is drawn
//! each frame. GPU pipeline setup and shaders are left to the embedding
//! application; the terrain only needs a vertex buffer and a draw sink.

pub mod frustum;
pub mod meshing;
pub mod texture_atlas;
pub mod vertex;

pub use frustum::Frustum;
pub use texture_atlas::{TextureAtlas, TileRect};
pub use vertex::{Vertex, VERTEX_SIZE};
