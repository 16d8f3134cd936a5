//! # Engine State Module
//!
//! Everything the terrain needs to turn chunk coordinates into draw calls.
//!
//! ## Key Components
//!
//! * `voxels` - Block packing, noise, chunk generation and the resident block map
//! * `rendering` - Vertices, meshing, the vertex slot allocator and frustum culling
//! * `task_management` - The distance-ordered job queue the workers drain
//! * `buffer_state` - Vertex buffer collaborators (CPU mirror and wgpu)
//! * `camera_state` - Projection and view matrices
//! * `terrain` - The streaming core tying the above together

pub mod buffer_state;
pub mod camera_state;
pub mod rendering;
pub mod task_management;
pub mod terrain;
pub mod voxels;
