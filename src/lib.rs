#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Procedural, streamed voxel terrain: packed blocks, noise heightmap
//! generation, face-culled chunk meshing, a background worker pool ordered by
//! distance to the viewer, a free-list allocator over one shared vertex buffer,
//! and a frustum-culled draw.
//!
//! ## Key Modules
//!
//! * `config` - Serde-backed terrain configuration
//! * `core` - Shared-resource wrappers used across threads
//! * `engine_state` - Voxels, meshing, the job queue, buffers and the `Terrain` itself
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cgmath::{Matrix4, Point3, SquareMatrix};
//! use voxel_terrain::{MirroredVertexBuffer, RecordingDrawSink, Terrain, TerrainConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = TerrainConfig::default();
//! let buffer = MirroredVertexBuffer::with_vertex_capacity(config.vertex_capacity);
//! let mut terrain = Terrain::new(config, buffer)?;
//!
//! let mut sink = RecordingDrawSink::new();
//! terrain.stream_around(Point3::new(0.0, 80.0, 0.0));
//! terrain.draw(Matrix4::identity(), Matrix4::identity(), &mut sink);
//! # Ok(())
//! # }
//! ```

use cgmath::{Deg, Point3, Rad};
use log::info;
use web_time::{Duration, Instant};

pub mod config;
pub mod core;
pub mod engine_state;

pub use config::{AtlasConfig, TerrainConfig};
pub use engine_state::buffer_state::{MirroredVertexBuffer, VertexBuffer, WgpuVertexBuffer};
pub use engine_state::camera_state::{Camera, Projection};
pub use engine_state::rendering::meshing::{
    ChunkDrawSink, ChunkMesh, RecordingDrawSink, RenderPassDrawSink,
};
pub use engine_state::terrain::{StatsSnapshot, Terrain};
pub use engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType, Block};
pub use engine_state::voxels::chunk::ChunkKey;

pub const DEMO_FRAMES: u32 = 240;
const DEMO_STEP: f32 = 4.0;
const DEMO_FRAME_BUDGET: Duration = Duration::from_millis(16);

/// Headless fly-through: streams and draws the terrain along a jittered path,
/// logging throughput and streaming statistics.
///
/// # Errors
/// An unreadable config file or a worker pool that cannot start.
pub fn run() -> anyhow::Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = TerrainConfig::from_env()?;
    info!("Config loaded: {:?}", config);

    let buffer = MirroredVertexBuffer::with_vertex_capacity(config.vertex_capacity);
    let mut terrain = Terrain::new(config, buffer)?;

    let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0);
    let mut camera = Camera::new(Point3::new(0.0, 100.0, 0.0), Deg(0.0), Deg(-20.0));

    let started = Instant::now();
    let mut uploaded = 0;
    let mut drawn = 0;
    let mut sink = RecordingDrawSink::new();

    for frame in 0..DEMO_FRAMES {
        let frame_start = Instant::now();

        camera.rotate(Rad((fastrand::f32() - 0.5) * 0.05), Rad(0.0));
        camera.advance(DEMO_STEP);
        camera.position.y = 100.0 + (fastrand::f32() - 0.5) * 2.0;

        uploaded += terrain.stream_around(camera.position);

        sink.clear();
        drawn += terrain.draw(projection.calc_matrix(), camera.calc_matrix(), &mut sink);

        if frame % 60 == 0 {
            info!(
                "Frame {}: {} resident, {} pending, {} vertices drawn",
                frame,
                terrain.loaded_len(),
                terrain.pending_len(),
                sink.vertex_total()
            );
        }

        let elapsed = frame_start.elapsed();
        if elapsed < DEMO_FRAME_BUDGET {
            std::thread::sleep(DEMO_FRAME_BUDGET - elapsed);
        }
    }

    let seconds = started.elapsed().as_secs_f32();
    info!(
        "{} frames in {:.2}s: {} chunks uploaded, {} chunk draws",
        DEMO_FRAMES, seconds, uploaded, drawn
    );
    info!("Streaming stats: {:?}", terrain.stats());
    info!("Vertex buffer: {:?}", terrain.buffer().analytics());
    Ok(())
}
