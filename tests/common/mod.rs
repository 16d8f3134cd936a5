use std::thread;
use std::time::{Duration, Instant};

use voxel_terrain::{MirroredVertexBuffer, Terrain, TerrainConfig};

pub const WAIT_DEADLINE: Duration = Duration::from_secs(10);

/// Polls `condition` until it holds or the deadline passes.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_DEADLINE;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

pub fn small_config() -> TerrainConfig {
    TerrainConfig {
        seed: 7,
        stream_radius: 10,
        worker_count: 2,
        vertex_capacity: 4 * 1024 * 1024,
        ..TerrainConfig::default()
    }
}

pub fn mirrored_terrain(config: TerrainConfig) -> Terrain<MirroredVertexBuffer> {
    let buffer = MirroredVertexBuffer::with_vertex_capacity(config.vertex_capacity);
    Terrain::new(config, buffer).expect("terrain construction")
}
