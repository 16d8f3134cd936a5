use std::sync::atomic::{AtomicI32, Ordering};

use crate::engine_state::voxels::chunk::ChunkKey;

/// The viewer's current chunk, written by the main thread and read by workers.
///
/// The three axes are independent atomics. A reader racing a writer may see a
/// mix of old and new axes; the staleness check that reads it is best-effort.
#[derive(Debug, Default)]
pub struct CenterChunk {
    x: AtomicI32,
    y: AtomicI32,
    z: AtomicI32,
}

impl CenterChunk {
    pub fn new(key: ChunkKey) -> Self {
        Self {
            x: AtomicI32::new(key.x),
            y: AtomicI32::new(key.y),
            z: AtomicI32::new(key.z),
        }
    }

    pub fn store(&self, key: ChunkKey) {
        self.x.store(key.x, Ordering::Relaxed);
        self.y.store(key.y, Ordering::Relaxed);
        self.z.store(key.z, Ordering::Relaxed);
    }

    pub fn load(&self) -> ChunkKey {
        ChunkKey::new(
            self.x.load(Ordering::Relaxed),
            self.y.load(Ordering::Relaxed),
            self.z.load(Ordering::Relaxed),
        )
    }
}
