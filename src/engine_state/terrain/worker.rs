//! Background chunk workers.
//!
//! Each worker loops: pop the nearest pending job, drop it if the viewer moved
//! out of range, otherwise generate the chunk, mesh it against its six
//! neighbours, move the voxel data into the block map and hand the vertices to
//! the main thread through the ready queue.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::Context;
use log::{debug, info, warn};

use super::center_chunk::CenterChunk;
use super::stats::StreamingStats;
use crate::core::{lock_recovering, MtResource};
use crate::engine_state::rendering::meshing::build_chunk_mesh;
use crate::engine_state::rendering::{TextureAtlas, Vertex};
use crate::engine_state::task_management::ChunkJobQueue;
use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::chunk::chunk_creation::generate_chunk_cached;
use crate::engine_state::voxels::chunk::chunk_neighborhood::{BorderLayer, ChunkNeighborhood};
use crate::engine_state::voxels::chunk::{Chunk, ChunkKey};
use crate::engine_state::voxels::height_cache::HeightCache;
use crate::engine_state::voxels::world::BlockMap;

/// A meshed chunk waiting for upload on the main thread.
pub struct ReadyChunk {
    pub key: ChunkKey,
    pub vertices: Vec<Vertex>,
}

/// State shared between the `Terrain` owner and its workers.
pub struct SharedState {
    pub queue: ChunkJobQueue,
    pub ready: Mutex<Vec<ReadyChunk>>,
    pub block_map: MtResource<BlockMap>,
    pub center: CenterChunk,
    pub heights: HeightCache,
    pub atlas: TextureAtlas,
    pub stream_radius: i32,
    pub stats: StreamingStats,
}

/// Starts `count` workers on `shared`.
pub fn spawn_workers(count: usize, shared: &Arc<SharedState>) -> anyhow::Result<Vec<JoinHandle<()>>> {
    let mut workers = Vec::with_capacity(count);
    for index in 0..count {
        let worker_state = shared.clone();
        let worker = thread::Builder::new()
            .name(format!("chunk-worker-{}", index))
            .spawn(move || worker_loop(&worker_state))
            .with_context(|| format!("failed to spawn chunk worker {}", index));

        match worker {
            Ok(worker) => workers.push(worker),
            Err(err) => {
                // Release the workers already started before reporting.
                shared.queue.shutdown();
                for worker in workers {
                    let _ = worker.join();
                }
                return Err(err);
            }
        }
    }
    info!("Started {} chunk workers", count);
    Ok(workers)
}

fn worker_loop(shared: &SharedState) {
    while let Some(job) = shared.queue.pop_blocking() {
        if !job.key.is_representable() {
            warn!("Dropping chunk {:?}: outside world coordinate range", job.key);
            shared.queue.complete(&job.key);
            continue;
        }

        let center = shared.center.load();
        if job.is_stale(center, shared.stream_radius) {
            debug!(
                "Dropping stale chunk {:?} (distance {} from {:?})",
                job.key,
                job.key.manhattan_distance(&center),
                center
            );
            shared.stats.record_stale();
            shared.queue.complete(&job.key);
            continue;
        }

        let (chunk, vertices) = build_chunk(job.key, shared);

        shared.block_map.get_mut().insert(chunk);
        shared.queue.complete(&job.key);
        lock_recovering(&shared.ready).push(ReadyChunk {
            key: job.key,
            vertices,
        });
        shared.stats.record_generated();
    }
}

/// Generates chunk `key` and meshes it against its neighbours.
///
/// Resident neighbours contribute their touching layer; missing ones are
/// synthesised from the generation rule and discarded after the build.
pub fn build_chunk(key: ChunkKey, shared: &SharedState) -> (Chunk, Vec<Vertex>) {
    let chunk = generate_chunk_cached(key, &shared.heights);

    let resident = {
        let block_map = shared.block_map.get();
        BlockSide::all().map(|side| block_map.neighbor_layer(key, side))
    };

    let mut neighborhood = ChunkNeighborhood::new(&chunk);
    for (side, layer) in BlockSide::all().into_iter().zip(resident) {
        let layer = layer.unwrap_or_else(|| {
            let neighbor = key.offset(side);
            let heights = shared.heights.column(neighbor.x, neighbor.z);
            BorderLayer::synthesize(neighbor, side.opposite(), &heights)
        });
        neighborhood.set_neighbor_layer(side, &layer);
    }

    let vertices = build_chunk_mesh(&chunk, &neighborhood, &shared.atlas);
    (chunk, vertices)
}
