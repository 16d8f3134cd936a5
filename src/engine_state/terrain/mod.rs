//! # Terrain
//!
//! The streaming core. `Terrain` owns the voxel world, the worker pool that
//! generates and meshes chunks, the shared vertex buffer with its slot
//! allocator, and the per-frame culled draw.
//!
//! ## Chunk Lifecycle
//!
//! ```text
//! Unrequested --request_chunk--> Pending --worker--> Generated (block map + ready queue)
//!     ^                                                      |
//!     |                                            upload_ready_chunks
//!     +------------ unload_chunks_not_in <------------- Resident
//! ```
//!
//! ## Threading
//!
//! Workers touch only the job queue, the block map and the ready queue. The
//! vertex buffer, allocator and mesh records belong to the thread that owns the
//! `Terrain`; uploads and draws therefore never run concurrently.

mod center_chunk;
mod stats;
mod worker;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::Context;
use cgmath::{Matrix4, Point3};
use log::{debug, info, warn};

pub use stats::{StatsSnapshot, StreamingStats};

use center_chunk::CenterChunk;
use worker::{spawn_workers, ReadyChunk, SharedState};

use crate::config::TerrainConfig;
use crate::core::{lock_recovering, MtResource};
use crate::engine_state::buffer_state::VertexBuffer;
use crate::engine_state::rendering::meshing::{ChunkDrawSink, ChunkMesh, FreeSlot, SlotAllocator};
use crate::engine_state::rendering::{Frustum, TextureAtlas, VERTEX_SIZE};
use crate::engine_state::task_management::ChunkJobQueue;
use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::chunk::ChunkKey;
use crate::engine_state::voxels::height_cache::HeightCache;
use crate::engine_state::voxels::noise_system::NoiseSystem;
use crate::engine_state::voxels::world::BlockMap;

/// Streaming voxel terrain drawing into a vertex buffer of type `B`.
pub struct Terrain<B: VertexBuffer> {
    config: TerrainConfig,
    shared: Arc<SharedState>,
    workers: Vec<JoinHandle<()>>,
    buffer: B,
    allocator: SlotAllocator,
    mesh_map: HashMap<ChunkKey, ChunkMesh>,
    /// Generated chunks whose upload failed; never drawn, evicted once out of range.
    unplaced: HashSet<ChunkKey>,
}

impl<B: VertexBuffer> Terrain<B> {
    /// Validates `config`, reserves the vertex range of `buffer` and starts the workers.
    ///
    /// # Errors
    /// Invalid configuration or a worker thread that cannot be spawned.
    pub fn new(config: TerrainConfig, buffer: B) -> anyhow::Result<Self> {
        config.validate()?;
        let atlas = TextureAtlas::from_config(&config.atlas).context("invalid texture atlas")?;

        let buffer_vertices = (buffer.capacity_bytes() / VERTEX_SIZE).min(u32::MAX as u64) as u32;
        let vertex_capacity = config.vertex_capacity.min(buffer_vertices);
        if vertex_capacity < config.vertex_capacity {
            warn!(
                "Vertex capacity clamped from {} to {} to fit the vertex buffer",
                config.vertex_capacity, vertex_capacity
            );
        }

        let shared = Arc::new(SharedState {
            queue: ChunkJobQueue::new(),
            ready: Mutex::new(Vec::new()),
            block_map: MtResource::new(BlockMap::new()),
            center: CenterChunk::new(ChunkKey::default()),
            heights: HeightCache::new(NoiseSystem::new(config.seed), config.height_cache_columns),
            atlas,
            stream_radius: config.stream_radius,
            stats: StreamingStats::default(),
        });
        let workers = spawn_workers(config.worker_count, &shared)?;

        info!(
            "Terrain ready: seed {}, radius {}, {} vertices of buffer space",
            config.seed, config.stream_radius, vertex_capacity
        );

        Ok(Self {
            config,
            shared,
            workers,
            buffer,
            allocator: SlotAllocator::new(vertex_capacity),
            mesh_map: HashMap::new(),
            unplaced: HashSet::new(),
        })
    }

    /// Queues `key` for generation, prioritised by its distance to `center`.
    ///
    /// # Returns
    /// `false` (and does nothing) if the chunk is already pending or generated,
    /// or lies outside i32 world space.
    pub fn request_chunk(&self, key: ChunkKey, center: ChunkKey) -> bool {
        if !key.is_representable() {
            warn!("Refusing chunk {:?}: outside world coordinate range", key);
            return false;
        }
        // Workers insert into the block map before clearing the pending mark, so
        // checking pending first cannot miss a chunk that is between the two.
        if self.shared.queue.is_pending(&key) {
            return false;
        }
        if self.shared.block_map.get().contains(&key) {
            return false;
        }

        let queued = self.shared.queue.push(key, key.manhattan_distance(&center));
        if queued {
            self.shared.stats.record_requested();
        }
        queued
    }

    /// Tells the workers where the viewer is; jobs further than the stream
    /// radius from it are dropped when dequeued.
    pub fn set_center_chunk(&self, center: ChunkKey) {
        self.shared.center.store(center);
    }

    pub fn center_chunk(&self) -> ChunkKey {
        self.shared.center.load()
    }

    /// Moves every finished chunk into the vertex buffer and makes it resident.
    ///
    /// Never blocks on the workers. A chunk that does not fit is logged and left
    /// undrawn; its voxel data stays in the block map.
    ///
    /// # Returns
    /// The number of chunks made resident.
    pub fn upload_ready_chunks(&mut self) -> usize {
        let ready = std::mem::take(&mut *lock_recovering(&self.shared.ready));
        let mut uploaded = 0;

        for ReadyChunk { key, vertices } in ready {
            if self.mesh_map.contains_key(&key) {
                continue;
            }

            let count = vertices.len() as u32;
            if count == 0 {
                self.mesh_map.insert(key, ChunkMesh::new(key, 0, 0));
                self.shared.stats.record_uploaded();
                uploaded += 1;
                continue;
            }

            let Some(offset) = self.allocator.allocate_chunk_slot(count) else {
                warn!("No vertex buffer space for chunk {:?} ({} vertices)", key, count);
                self.shared.stats.record_allocation_failure();
                self.unplaced.insert(key);
                continue;
            };

            let bytes: &[u8] = bytemuck::cast_slice(&vertices);
            if let Err(err) = self.buffer.upload_sub_range(offset as u64 * VERTEX_SIZE, bytes) {
                warn!("Upload of chunk {:?} failed: {:#}", key, err);
                self.allocator.free_chunk_slot(offset, count);
                self.shared.stats.record_allocation_failure();
                self.unplaced.insert(key);
                continue;
            }

            debug!("Uploaded chunk {:?}: {} vertices at {}", key, count, offset);
            self.mesh_map.insert(key, ChunkMesh::new(key, offset, count));
            self.shared.stats.record_uploaded();
            uploaded += 1;
        }

        uploaded
    }

    /// Evicts every resident chunk whose key is not in `active`: its vertex range
    /// goes back to the free list and its voxel data leaves the block map.
    ///
    /// # Returns
    /// The number of chunks evicted.
    pub fn unload_chunks_not_in(&mut self, active: &HashSet<ChunkKey>) -> usize {
        let evicted: Vec<ChunkKey> = self
            .mesh_map
            .keys()
            .filter(|key| !active.contains(key))
            .copied()
            .collect();

        let mut block_map = self.shared.block_map.get_mut();
        for key in &evicted {
            if let Some(mesh) = self.mesh_map.remove(key) {
                self.allocator.free_chunk_slot(mesh.vertex_offset, mesh.vertex_count);
            }
            block_map.remove(key);
        }

        let before = self.unplaced.len();
        self.unplaced.retain(|key| {
            if active.contains(key) {
                return true;
            }
            block_map.remove(key);
            false
        });
        drop(block_map);

        let total = evicted.len() + (before - self.unplaced.len());
        if total > 0 {
            debug!("Evicted {} chunks", total);
            self.shared.stats.record_evicted(total as u64);
        }
        total
    }

    /// Draws every resident, non-empty chunk whose bounds intersect the view frustum.
    ///
    /// # Returns
    /// The number of chunks drawn.
    pub fn draw<S: ChunkDrawSink>(
        &self,
        projection: Matrix4<f32>,
        view: Matrix4<f32>,
        sink: &mut S,
    ) -> usize {
        let frustum = Frustum::from_matrix(projection * view);
        sink.bind();

        let mut drawn = 0;
        for mesh in self.mesh_map.values() {
            if mesh.is_empty() {
                continue;
            }
            let (min, max) = mesh.bounds();
            if frustum.intersects_aabb(min, max) {
                sink.draw_arrays(mesh.vertex_offset, mesh.vertex_count, mesh);
                drawn += 1;
            }
        }
        drawn
    }

    /// Keys within the stream radius of `center` and inside the vertical band,
    /// nearest first.
    pub fn active_keys(&self, center: ChunkKey) -> Vec<ChunkKey> {
        let radius = self.config.stream_radius;
        let mut keys = Vec::new();
        for y in self.config.min_chunk_y..=self.config.max_chunk_y {
            let dy = (y - center.y).abs();
            if dy > radius {
                continue;
            }
            let rest = radius - dy;
            for dx in -rest..=rest {
                let rest_z = rest - dx.abs();
                for dz in -rest_z..=rest_z {
                    keys.push(ChunkKey::new(
                        center.x.saturating_add(dx),
                        y,
                        center.z.saturating_add(dz),
                    ));
                }
            }
        }
        keys.sort_by_key(|key| key.manhattan_distance(&center));
        keys
    }

    /// One streaming step around a viewer: recentre, request everything in
    /// range, evict everything outside, then upload what the workers finished.
    ///
    /// # Returns
    /// The number of chunks made resident by this step.
    pub fn stream_around(&mut self, viewer: Point3<f32>) -> usize {
        let center = ChunkKey::from_world_position(viewer);
        self.set_center_chunk(center);

        let keys = self.active_keys(center);
        for key in &keys {
            self.request_chunk(*key, center);
        }

        let active: HashSet<ChunkKey> = keys.into_iter().collect();
        self.unload_chunks_not_in(&active);
        self.upload_ready_chunks()
    }

    /// The generated block at world coordinate `(gx, gy, gz)`, if its chunk is in memory.
    pub fn block_at(&self, gx: i32, gy: i32, gz: i32) -> Option<Block> {
        self.shared.block_map.get().block_at(gx, gy, gz)
    }

    pub fn is_pending(&self, key: &ChunkKey) -> bool {
        self.shared.queue.is_pending(key)
    }

    pub fn pending_len(&self) -> usize {
        self.shared.queue.pending_len()
    }

    pub fn ready_len(&self) -> usize {
        lock_recovering(&self.shared.ready).len()
    }

    /// Keys currently waiting in the ready queue.
    pub fn ready_keys(&self) -> Vec<ChunkKey> {
        lock_recovering(&self.shared.ready).iter().map(|r| r.key).collect()
    }

    pub fn has_block_data(&self, key: &ChunkKey) -> bool {
        self.shared.block_map.get().contains(key)
    }

    pub fn block_map_len(&self) -> usize {
        self.shared.block_map.get().len()
    }

    pub fn mesh(&self, key: &ChunkKey) -> Option<&ChunkMesh> {
        self.mesh_map.get(key)
    }

    pub fn is_loaded(&self, key: &ChunkKey) -> bool {
        self.mesh_map.contains_key(key)
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = &ChunkKey> {
        self.mesh_map.keys()
    }

    pub fn loaded_len(&self) -> usize {
        self.mesh_map.len()
    }

    /// Generated chunks that could not be placed in the vertex buffer.
    pub fn unplaced_len(&self) -> usize {
        self.unplaced.len()
    }

    pub fn free_slots(&self) -> &[FreeSlot] {
        self.allocator.free_slots()
    }

    pub fn allocator(&self) -> &SlotAllocator {
        &self.allocator
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }
}

impl<B: VertexBuffer> Drop for Terrain<B> {
    fn drop(&mut self) {
        self.shared.queue.shutdown();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("A chunk worker panicked");
            }
        }
        info!("Terrain workers stopped");
    }
}
