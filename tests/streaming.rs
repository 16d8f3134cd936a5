mod common;

use std::collections::{HashMap, HashSet};

use common::{mirrored_terrain, small_config, wait_until};
use voxel_terrain::engine_state::rendering::meshing::{
    FreeSlot, MAX_VERTICES_PER_CHUNK, VERTICES_PER_FACE,
};
use voxel_terrain::engine_state::voxels::chunk::{MAX_CHUNK_COORD, MIN_CHUNK_COORD};
use voxel_terrain::{ChunkKey, ChunkMesh, MirroredVertexBuffer, Terrain, VertexBuffer};

#[test]
fn requested_chunk_is_generated_and_uploaded() {
    let mut terrain = mirrored_terrain(small_config());
    let key = ChunkKey::new(0, 0, 0);
    terrain.set_center_chunk(key);

    assert!(terrain.request_chunk(key, key));
    assert!(!terrain.request_chunk(key, key));

    assert!(wait_until(|| terrain.ready_len() == 1));
    assert!(!terrain.is_pending(&key));
    assert!(terrain.has_block_data(&key));
    assert!(!terrain.request_chunk(key, key));

    assert_eq!(terrain.upload_ready_chunks(), 1);
    assert_eq!(terrain.ready_len(), 0);

    let mesh = *terrain.mesh(&key).expect("resident mesh");
    let count = mesh.vertex_count as usize;
    assert_eq!(count % VERTICES_PER_FACE, 0);
    assert!(count <= MAX_VERTICES_PER_CHUNK);
    assert_eq!((mesh.world_x, mesh.world_y, mesh.world_z), (0, 0, 0));

    if count > 0 {
        let vertices = terrain
            .buffer()
            .read_vertices(mesh.vertex_offset, mesh.vertex_count)
            .expect("uploaded vertices");
        assert!(vertices
            .iter()
            .all(|v| v.position.iter().all(|&c| (0.0..=32.0).contains(&c))));
        assert!(terrain.buffer().analytics().times_written >= 1);
    }

    let stats = terrain.stats();
    assert_eq!(stats.requested, 1);
    assert_eq!(stats.generated, 1);
}

#[test]
fn far_request_is_dropped_as_stale() {
    let mut config = small_config();
    config.stream_radius = 2;
    let mut terrain = mirrored_terrain(config);
    terrain.set_center_chunk(ChunkKey::new(0, 0, 0));

    let far = ChunkKey::new(100, 0, 0);
    assert!(terrain.request_chunk(far, far));
    assert!(wait_until(|| !terrain.is_pending(&far)));

    assert_eq!(terrain.ready_len(), 0);
    assert!(!terrain.has_block_data(&far));
    assert_eq!(terrain.upload_ready_chunks(), 0);
    assert!(!terrain.is_loaded(&far));
    assert_eq!(terrain.stats().stale_dropped, 1);

    // Once it is no longer pending it may be requested again.
    assert!(terrain.request_chunk(far, far));
}

fn load_column(terrain: &mut Terrain<MirroredVertexBuffer>) -> HashMap<ChunkKey, u32> {
    let center = ChunkKey::new(0, 0, 0);
    let keys: Vec<ChunkKey> = (0..4).map(|y| ChunkKey::new(0, y, 0)).collect();
    for key in &keys {
        assert!(terrain.request_chunk(*key, center));
    }
    assert!(wait_until(|| terrain.ready_len() == keys.len()));
    assert_eq!(terrain.upload_ready_chunks(), keys.len());
    keys.iter()
        .map(|key| (*key, terrain.mesh(key).expect("resident").vertex_count))
        .collect()
}

#[test]
fn unloading_returns_slots_to_the_free_list() {
    let mut terrain = mirrored_terrain(small_config());
    terrain.set_center_chunk(ChunkKey::new(0, 0, 0));

    let first = load_column(&mut terrain);
    let live = terrain.allocator().live_vertices();
    assert_eq!(live, first.values().sum::<u32>());
    assert!(live > 0, "a column through the surface has geometry");

    let records: Vec<ChunkMesh> = first
        .keys()
        .map(|key| *terrain.mesh(key).expect("resident"))
        .filter(|mesh| !mesh.is_empty())
        .collect();
    assert_eq!(terrain.unload_chunks_not_in(&HashSet::new()), first.len());
    assert_eq!(terrain.loaded_len(), 0);
    assert_eq!(terrain.block_map_len(), 0);
    assert_eq!(terrain.free_slots().len(), records.len());
    for mesh in &records {
        let slot = FreeSlot {
            offset: mesh.vertex_offset,
            count: mesh.vertex_count,
        };
        assert!(terrain.free_slots().contains(&slot), "{:?} not freed", slot);
    }
    assert_eq!(terrain.allocator().live_vertices(), 0);
    assert_eq!(terrain.stats().evicted, first.len() as u64);

    // Regenerated chunks mesh identically whatever their neighbours' state.
    let second = load_column(&mut terrain);
    assert_eq!(first, second);
    assert_eq!(terrain.allocator().live_vertices(), live);
}

#[test]
fn unload_keeps_active_chunks() {
    let mut terrain = mirrored_terrain(small_config());
    terrain.set_center_chunk(ChunkKey::new(0, 0, 0));
    let loaded = load_column(&mut terrain);

    let keep: HashSet<ChunkKey> = [ChunkKey::new(0, 0, 0), ChunkKey::new(0, 1, 0)].into();
    let evicted = terrain.unload_chunks_not_in(&keep);
    assert_eq!(evicted, loaded.len() - keep.len());
    for key in loaded.keys() {
        assert_eq!(terrain.is_loaded(key), keep.contains(key));
        assert_eq!(terrain.has_block_data(key), keep.contains(key));
    }
}

#[test]
fn allocation_failure_is_not_fatal() {
    let mut config = small_config();
    config.vertex_capacity = 6;
    let mut terrain = mirrored_terrain(config);
    let center = ChunkKey::new(0, 0, 0);
    terrain.set_center_chunk(center);

    let keys: Vec<ChunkKey> = (-1..=3).map(|y| ChunkKey::new(0, y, 0)).collect();
    for key in &keys {
        terrain.request_chunk(*key, center);
    }
    assert!(wait_until(|| terrain.ready_len() == keys.len()));
    terrain.upload_ready_chunks();

    assert!(terrain.stats().allocation_failures >= 1);
    assert!(terrain.unplaced_len() >= 1);
    assert!(terrain.allocator().used_vertices() <= 6);
    for key in &keys {
        assert!(terrain.has_block_data(key));
        if let Some(mesh) = terrain.mesh(key) {
            assert!(mesh.vertex_count <= 6);
        }
    }

    // Out-of-range unplaced chunks release their voxel data.
    terrain.unload_chunks_not_in(&HashSet::new());
    assert_eq!(terrain.unplaced_len(), 0);
    assert_eq!(terrain.block_map_len(), 0);
    assert_eq!(terrain.loaded_len(), 0);
}

#[test]
fn stream_around_converges_to_the_active_set() {
    let mut config = small_config();
    config.stream_radius = 2;
    config.min_chunk_y = 0;
    config.max_chunk_y = 2;
    let mut terrain = mirrored_terrain(config);

    let viewer = cgmath::Point3::new(16.0, 40.0, 16.0);
    let center = ChunkKey::from_world_position(viewer);
    let active: HashSet<ChunkKey> = terrain.active_keys(center).into_iter().collect();

    terrain.stream_around(viewer);
    assert_eq!(terrain.center_chunk(), center);
    assert!(wait_until(|| terrain.ready_len() + terrain.loaded_len() == active.len()));
    terrain.stream_around(viewer);

    let loaded: HashSet<ChunkKey> = terrain.loaded_chunks().copied().collect();
    assert_eq!(loaded, active);
    assert_eq!(terrain.stats().stale_dropped, 0);

    // Moving far away evicts everything that was resident.
    let moved = cgmath::Point3::new(16.0 + 32.0 * 20.0, 40.0, 16.0);
    terrain.stream_around(moved);
    assert!(terrain.loaded_chunks().all(|key| !active.contains(key)));
}

#[test]
fn block_queries_follow_the_block_map() {
    let mut terrain = mirrored_terrain(small_config());
    let key = ChunkKey::new(0, 0, 0);
    terrain.set_center_chunk(key);
    assert_eq!(terrain.block_at(5, 5, 5), None);

    terrain.request_chunk(key, key);
    assert!(wait_until(|| terrain.ready_len() == 1));
    assert!(terrain.block_at(5, 5, 5).is_some());
    assert_eq!(terrain.block_at(-1, 5, 5), None);

    terrain.upload_ready_chunks();
    terrain.unload_chunks_not_in(&HashSet::new());
    assert_eq!(terrain.block_at(5, 5, 5), None);
}

#[test]
fn keys_outside_world_space_are_refused() {
    let mut terrain = mirrored_terrain(small_config());
    let origin = ChunkKey::new(0, 0, 0);

    assert!(!terrain.request_chunk(ChunkKey::new(i32::MIN, 0, 0), origin));
    assert!(!terrain.request_chunk(ChunkKey::new(0, i32::MAX, 0), origin));

    let far = ChunkKey::new(100_000_000, 0, 0);
    terrain.set_center_chunk(far);
    assert!(!terrain.request_chunk(far, far));
    assert!(!terrain.is_pending(&far));
    assert_eq!(terrain.stats().requested, 0);

    // The workers are still alive and serve keys at the edge of world space.
    let edge = ChunkKey::new(MAX_CHUNK_COORD, 0, MIN_CHUNK_COORD);
    terrain.set_center_chunk(edge);
    assert!(terrain.request_chunk(edge, edge));
    assert!(wait_until(|| terrain.ready_len() == 1));
    assert_eq!(terrain.upload_ready_chunks(), 1);
    assert!(terrain.is_loaded(&edge));

    terrain.set_center_chunk(origin);
    assert!(terrain.request_chunk(origin, origin));
    assert!(wait_until(|| terrain.ready_len() == 1));
}
