use std::io::Write;

use voxel_terrain::{MirroredVertexBuffer, Terrain, TerrainConfig};

#[test]
fn partial_json_keeps_defaults_for_missing_fields() {
    let config = TerrainConfig::from_json_str(r#"{ "seed": 42, "stream_radius": 3 }"#).unwrap();
    let defaults = TerrainConfig::default();
    assert_eq!(config.seed, 42);
    assert_eq!(config.stream_radius, 3);
    assert_eq!(config.worker_count, defaults.worker_count);
    assert_eq!(config.atlas, defaults.atlas);
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(TerrainConfig::from_json_str("not json").is_err());
    assert!(TerrainConfig::from_json_str(r#"{ "worker_count": 0 }"#).is_err());
    assert!(TerrainConfig::from_json_str(r#"{ "min_chunk_y": 4, "max_chunk_y": 1 }"#).is_err());
    assert!(
        TerrainConfig::from_json_str(r#"{ "atlas": { "width": 100, "height": 100, "tile_resolution": 16 } }"#)
            .is_err()
    );
}

#[test]
fn config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("voxel-terrain-config-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, r#"{{ "seed": 9, "worker_count": 1, "max_chunk_y": 1 }}"#).unwrap();
    drop(file);

    let config = TerrainConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.seed, 9);
    assert_eq!(config.max_chunk_y, 1);

    let terrain = Terrain::new(config, MirroredVertexBuffer::with_vertex_capacity(1024)).unwrap();
    assert_eq!(terrain.config().seed, 9);
    assert_eq!(terrain.allocator().capacity(), 1024);
}

#[test]
fn missing_config_file_reports_its_path() {
    let err = TerrainConfig::load("/nonexistent/voxel-terrain.json").unwrap_err();
    assert!(format!("{:#}", err).contains("voxel-terrain.json"));
}
