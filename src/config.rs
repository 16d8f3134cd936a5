//! # Configuration
//!
//! Runtime settings for the streaming terrain. Every field has a default, so an
//! empty JSON object (or no file at all) yields a working configuration.
//!
//! ```json
//! { "seed": 42, "stream_radius": 8, "worker_count": 2 }
//! ```

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::engine_state::rendering::meshing::slot_allocator::TOTAL_VERT_CAP;

/// Environment variable naming a JSON config file for `run()`.
pub const CONFIG_ENV_VAR: &str = "VOXEL_TERRAIN_CONFIG";

/// Pixel dimensions of the texture atlas the block tiles are packed into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub width: u32,
    pub height: u32,
    pub tile_resolution: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            tile_resolution: 16,
        }
    }
}

/// Settings for one `Terrain` instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Noise seed; the world is a pure function of it.
    pub seed: u32,
    /// Maximum Manhattan chunk distance from the viewer worth keeping.
    pub stream_radius: i32,
    /// Size of the background generation pool.
    pub worker_count: usize,
    /// Capacity of the shared vertex buffer, in vertices.
    pub vertex_capacity: u32,
    /// Lowest chunk layer `stream_around` requests.
    pub min_chunk_y: i32,
    /// Highest chunk layer `stream_around` requests.
    pub max_chunk_y: i32,
    /// Number of chunk columns whose heightmaps are kept cached.
    pub height_cache_columns: usize,
    pub atlas: AtlasConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            stream_radius: 10,
            worker_count: 4,
            vertex_capacity: TOTAL_VERT_CAP,
            min_chunk_y: -1,
            max_chunk_y: 3,
            height_cache_columns: 1024,
            atlas: AtlasConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Parses and validates a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: TerrainConfig =
            serde_json::from_str(json).context("failed to parse terrain config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read terrain config {}", path.display()))?;
        Self::from_json_str(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Loads the file named by `VOXEL_TERRAIN_CONFIG`, or falls back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.stream_radius < 0 {
            bail!("stream_radius must be non-negative, got {}", self.stream_radius);
        }
        if self.worker_count == 0 {
            bail!("worker_count must be at least 1");
        }
        if self.min_chunk_y > self.max_chunk_y {
            bail!(
                "min_chunk_y ({}) is above max_chunk_y ({})",
                self.min_chunk_y,
                self.max_chunk_y
            );
        }
        if self.height_cache_columns == 0 {
            bail!("height_cache_columns must be at least 1");
        }
        let atlas = &self.atlas;
        if atlas.tile_resolution == 0 || atlas.width % atlas.tile_resolution != 0 {
            bail!(
                "atlas tile resolution {} does not divide atlas width {}",
                atlas.tile_resolution,
                atlas.width
            );
        }
        if atlas.height < atlas.tile_resolution {
            bail!("atlas height {} holds no tile rows", atlas.height);
        }
        Ok(())
    }
}
