//! # Texture Atlas
//!
//! The block textures live in one image: a row-major grid of square tiles. Tile
//! `t` sits at column `t % tiles_per_row`, row `t / tiles_per_row`, and block
//! faces pick their tile through `Block::tile_index`.

use crate::config::AtlasConfig;

/// UV rectangle of one tile, `(u0, v0)` top-left and `(u1, v1)` bottom-right.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// Geometry of the tile grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextureAtlas {
    width: u32,
    height: u32,
    tile_resolution: u32,
}

impl TextureAtlas {
    /// # Returns
    /// `None` if the tile resolution is zero or larger than either dimension.
    pub fn new(width: u32, height: u32, tile_resolution: u32) -> Option<Self> {
        if tile_resolution == 0 || tile_resolution > width || tile_resolution > height {
            return None;
        }
        Some(Self {
            width,
            height,
            tile_resolution,
        })
    }

    pub fn from_config(config: &AtlasConfig) -> Option<Self> {
        Self::new(config.width, config.height, config.tile_resolution)
    }

    pub fn tiles_per_row(&self) -> u32 {
        self.width / self.tile_resolution
    }

    pub fn tile_count(&self) -> u32 {
        self.tiles_per_row() * (self.height / self.tile_resolution)
    }

    /// Grid `(column, row)` of `tile`.
    pub fn tile_coordinates(&self, tile: u32) -> (u32, u32) {
        let per_row = self.tiles_per_row();
        (tile % per_row, tile / per_row)
    }

    pub fn tile_rect(&self, tile: u32) -> TileRect {
        let (column, row) = self.tile_coordinates(tile);
        let tile_u = self.tile_resolution as f32 / self.width as f32;
        let tile_v = self.tile_resolution as f32 / self.height as f32;
        let u0 = column as f32 * tile_u;
        let v0 = row as f32 * tile_v;
        TileRect {
            u0,
            v0,
            u1: u0 + tile_u,
            v1: v0 + tile_v,
        }
    }
}

impl Default for TextureAtlas {
    fn default() -> Self {
        let config = AtlasConfig::default();
        Self {
            width: config.width,
            height: config.height,
            tile_resolution: config.tile_resolution,
        }
    }
}
