//! # Block Type Module
//!
//! This module defines the block types generated by the terrain rule. Each
//! variant's discriminant is its 12-bit block id; ids are spaced so that every
//! type owns as many consecutive atlas tiles as its texture protocol needs.

use num_derive::FromPrimitive;

use super::{texture_protocol::TextureProtocol, Block};

/// Enumerates all block types in the voxel world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// The empty sentinel. Never meshed.
    AIR = 0,

    /// Grass: green top, grass-on-dirt sides, dirt bottom (tiles 0..3).
    GRASS = 1,

    /// Plain dirt (tile 3).
    DIRT = 4,

    /// Cobblestone, everything deeper than the dirt layer (tile 4).
    COBBLESTONE = 5,

    /// Water filling air up to sea level (tile 5). Transparent.
    WATER = 6,
}

impl BlockType {
    /// Converts a 12-bit block id back into a `BlockType`.
    ///
    /// # Returns
    /// `None` for ids no block type uses.
    pub fn from_raw_id(raw_id: u16) -> Option<Self> {
        num_traits::FromPrimitive::from_u16(raw_id)
    }

    /// The texture protocol this type's faces are resolved with.
    pub fn protocol(self) -> TextureProtocol {
        match self {
            BlockType::GRASS => TextureProtocol::THREE_SIDES,
            _ => TextureProtocol::ONE,
        }
    }

    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::AIR | BlockType::WATER)
    }

    /// The packed block for this type as produced by world generation.
    pub fn block(self) -> Block {
        if self == BlockType::AIR {
            return Block::AIR;
        }
        Block::make(self as u16, self.protocol()).with_transparency(self.is_transparent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BlockType; 5] = [
        BlockType::AIR,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::COBBLESTONE,
        BlockType::WATER,
    ];

    #[test]
    fn raw_ids_map_back_to_types() {
        for block_type in ALL {
            assert_eq!(BlockType::from_raw_id(block_type.block().raw_id()), Some(block_type));
        }
        assert_eq!(BlockType::from_raw_id(2), None);
    }

    #[test]
    fn tile_ranges_do_not_overlap() {
        let mut owned = Vec::new();
        for block_type in ALL.into_iter().skip(1) {
            let first = block_type as u32 - 1;
            for tile in first..first + block_type.protocol().tile_count() {
                assert!(!owned.contains(&tile), "tile {} claimed twice", tile);
                owned.push(tile);
            }
        }
    }

    #[test]
    fn only_water_is_flagged_transparent() {
        assert!(BlockType::WATER.block().is_transparent());
        assert!(!BlockType::GRASS.block().is_transparent());
        assert!(BlockType::AIR.block().is_air());
    }
}
