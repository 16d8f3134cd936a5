//! # Block Module
//!
//! This module provides the packed 32-bit voxel representation used by the
//! voxel engine, along with block type definitions, block face handling and the
//! texture protocol that maps faces onto atlas tiles.
//!
//! ## Bit Layout
//!
//! ```text
//! id    (16 bits): [15..12] texture protocol | [11..0] block type id (0 = air)
//! flags (16 bits): [15..12] light level | [11..6] visible-face mask
//!                  [5] transparent      | [4..0] reserved
//! ```
//!
//! A block travels to the GPU as a single `f32` vertex attribute component whose
//! bit pattern is `(id << 16) | flags`.

use block_side::BlockSide;
use texture_protocol::{resolve_offset, TextureProtocol};

pub mod block_side;
pub mod block_type;
pub mod texture_protocol;

/// Mask for the 12-bit block type id.
pub const ID_MASK: u16 = 0x0FFF;
/// Shift of the 4-bit texture protocol inside `id`.
pub const PROTOCOL_SHIFT: u16 = 12;
/// Shift of the 4-bit light level inside `flags`.
pub const LIGHT_SHIFT: u16 = 12;
/// Shift of the 6-bit face mask inside `flags`.
pub const FACE_MASK_SHIFT: u16 = 6;
/// All six faces visible.
pub const ALL_FACES: u8 = 0b11_1111;
/// Transparency bit inside `flags`.
pub const TRANSPARENT_BIT: u16 = 1 << 5;
/// Brightest light level.
pub const MAX_LIGHT: u8 = 15;

/// Represents a single voxel block in the world.
///
/// Blocks are plain values: two blocks are the same iff their bit patterns are
/// equal.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the two 16-bit halves in a fixed order so the
/// type can be cast straight into GPU-visible memory.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable, Debug, Default)]
pub struct Block {
    /// Block type id (low 12 bits) and texture protocol (high 4 bits).
    pub id: u16,
    /// Light level, visible-face mask and transparency.
    pub flags: u16,
}

impl Block {
    /// The air sentinel: id 0, no flags.
    pub const AIR: Block = Block { id: 0, flags: 0 };

    /// Packs a 12-bit block id with a texture protocol.
    ///
    /// Freshly made blocks are fully lit, have every face marked visible and are
    /// opaque.
    pub fn make(raw_id: u16, protocol: TextureProtocol) -> Self {
        Block {
            id: (raw_id & ID_MASK) | ((protocol.bits() as u16) << PROTOCOL_SHIFT),
            flags: ((MAX_LIGHT as u16) << LIGHT_SHIFT) | ((ALL_FACES as u16) << FACE_MASK_SHIFT),
        }
    }

    /// The 12-bit block type id.
    pub fn raw_id(&self) -> u16 {
        self.id & ID_MASK
    }

    /// The texture protocol tag, decoded.
    pub fn protocol(&self) -> TextureProtocol {
        TextureProtocol::from_bits((self.id >> PROTOCOL_SHIFT) as u8)
    }

    /// Whether this is an air block.
    pub fn is_air(&self) -> bool {
        self.raw_id() == 0
    }

    pub fn light(&self) -> u8 {
        (self.flags >> LIGHT_SHIFT) as u8
    }

    pub fn face_mask(&self) -> u8 {
        ((self.flags >> FACE_MASK_SHIFT) as u8) & ALL_FACES
    }

    pub fn is_face_visible(&self, side: BlockSide) -> bool {
        self.face_mask() & (1 << side.index()) != 0
    }

    pub fn is_transparent(&self) -> bool {
        self.flags & TRANSPARENT_BIT != 0
    }

    /// Returns a copy with the light level replaced (clamped to 0..=15).
    pub fn with_light(mut self, light: u8) -> Self {
        let light = light.min(MAX_LIGHT) as u16;
        self.flags = (self.flags & !(0xF << LIGHT_SHIFT)) | (light << LIGHT_SHIFT);
        self
    }

    /// Returns a copy with the visible-face mask replaced.
    pub fn with_face_mask(mut self, mask: u8) -> Self {
        let mask = (mask & ALL_FACES) as u16;
        self.flags = (self.flags & !((ALL_FACES as u16) << FACE_MASK_SHIFT)) | (mask << FACE_MASK_SHIFT);
        self
    }

    /// Returns a copy with the transparency flag replaced.
    pub fn with_transparency(mut self, transparent: bool) -> Self {
        if transparent {
            self.flags |= TRANSPARENT_BIT;
        } else {
            self.flags &= !TRANSPARENT_BIT;
        }
        self
    }

    /// The block as one 32-bit word: `(id << 16) | flags`.
    pub fn to_bits(self) -> u32 {
        ((self.id as u32) << 16) | self.flags as u32
    }

    pub fn from_bits(bits: u32) -> Self {
        Block {
            id: (bits >> 16) as u16,
            flags: bits as u16,
        }
    }

    /// Bit-casts the block into an `f32` for transport as a vertex attribute.
    ///
    /// This is a reinterpretation, not a numeric conversion: the float may be a
    /// NaN or denormal and must never be used in arithmetic.
    pub fn to_float(self) -> f32 {
        f32::from_bits(self.to_bits())
    }

    pub fn from_float(value: f32) -> Self {
        Self::from_bits(value.to_bits())
    }

    /// Tile offset (relative to this block type's first tile) for `side`.
    pub fn texture_offset(&self, side: BlockSide) -> u32 {
        resolve_offset(self.protocol(), side)
    }

    /// Atlas tile index for `side`: `block_id - 1 + offset`.
    ///
    /// Air has no tile; `None` is returned for it.
    pub fn tile_index(&self, side: BlockSide) -> Option<u32> {
        if self.is_air() {
            return None;
        }
        Some(self.raw_id() as u32 - 1 + self.texture_offset(side))
    }
}

#[cfg(test)]
mod tests {
    use super::block_type::BlockType;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn make_packs_id_and_protocol() {
        let block = Block::make(0x123, TextureProtocol::THREE_SIDES);
        assert_eq!(block.raw_id(), 0x123);
        assert_eq!(block.protocol(), TextureProtocol::THREE_SIDES);
        assert_eq!(block.id >> 12, 3);
        assert_eq!(block.light(), MAX_LIGHT);
        assert_eq!(block.face_mask(), ALL_FACES);
        assert!(!block.is_transparent());
    }

    #[test]
    fn make_truncates_ids_wider_than_twelve_bits() {
        let block = Block::make(0xF001, TextureProtocol::ONE);
        assert_eq!(block.raw_id(), 0x001);
        assert_eq!(block.protocol(), TextureProtocol::ONE);
    }

    #[test]
    fn flag_setters_do_not_bleed_into_each_other() {
        let block = Block::make(7, TextureProtocol::SIX)
            .with_light(3)
            .with_face_mask(0b10_0101)
            .with_transparency(true);
        assert_eq!(block.light(), 3);
        assert_eq!(block.face_mask(), 0b10_0101);
        assert!(block.is_transparent());
        assert!(block.is_face_visible(BlockSide::FRONT));
        assert!(!block.is_face_visible(BlockSide::BACK));
        assert_eq!(block.flags & 0x1F, 0, "reserved bits must stay clear");

        let cleared = block.with_transparency(false).with_light(200);
        assert!(!cleared.is_transparent());
        assert_eq!(cleared.light(), MAX_LIGHT);
        assert_eq!(cleared.face_mask(), 0b10_0101);
    }

    #[test]
    fn grass_tiles_follow_three_sides_layout() {
        let grass = BlockType::GRASS.block();
        assert_eq!(grass.tile_index(BlockSide::TOP), Some(0));
        assert_eq!(grass.tile_index(BlockSide::FRONT), Some(1));
        assert_eq!(grass.tile_index(BlockSide::RIGHT), Some(1));
        assert_eq!(grass.tile_index(BlockSide::BOTTOM), Some(2));
        assert_eq!(Block::AIR.tile_index(BlockSide::TOP), None);
    }

    #[test]
    fn air_round_trips_through_float() {
        assert_eq!(Block::from_float(Block::AIR.to_float()), Block::AIR);
    }

    proptest! {
        #[test]
        fn float_round_trip_is_lossless(id in any::<u16>(), flags in any::<u16>()) {
            // NaN payloads included: from_bits/to_bits never canonicalise.
            let block = Block { id, flags };
            prop_assert_eq!(Block::from_float(block.to_float()), block);
        }
    }
}
