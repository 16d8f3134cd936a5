//! # Texture Protocol Module
//!
//! A block type declares how many distinct atlas tiles it uses across its six
//! faces. The protocol tag lives in the high nibble of the packed block id and
//! is resolved per face into a tile offset relative to the block's first tile.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::block_side::BlockSide;

/// How a block type spreads its textures over its six faces.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum TextureProtocol {
    /// One texture on every face.
    ONE = 0,
    /// Top face, then one texture for the other five.
    TWO = 1,
    /// Top face, a distinct front face, one texture for the rest.
    THREE_FRONT = 2,
    /// Top face, the four sides, and the bottom face.
    THREE_SIDES = 3,
    /// Every face textured independently.
    SIX = 4,
}

impl TextureProtocol {
    /// Decodes a 4-bit protocol tag. Unknown tags resolve as `SIX`.
    pub fn from_bits(bits: u8) -> Self {
        TextureProtocol::from_u8(bits & 0xF).unwrap_or(TextureProtocol::SIX)
    }

    /// The 4-bit tag stored in the packed block id.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Number of consecutive atlas tiles a block type with this protocol owns.
    pub fn tile_count(self) -> u32 {
        match self {
            TextureProtocol::ONE => 1,
            TextureProtocol::TWO => 2,
            TextureProtocol::THREE_FRONT | TextureProtocol::THREE_SIDES => 3,
            TextureProtocol::SIX => 6,
        }
    }
}

/// Maps a face to its tile offset under `protocol`.
///
/// The result indexes the atlas directly (`tile = block_id - 1 + offset`), so it
/// must stay bit-exact with the atlas packing order.
pub fn resolve_offset(protocol: TextureProtocol, side: BlockSide) -> u32 {
    match protocol {
        TextureProtocol::ONE => 0,
        TextureProtocol::TWO => match side {
            BlockSide::TOP => 0,
            _ => 1,
        },
        TextureProtocol::THREE_FRONT => match side {
            BlockSide::TOP => 0,
            BlockSide::FRONT => 1,
            _ => 2,
        },
        TextureProtocol::THREE_SIDES => match side {
            BlockSide::TOP => 0,
            BlockSide::BOTTOM => 2,
            _ => 1,
        },
        TextureProtocol::SIX => side.index() as u32,
    }
}
