use cgmath::{Point3, Vector3};

use crate::engine_state::rendering::texture_atlas::TileRect;
use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::block::{block_side::BlockSide, Block};

/// Number of vertices a face contributes to a triangle list.
pub const VERTICES_PER_FACE: usize = 6;

/// Corner order of the two triangles of a face: `ll, lr, ur` and `ll, ur, ul`.
const TRIANGLE_CORNERS: [usize; VERTICES_PER_FACE] = [0, 1, 3, 0, 3, 2];

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-left,
/// upper-right) in chunk-local block coordinates, wound counter-clockwise when
/// seen from outside the block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face in chunk coordinates
    pub ll: Point3<i32>,
    /// Lower-right corner of the face in chunk coordinates
    pub lr: Point3<i32>,
    /// Upper-left corner of the face in chunk coordinates
    pub ul: Point3<i32>,
    /// Upper-right corner of the face in chunk coordinates
    pub ur: Point3<i32>,
    /// The block the face belongs to
    pub block: Block,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates a new face for a voxel at the given coordinates.
    ///
    /// # Arguments
    /// * `i`, `j`, `k` - The coordinates of the voxel in chunk space
    /// * `block` - The block being meshed
    /// * `block_side` - Which side of the block this face represents
    pub fn new(i: i32, j: i32, k: i32, block: Block, block_side: BlockSide) -> Self {
        let corners = match block_side {
            BlockSide::FRONT => [(i, j, k), (i, j, k + 1), (i, j + 1, k), (i, j + 1, k + 1)],
            BlockSide::BACK => [
                (i + 1, j, k + 1),
                (i + 1, j, k),
                (i + 1, j + 1, k + 1),
                (i + 1, j + 1, k),
            ],
            BlockSide::BOTTOM => [(i, j, k + 1), (i, j, k), (i + 1, j, k + 1), (i + 1, j, k)],
            BlockSide::TOP => [
                (i, j + 1, k),
                (i, j + 1, k + 1),
                (i + 1, j + 1, k),
                (i + 1, j + 1, k + 1),
            ],
            BlockSide::LEFT => [(i + 1, j, k), (i, j, k), (i + 1, j + 1, k), (i, j + 1, k)],
            BlockSide::RIGHT => [
                (i, j, k + 1),
                (i + 1, j, k + 1),
                (i, j + 1, k + 1),
                (i + 1, j + 1, k + 1),
            ],
        };
        let [ll, lr, ul, ur] = corners.map(|(x, y, z)| Point3::new(x, y, z));
        Face {
            ll,
            lr,
            ul,
            ur,
            block,
            block_side,
        }
    }

    /// Emits the face as two triangles in world space.
    ///
    /// # Arguments
    /// * `origin` - World block coordinate of the chunk's minimum corner
    /// * `tile` - Atlas rectangle of the face's texture
    pub fn triangles(&self, origin: Point3<i32>, tile: TileRect) -> [Vertex; VERTICES_PER_FACE] {
        let offset = Vector3::new(origin.x, origin.y, origin.z);
        let corners = [
            (self.ll, [tile.u0, tile.v1]),
            (self.lr, [tile.u1, tile.v1]),
            (self.ul, [tile.u0, tile.v0]),
            (self.ur, [tile.u1, tile.v0]),
        ];
        TRIANGLE_CORNERS.map(|corner| {
            let (position, uv) = corners[corner];
            Vertex::new(position + offset, uv, self.block, self.block_side)
        })
    }
}
