//! Draw-call seam between the terrain and the GPU.
//!
//! The terrain decides *what* to draw (frustum-visible, non-empty resident
//! chunks) and hands each chunk's vertex range to a `ChunkDrawSink`. All ranges
//! index the same shared vertex buffer, so binding happens once per frame and
//! every chunk is a single non-indexed draw.

use wgpu::{Buffer, RenderPass};

use super::ChunkMesh;

/// Receives the draw calls of one frame.
pub trait ChunkDrawSink {
    /// Binds the shared vertex buffer. Called once before any `draw_arrays`.
    fn bind(&mut self);

    /// Draws `count` vertices starting at vertex `first`.
    fn draw_arrays(&mut self, first: u32, count: u32, mesh: &ChunkMesh);
}

/// Issues draws into a wgpu render pass whose pipeline is already set.
pub struct RenderPassDrawSink<'p, 'e> {
    render_pass: &'p mut RenderPass<'e>,
    vertex_buffer: &'p Buffer,
}

impl<'p, 'e> RenderPassDrawSink<'p, 'e> {
    pub fn new(render_pass: &'p mut RenderPass<'e>, vertex_buffer: &'p Buffer) -> Self {
        Self {
            render_pass,
            vertex_buffer,
        }
    }
}

impl ChunkDrawSink for RenderPassDrawSink<'_, '_> {
    fn bind(&mut self) {
        self.render_pass
            .set_vertex_buffer(0, self.vertex_buffer.slice(..));
    }

    fn draw_arrays(&mut self, first: u32, count: u32, _mesh: &ChunkMesh) {
        self.render_pass.draw(first..first + count, 0..1);
    }
}

/// One recorded draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub first: u32,
    pub count: u32,
    pub mesh: ChunkMesh,
}

/// Records draws instead of issuing them; used headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingDrawSink {
    pub binds: usize,
    pub calls: Vec<DrawCall>,
}

impl RecordingDrawSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total vertices drawn since the last `clear`.
    pub fn vertex_total(&self) -> u64 {
        self.calls.iter().map(|c| c.count as u64).sum()
    }

    pub fn clear(&mut self) {
        self.binds = 0;
        self.calls.clear();
    }
}

impl ChunkDrawSink for RecordingDrawSink {
    fn bind(&mut self) {
        self.binds += 1;
    }

    fn draw_arrays(&mut self, first: u32, count: u32, mesh: &ChunkMesh) {
        self.calls.push(DrawCall {
            first,
            count,
            mesh: *mesh,
        });
    }
}
