//! # Buffer State Module
//!
//! The shared chunk vertex buffer. The terrain reserves its capacity once, then
//! writes chunk meshes into sub-ranges computed from vertex offsets
//! (`offset * VERTEX_SIZE`); the buffer is never reallocated.
//!
//! Two implementations are provided:
//!
//! * `WgpuVertexBuffer`: a `wgpu::Buffer` written through `Queue::write_buffer`
//! * `MirroredVertexBuffer`: a CPU-side byte mirror, for headless runs and tests
//!
//! Both track the same usage analytics.

use std::sync::Arc;

use anyhow::bail;
use wgpu::{Buffer, Device, Queue};

use crate::engine_state::rendering::{Vertex, VERTEX_SIZE};

/// Analytics data for a vertex buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Total memory reserved for the buffer in bytes
    pub allocated_memory: u64,
    /// Highest byte written so far
    pub used_memory: u64,
    /// Number of sub-range uploads
    pub times_written: u64,
}

impl BufferAnalytics {
    fn new(allocated_memory: u64) -> Self {
        Self {
            allocated_memory,
            ..Default::default()
        }
    }

    /// Refuses writes past the reserved capacity, otherwise records them.
    fn record_write(&mut self, offset: u64, len: u64) -> anyhow::Result<()> {
        let end = match offset.checked_add(len) {
            Some(end) if end <= self.allocated_memory => end,
            _ => bail!(
                "vertex buffer write of {} bytes at offset {} exceeds capacity {}",
                len,
                offset,
                self.allocated_memory
            ),
        };
        self.used_memory = self.used_memory.max(end);
        self.times_written += 1;
        Ok(())
    }
}

/// A fixed-capacity GPU vertex buffer accepting arbitrary in-bounds uploads.
pub trait VertexBuffer {
    fn capacity_bytes(&self) -> u64;

    /// Copies `data` to byte `offset_bytes` of the buffer.
    ///
    /// # Errors
    /// When the range falls outside the reserved capacity; nothing is written.
    fn upload_sub_range(&mut self, offset_bytes: u64, data: &[u8]) -> anyhow::Result<()>;

    fn analytics(&self) -> BufferAnalytics;
}

/// CPU-only vertex buffer. Storage grows on demand up to the reserved capacity.
#[derive(Debug)]
pub struct MirroredVertexBuffer {
    mirror: Vec<u8>,
    analytics: BufferAnalytics,
}

impl MirroredVertexBuffer {
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            mirror: Vec::new(),
            analytics: BufferAnalytics::new(capacity_bytes),
        }
    }

    /// A buffer sized for `vertices` vertices.
    pub fn with_vertex_capacity(vertices: u32) -> Self {
        Self::new(vertices as u64 * VERTEX_SIZE)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mirror
    }

    /// Reads back `count` vertices starting at vertex `offset`.
    ///
    /// # Returns
    /// `None` if any of them lies beyond what has been written.
    pub fn read_vertices(&self, offset: u32, count: u32) -> Option<Vec<Vertex>> {
        let start = (offset as u64 * VERTEX_SIZE) as usize;
        let end = start + (count as u64 * VERTEX_SIZE) as usize;
        let bytes = self.mirror.get(start..end)?;
        Some(
            bytes
                .chunks_exact(VERTEX_SIZE as usize)
                .map(bytemuck::pod_read_unaligned::<Vertex>)
                .collect(),
        )
    }
}

impl VertexBuffer for MirroredVertexBuffer {
    fn capacity_bytes(&self) -> u64 {
        self.analytics.allocated_memory
    }

    fn upload_sub_range(&mut self, offset_bytes: u64, data: &[u8]) -> anyhow::Result<()> {
        self.analytics.record_write(offset_bytes, data.len() as u64)?;
        let start = offset_bytes as usize;
        let end = start + data.len();
        if self.mirror.len() < end {
            self.mirror.resize(end, 0);
        }
        self.mirror[start..end].copy_from_slice(data);
        Ok(())
    }

    fn analytics(&self) -> BufferAnalytics {
        self.analytics
    }
}

/// Vertex buffer living on the GPU.
pub struct WgpuVertexBuffer {
    buffer: Buffer,
    queue: Arc<Queue>,
    analytics: BufferAnalytics,
}

/// Label of the shared chunk vertex buffer.
pub const CHUNK_VERTEX_BUFFER_NAME: &str = "Chunk Vertex Buffer";

impl WgpuVertexBuffer {
    /// Reserves `capacity_bytes` of `VERTEX | COPY_DST` memory on `device`.
    ///
    /// # Arguments
    /// * `device` - The GPU device
    /// * `queue` - Queue the uploads are written through
    /// * `capacity_bytes` - Reserved size; must respect the device's `max_buffer_size`
    pub fn new(device: &Device, queue: Arc<Queue>, capacity_bytes: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(CHUNK_VERTEX_BUFFER_NAME),
            size: capacity_bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            queue,
            analytics: BufferAnalytics::new(capacity_bytes),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}

impl VertexBuffer for WgpuVertexBuffer {
    fn capacity_bytes(&self) -> u64 {
        self.analytics.allocated_memory
    }

    fn upload_sub_range(&mut self, offset_bytes: u64, data: &[u8]) -> anyhow::Result<()> {
        if offset_bytes % wgpu::COPY_BUFFER_ALIGNMENT != 0
            || data.len() as u64 % wgpu::COPY_BUFFER_ALIGNMENT != 0
        {
            bail!(
                "vertex buffer write at {} of {} bytes is not {}-byte aligned",
                offset_bytes,
                data.len(),
                wgpu::COPY_BUFFER_ALIGNMENT
            );
        }
        self.analytics.record_write(offset_bytes, data.len() as u64)?;
        self.queue.write_buffer(&self.buffer, offset_bytes, data);
        Ok(())
    }

    fn analytics(&self) -> BufferAnalytics {
        self.analytics
    }
}
