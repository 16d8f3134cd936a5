//! # Chunk Jobs
//!
//! A job is one request to generate and mesh a chunk. Jobs are ordered for a
//! max-heap so that the *nearest* chunk (lowest priority value) pops first and
//! requests of equal distance pop in submission order.

use std::cmp::Ordering;

use crate::engine_state::voxels::chunk::ChunkKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkJob {
    pub key: ChunkKey,
    /// Manhattan distance to the viewer chunk at request time.
    pub priority: i32,
    /// Submission order, for FIFO among equal priorities.
    pub sequence: u64,
}

impl ChunkJob {
    /// Whether the job fell out of range of `center` while it waited.
    ///
    /// Evaluated right after dequeue, before any generation work.
    pub fn is_stale(&self, center: ChunkKey, stream_radius: i32) -> bool {
        self.key.manhattan_distance(&center) > stream_radius
    }
}

impl Ord for ChunkJob {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for ChunkJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BinaryHeap;

    use super::*;

    fn job(x: i32, priority: i32, sequence: u64) -> ChunkJob {
        ChunkJob {
            key: ChunkKey::new(x, 0, 0),
            priority,
            sequence,
        }
    }

    #[test]
    fn nearest_first_then_fifo() {
        let mut heap = BinaryHeap::new();
        heap.push(job(0, 5, 0));
        heap.push(job(1, 1, 1));
        heap.push(job(2, 3, 2));
        heap.push(job(3, 1, 3));

        let order: Vec<i32> = std::iter::from_fn(|| heap.pop()).map(|j| j.key.x).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn staleness_uses_the_current_center() {
        let far = job(100, 100, 0);
        assert!(far.is_stale(ChunkKey::new(0, 0, 0), 10));
        assert!(!far.is_stale(ChunkKey::new(95, 0, 0), 10));
        assert!(!job(10, 10, 0).is_stale(ChunkKey::new(0, 0, 0), 10));
    }
}
