//! Vertex-range allocation inside the single shared chunk vertex buffer.
//!
//! Every resident chunk owns one contiguous run of vertices. Runs freed by
//! unloaded chunks go onto a free list and are handed out first-fit: an exact
//! fit consumes the run, a larger run is split from its front. When no free
//! run fits, allocation bumps into untouched capacity.
//!
//! Freed runs are never merged with their neighbours, so a long session slowly
//! fragments the buffer; allocations that no longer fit anywhere fail and the
//! chunk is simply not drawn.

use crate::engine_state::rendering::vertex::VERTEX_SIZE;

/// Largest vertex count whose byte size still fits a 32-bit buffer offset.
pub const TOTAL_VERT_CAP: u32 = (u32::MAX as u64 / VERTEX_SIZE) as u32;

/// A hole in the shared buffer, in vertices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FreeSlot {
    pub offset: u32,
    pub count: u32,
}

impl FreeSlot {
    pub fn end(&self) -> u32 {
        self.offset + self.count
    }
}

/// First-fit free-list allocator over `capacity` vertices.
#[derive(Debug)]
pub struct SlotAllocator {
    capacity: u32,
    used_vertices: u32,
    free_slots: Vec<FreeSlot>,
}

impl SlotAllocator {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            used_vertices: 0,
            free_slots: Vec::new(),
        }
    }

    /// Reserves `count` consecutive vertices.
    ///
    /// # Returns
    /// The first vertex of the reserved run, or `None` if neither a free run nor
    /// the remaining capacity can hold `count` vertices. Zero-length requests
    /// always fail.
    pub fn allocate_chunk_slot(&mut self, count: u32) -> Option<u32> {
        if count == 0 {
            return None;
        }

        if let Some(index) = self.free_slots.iter().position(|slot| slot.count >= count) {
            let slot = &mut self.free_slots[index];
            let offset = slot.offset;
            if slot.count == count {
                self.free_slots.remove(index);
            } else {
                slot.offset += count;
                slot.count -= count;
            }
            return Some(offset);
        }

        if self.capacity - self.used_vertices >= count {
            let offset = self.used_vertices;
            self.used_vertices += count;
            return Some(offset);
        }

        None
    }

    /// Returns a run to the free list. Zero-length runs are ignored.
    pub fn free_chunk_slot(&mut self, offset: u32, count: u32) {
        if count == 0 {
            return;
        }
        self.free_slots.push(FreeSlot { offset, count });
    }

    pub fn free_slots(&self) -> &[FreeSlot] {
        &self.free_slots
    }

    /// High-water mark of bump allocation.
    pub fn used_vertices(&self) -> u32 {
        self.used_vertices
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Vertices currently handed out (bumped minus freed).
    pub fn live_vertices(&self) -> u32 {
        self.used_vertices - self.free_slots.iter().map(|s| s.count).sum::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bumps_until_capacity() {
        let mut allocator = SlotAllocator::new(100);
        assert_eq!(allocator.allocate_chunk_slot(60), Some(0));
        assert_eq!(allocator.allocate_chunk_slot(40), Some(60));
        assert_eq!(allocator.allocate_chunk_slot(1), None);
        assert_eq!(allocator.used_vertices(), 100);
        assert_eq!(allocator.allocate_chunk_slot(0), None);
    }

    #[test]
    fn exact_fit_consumes_and_larger_fit_splits() {
        let mut allocator = SlotAllocator::new(1000);
        let a = allocator.allocate_chunk_slot(30).unwrap();
        let b = allocator.allocate_chunk_slot(50).unwrap();
        allocator.free_chunk_slot(a, 30);
        allocator.free_chunk_slot(b, 50);

        assert_eq!(allocator.allocate_chunk_slot(30), Some(a));
        assert_eq!(allocator.free_slots(), &[FreeSlot { offset: b, count: 50 }]);

        assert_eq!(allocator.allocate_chunk_slot(20), Some(b));
        assert_eq!(allocator.free_slots(), &[FreeSlot { offset: b + 20, count: 30 }]);
    }

    #[test]
    fn first_fit_not_best_fit() {
        let mut allocator = SlotAllocator::new(1000);
        let big = allocator.allocate_chunk_slot(100).unwrap();
        let small = allocator.allocate_chunk_slot(10).unwrap();
        allocator.free_chunk_slot(big, 100);
        allocator.free_chunk_slot(small, 10);
        assert_eq!(allocator.allocate_chunk_slot(10), Some(big));
    }

    #[test]
    fn adjacent_runs_are_not_merged() {
        let mut allocator = SlotAllocator::new(40);
        let a = allocator.allocate_chunk_slot(20).unwrap();
        let b = allocator.allocate_chunk_slot(20).unwrap();
        allocator.free_chunk_slot(a, 20);
        allocator.free_chunk_slot(b, 20);
        assert_eq!(allocator.free_slots().len(), 2);
        assert_eq!(allocator.allocate_chunk_slot(40), None);
        assert_eq!(allocator.live_vertices(), 0);
    }

    fn assert_disjoint(live: &[(u32, u32)]) {
        let mut sorted = live.to_vec();
        sorted.sort();
        for pair in sorted.windows(2) {
            assert!(pair[0].0 + pair[0].1 <= pair[1].0, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn randomized_alloc_free_never_overlaps() {
        let mut rng = fastrand::Rng::with_seed(0x5EED);
        let mut allocator = SlotAllocator::new(20_000);
        let mut live: Vec<(u32, u32)> = Vec::new();
        for _ in 0..5_000 {
            if live.is_empty() || rng.bool() {
                let count = rng.u32(1..600);
                if let Some(offset) = allocator.allocate_chunk_slot(count) {
                    live.push((offset, count));
                    assert!(offset + count <= allocator.capacity());
                }
            } else {
                let (offset, count) = live.swap_remove(rng.usize(..live.len()));
                allocator.free_chunk_slot(offset, count);
            }
        }
        assert_disjoint(&live);
        assert!(allocator.used_vertices() <= allocator.capacity());
    }

    proptest! {
        #[test]
        fn live_allocations_stay_disjoint(ops in prop::collection::vec((any::<bool>(), 1u32..200, any::<prop::sample::Index>()), 1..200)) {
            let mut allocator = SlotAllocator::new(4_000);
            let mut live: Vec<(u32, u32)> = Vec::new();
            for (allocate, count, pick) in ops {
                if allocate || live.is_empty() {
                    if let Some(offset) = allocator.allocate_chunk_slot(count) {
                        live.push((offset, count));
                    }
                } else {
                    let (offset, count) = live.swap_remove(pick.index(live.len()));
                    allocator.free_chunk_slot(offset, count);
                }
            }
            assert_disjoint(&live);
            for slot in allocator.free_slots() {
                for &(offset, count) in &live {
                    prop_assert!(slot.end() <= offset || offset + count <= slot.offset);
                }
            }
        }
    }
}
