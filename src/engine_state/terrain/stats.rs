use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters of the streaming pipeline, shared by the main thread and workers.
#[derive(Debug, Default)]
pub struct StreamingStats {
    requested: AtomicU64,
    stale_dropped: AtomicU64,
    generated: AtomicU64,
    uploaded: AtomicU64,
    allocation_failures: AtomicU64,
    evicted: AtomicU64,
}

/// Point-in-time copy of `StreamingStats`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub requested: u64,
    pub stale_dropped: u64,
    pub generated: u64,
    pub uploaded: u64,
    pub allocation_failures: u64,
    pub evicted: u64,
}

impl StreamingStats {
    pub fn record_requested(&self) {
        self.requested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale(&self) {
        self.stale_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generated(&self) {
        self.generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_uploaded(&self) {
        self.uploaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_allocation_failure(&self) {
        self.allocation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evicted(&self, count: u64) {
        self.evicted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requested: self.requested.load(Ordering::Relaxed),
            stale_dropped: self.stale_dropped.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            uploaded: self.uploaded.load(Ordering::Relaxed),
            allocation_failures: self.allocation_failures.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}
