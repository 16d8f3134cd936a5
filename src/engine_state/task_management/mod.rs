//! # Task Management System
//!
//! The priority queue feeding the chunk worker pool.
//!
//! ## Architecture Overview
//!
//! - `ChunkJob`: one generate-and-mesh request with its distance priority
//! - `ChunkJobQueue`: a binary heap of jobs plus the set of keys still pending,
//!   both behind one mutex, and a condition variable the workers sleep on
//!
//! ## Job Lifecycle
//! 1. The main thread `push`es a job; one sleeping worker is woken
//! 2. A worker `pop_blocking`s the nearest job and releases the lock before
//!    doing any work, so workers never serialize on generation
//! 3. When the job is finished (or dropped as stale) the worker calls
//!    `complete`, clearing the pending mark
//! 4. `shutdown` wakes every worker; `pop_blocking` then returns `None`
//!
//! A key stays pending from `push` until `complete`, so it can never be queued twice.

pub mod task;

use std::collections::{BinaryHeap, HashSet};
use std::sync::{Condvar, Mutex, PoisonError};

use log::trace;
use task::ChunkJob;

use crate::core::lock_recovering;
use crate::engine_state::voxels::chunk::ChunkKey;

#[derive(Default)]
struct QueueState {
    queue: BinaryHeap<ChunkJob>,
    pending: HashSet<ChunkKey>,
    next_sequence: u64,
    shutdown: bool,
}

/// Thread-safe min-distance job queue with pending-key deduplication.
#[derive(Default)]
pub struct ChunkJobQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl ChunkJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `key` with `priority` unless it is already pending.
    ///
    /// # Returns
    /// `true` if a job was queued. Always `false` after shutdown.
    pub fn push(&self, key: ChunkKey, priority: i32) -> bool {
        let mut state = lock_recovering(&self.state);
        if state.shutdown || !state.pending.insert(key) {
            return false;
        }
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.queue.push(ChunkJob {
            key,
            priority,
            sequence,
        });
        trace!("Queued chunk {:?} at distance {}", key, priority);
        drop(state);

        self.available.notify_one();
        true
    }

    /// Blocks until a job is available and pops the nearest one.
    ///
    /// # Returns
    /// `None` once the queue has been shut down.
    pub fn pop_blocking(&self) -> Option<ChunkJob> {
        let mut state = lock_recovering(&self.state);
        loop {
            if state.shutdown {
                return None;
            }
            if let Some(job) = state.queue.pop() {
                return Some(job);
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Pops the nearest job without blocking.
    pub fn try_pop(&self) -> Option<ChunkJob> {
        let mut state = lock_recovering(&self.state);
        if state.shutdown {
            return None;
        }
        state.queue.pop()
    }

    /// Clears the pending mark of a popped job.
    pub fn complete(&self, key: &ChunkKey) {
        lock_recovering(&self.state).pending.remove(key);
    }

    pub fn is_pending(&self, key: &ChunkKey) -> bool {
        lock_recovering(&self.state).pending.contains(key)
    }

    /// Keys queued or being worked on.
    pub fn pending_len(&self) -> usize {
        lock_recovering(&self.state).pending.len()
    }

    /// Jobs not yet picked up by a worker.
    pub fn queued_len(&self) -> usize {
        lock_recovering(&self.state).queue.len()
    }

    /// Stops the queue and wakes every waiting worker.
    pub fn shutdown(&self) {
        lock_recovering(&self.state).shutdown = true;
        self.available.notify_all();
    }

    pub fn is_shut_down(&self) -> bool {
        lock_recovering(&self.state).shutdown
    }
}
