//! # Height Cache
//!
//! Vertically stacked chunks share one heightmap column. The cache keeps the
//! most recently used columns so a worker generating `(cx, cy, cz)` reuses the
//! heights another worker computed for `(cx, cy - 1, cz)`.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;

use super::chunk::CHUNK_DIMENSION;
use super::noise_system::NoiseSystem;
use crate::core::lock_recovering;

/// Surface heights of one chunk column, indexed `x + CHUNK_DIMENSION * z`.
pub type HeightColumn = Arc<[i32]>;

/// Computes the heightmap of chunk column `(cx, cz)` without caching.
///
/// World coordinates saturate for columns outside i32 world space.
pub fn compute_column(noise: &NoiseSystem, cx: i32, cz: i32) -> HeightColumn {
    let d = CHUNK_DIMENSION;
    let (x0, z0) = (cx.saturating_mul(d), cz.saturating_mul(d));
    let mut heights = Vec::with_capacity((d * d) as usize);
    for z in 0..d {
        for x in 0..d {
            heights.push(noise.surface_height(x0.saturating_add(x), z0.saturating_add(z)));
        }
    }
    heights.into()
}

/// Thread-safe bounded LRU of heightmap columns for one noise seed.
pub struct HeightCache {
    noise: NoiseSystem,
    columns: Mutex<LruCache<(i32, i32), HeightColumn>>,
}

impl HeightCache {
    /// # Arguments
    /// * `noise` - The noise system all cached columns are sampled from
    /// * `capacity` - Maximum number of columns kept; 0 is treated as 1
    pub fn new(noise: NoiseSystem, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            noise,
            columns: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn noise(&self) -> &NoiseSystem {
        &self.noise
    }

    /// Heights of chunk column `(cx, cz)`, computed on a miss.
    ///
    /// The noise is sampled with the lock released, so two workers missing on
    /// the same column may both compute it; the results are identical.
    pub fn column(&self, cx: i32, cz: i32) -> HeightColumn {
        if let Some(column) = lock_recovering(&self.columns).get(&(cx, cz)) {
            return column.clone();
        }

        let column = compute_column(&self.noise, cx, cz);
        lock_recovering(&self.columns).put((cx, cz), column.clone());
        column
    }

    pub fn len(&self) -> usize {
        lock_recovering(&self.columns).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_column_matches_direct_computation() {
        let cache = HeightCache::new(NoiseSystem::new(11), 4);
        let first = cache.column(3, -2);
        let second = cache.column(3, -2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(&*first, &*compute_column(&NoiseSystem::new(11), 3, -2));
        assert_eq!(first[5 + 32 * 7], NoiseSystem::new(11).surface_height(3 * 32 + 5, -2 * 32 + 7));
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = HeightCache::new(NoiseSystem::new(0), 2);
        cache.column(0, 0);
        cache.column(1, 0);
        cache.column(0, 0);
        cache.column(2, 0);
        assert_eq!(cache.len(), 2);
        let columns = lock_recovering(&cache.columns);
        assert!(columns.contains(&(0, 0)));
        assert!(!columns.contains(&(1, 0)));
    }
}
