use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` shares a value of type `T` between the main thread and the
/// worker pool. Many readers may hold the value at once; writers are exclusive.
///
/// A panic on one thread while holding the lock does not make the resource
/// unusable for the others: the guard is recovered from the poison error.
///
/// # Examples
///
/// ```
/// # use std::thread;
/// use voxel_terrain::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let counter_clone = counter.clone();
///
/// let handle = thread::spawn(move || {
///     *counter_clone.get_mut() += 1;
/// });
///
/// handle.join().unwrap();
/// assert_eq!(*counter.get(), 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    ///
    /// # Arguments
    /// * `resource` - The value to be stored in the resource
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard for the contained value.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an exclusive guard for the contained value.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

/// Locks a mutex, recovering the guard if another thread panicked while holding it.
pub fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_a_panicking_writer() {
        let shared = MtResource::new(vec![1, 2, 3]);
        let clone = shared.clone();
        let result = std::thread::spawn(move || {
            let _guard = clone.get_mut();
            panic!("writer died");
        })
        .join();
        assert!(result.is_err());
        assert_eq!(shared.get().len(), 3);
        shared.get_mut().push(4);
        assert_eq!(*shared.get(), vec![1, 2, 3, 4]);
    }
}
