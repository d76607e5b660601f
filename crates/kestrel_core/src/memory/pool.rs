//! # Pool
//!
//! Free-list of pre-reset instances for objects that are frequently
//! created and destroyed.

/// A type that can be recycled through a [`Pool`].
///
/// `reset` must clear every outward reference the instance holds
/// (callbacks, ids of other entities or components, collections) so a
/// recycled instance can never act on behalf of its previous owner.
pub trait Poolable: Default {
    /// Returns the instance to its freshly-constructed state.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Counters reported by [`Pool::stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances ever constructed.
    pub allocated: usize,
    /// Instances waiting in the free list.
    pub available: usize,
}

/// A pool of reusable instances.
///
/// `acquire` hands out a reset instance, constructing one only when the
/// free list is empty. `release` resets the instance before storing it.
/// Ownership moves in and out of the pool, so an instance is never
/// reachable from two owners.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Each world owns one pool per type.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: Pool<Particle> = Pool::new();
///
/// let particle = pool.acquire();   // constructed
/// pool.release(particle);          // reset and kept
/// let again = pool.acquire();      // reused, no construction
/// assert_eq!(pool.allocated(), 1);
/// ```
#[derive(Debug)]
pub struct Pool<T: Poolable> {
    /// Reset instances ready to be handed out.
    free: Vec<T>,
    /// Number of instances ever constructed by this pool.
    allocated: usize,
}

impl<T: Poolable> Pool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            free: Vec::new(),
            allocated: 0,
        }
    }

    /// Creates a pool with `count` instances constructed upfront.
    #[must_use]
    pub fn with_capacity(count: usize) -> Self {
        let free = (0..count).map(|_| T::default()).collect();
        Self {
            free,
            allocated: count,
        }
    }

    /// Takes a reset instance out of the pool.
    ///
    /// O(1); constructs a new instance only when the free list is empty.
    pub fn acquire(&mut self) -> T {
        if let Some(value) = self.free.pop() {
            return value;
        }
        self.allocated += 1;
        T::default()
    }

    /// Resets `value` and stores it for reuse.
    pub fn release(&mut self, mut value: T) {
        value.reset();
        self.free.push(value);
    }

    /// Number of instances ever constructed by this pool.
    #[inline]
    #[must_use]
    pub const fn allocated(&self) -> usize {
        self.allocated
    }

    /// Number of instances waiting in the free list.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Snapshot of the pool's counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.allocated,
            available: self.free.len(),
        }
    }

    /// Drops every pooled instance.
    pub fn clear(&mut self) {
        self.allocated = self.allocated.saturating_sub(self.free.len());
        self.free.clear();
    }
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
