//! Shared B+Tree handle for multi-threaded callers.
//!
//! The tree itself is single-threaded. [`SharedBPlusTree`] serializes
//! mutations behind one exclusive lock and lets reads run side by side when
//! no mutation is in flight.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::Result;
use crate::index::btree::{BPlusTree, StatsSnapshot};

/// A cloneable, thread-safe handle to one [`BPlusTree`].
///
/// # Thread Safety
/// - `insert` / `remove` / `clear`: write lock, one at a time
/// - `search` / `search_range` / `all_keys` / `len`: read lock, concurrent
///
/// Each call holds the lock for exactly one tree operation. Use
/// [`read`](Self::read) or [`write`](Self::write) to run several operations
/// under one lock.
///
/// # Usage
/// ```
/// use bplusdb::SharedBPlusTree;
/// use std::thread;
///
/// let tree = SharedBPlusTree::new(4).unwrap();
///
/// let handles: Vec<_> = (0..4u32)
///     .map(|t| {
///         let tree = tree.clone();
///         thread::spawn(move || {
///             for i in 0..100 {
///                 tree.insert(t * 100 + i).unwrap();
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(tree.len(), 400);
/// ```
#[derive(Debug)]
pub struct SharedBPlusTree<K> {
    inner: Arc<RwLock<BPlusTree<K>>>,
}

impl<K> Clone for SharedBPlusTree<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Ord + Clone> SharedBPlusTree<K> {
    /// Create a shared empty tree of the given order.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < 3`
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::from_tree(BPlusTree::new(order)?))
    }

    /// Share an existing tree.
    pub fn from_tree(tree: BPlusTree<K>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    // ========================================================================
    // Mutations (write lock)
    // ========================================================================

    /// See [`BPlusTree::insert`].
    pub fn insert(&self, key: K) -> Result<()> {
        self.inner.write().insert(key)
    }

    /// See [`BPlusTree::remove`].
    pub fn remove(&self, key: &K) -> Result<K> {
        self.inner.write().remove(key)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    // ========================================================================
    // Reads (read lock)
    // ========================================================================

    /// See [`BPlusTree::search`].
    pub fn search(&self, key: &K) -> bool {
        self.inner.read().search(key)
    }

    /// See [`BPlusTree::search_range`].
    pub fn search_range(&self, min: &K, max: &K) -> Vec<K> {
        self.inner.read().search_range(min, max)
    }

    /// See [`BPlusTree::all_keys`].
    pub fn all_keys(&self) -> Vec<K> {
        self.inner.read().all_keys()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats().snapshot()
    }

    // ========================================================================
    // Guards
    // ========================================================================

    /// Lock for reading. Blocks while a writer holds the tree.
    pub fn read(&self) -> RwLockReadGuard<'_, BPlusTree<K>> {
        self.inner.read()
    }

    /// Lock for writing. Blocks until all readers are gone.
    pub fn write(&self) -> RwLockWriteGuard<'_, BPlusTree<K>> {
        self.inner.write()
    }

    /// Unwrap the tree if this is the last handle.
    ///
    /// Returns the handle back if other clones are still alive.
    pub fn try_unwrap(self) -> std::result::Result<BPlusTree<K>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}
