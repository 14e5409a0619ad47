//! SharedBPlusTree - a tree behind a single reader/writer lock.
//!
//! Rebalancing can touch every node on a root-to-leaf path plus siblings,
//! so the lock is taken at the tree level rather than per node.
//!
//! # Thread Safety
//! - `insert` / `delete` / `clear`: exclusive write lock
//! - lookups, scans, validation, stats: shared read lock

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::common::{Result, RowId};
use crate::index::btree::{BPlusTree, Removal, StatsSnapshot};

/// A cloneable, thread-safe handle to a [`BPlusTree`].
///
/// # Example
/// ```
/// use leafchain::{BPlusTree, RowId, SharedBPlusTree};
///
/// let mut tree = BPlusTree::new(3).unwrap();
/// tree.init_root();
/// let shared = SharedBPlusTree::new(tree);
///
/// let writer = shared.clone();
/// std::thread::spawn(move || writer.insert(7u32, RowId::new(70)).unwrap())
///     .join()
///     .unwrap();
///
/// assert_eq!(shared.get(&7), Some(RowId::new(70)));
/// ```
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

impl<K: Ord + Clone + fmt::Debug> SharedBPlusTree<K> {
    /// Wrap an existing tree.
    pub fn new(tree: BPlusTree<K>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    // ========================================================================
    // Write lock
    // ========================================================================

    pub fn insert(&self, key: K, row: RowId) -> Result<()> {
        self.inner.write().insert(key, row)
    }

    pub fn delete(&self, key: &K) -> Result<Removal<K>> {
        self.inner.write().delete(key)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    // ========================================================================
    // Read lock
    // ========================================================================

    pub fn get(&self, key: &K) -> Option<RowId> {
        self.inner.read().get(key)
    }

    pub fn get_all(&self, key: &K) -> Vec<RowId> {
        self.inner.read().get_all(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Copy out every entry in key order.
    pub fn collect(&self) -> Vec<(K, RowId)> {
        self.inner
            .read()
            .iter()
            .map(|(k, row)| (k.clone(), row))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.inner.read().validate()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats()
    }

    /// Hold the read lock for a multi-step inspection.
    ///
    /// Writers block until the guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, BPlusTree<K>> {
        self.inner.read()
    }
}
