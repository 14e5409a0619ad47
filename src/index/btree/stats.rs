//! Structural statistics for a B+ tree.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters of structural events inside a tree.
///
/// All fields are atomic so a [`SharedBPlusTree`](crate::SharedBPlusTree)
/// reader holding only a shared lock can still take a snapshot.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` throughout: counters are independent and only
/// need atomicity, not cross-counter ordering.
///
/// # Example
/// ```
/// use leafchain::TreeStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = TreeStats::new();
/// stats.leaf_splits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().leaf_splits, 1);
/// ```
#[derive(Debug)]
pub struct TreeStats {
    /// Entries inserted.
    pub inserts: AtomicU64,

    /// Entries removed.
    pub deletes: AtomicU64,

    /// Deletes that reached a leaf without finding the key.
    pub not_found: AtomicU64,

    /// Leaf splits (copy-up).
    pub leaf_splits: AtomicU64,

    /// Internal node splits (push-up).
    pub internal_splits: AtomicU64,

    /// Rebalances that took a key from the left sibling.
    pub borrows_left: AtomicU64,

    /// Rebalances that took a key from the right sibling.
    pub borrows_right: AtomicU64,

    /// Sibling merges.
    pub merges: AtomicU64,

    /// Height increases.
    pub root_splits: AtomicU64,

    /// Height decreases.
    pub root_collapses: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            inserts: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            leaf_splits: AtomicU64::new(0),
            internal_splits: AtomicU64::new(0),
            borrows_left: AtomicU64::new(0),
            borrows_right: AtomicU64::new(0),
            merges: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
            root_collapses: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            leaf_splits: self.leaf_splits.load(Ordering::Relaxed),
            internal_splits: self.internal_splits.load(Ordering::Relaxed),
            borrows_left: self.borrows_left.load(Ordering::Relaxed),
            borrows_right: self.borrows_right.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            root_collapses: self.root_collapses.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.inserts,
            &self.deletes,
            &self.not_found,
            &self.leaf_splits,
            &self.internal_splits,
            &self.borrows_left,
            &self.borrows_right,
            &self.merges,
            &self.root_splits,
            &self.root_collapses,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TreeStats {
    fn clone(&self) -> Self {
        let s = self.snapshot();
        Self {
            inserts: AtomicU64::new(s.inserts),
            deletes: AtomicU64::new(s.deletes),
            not_found: AtomicU64::new(s.not_found),
            leaf_splits: AtomicU64::new(s.leaf_splits),
            internal_splits: AtomicU64::new(s.internal_splits),
            borrows_left: AtomicU64::new(s.borrows_left),
            borrows_right: AtomicU64::new(s.borrows_right),
            merges: AtomicU64::new(s.merges),
            root_splits: AtomicU64::new(s.root_splits),
            root_collapses: AtomicU64::new(s.root_collapses),
        }
    }
}

/// A point-in-time copy of [`TreeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub inserts: u64,
    pub deletes: u64,
    pub not_found: u64,
    pub leaf_splits: u64,
    pub internal_splits: u64,
    pub borrows_left: u64,
    pub borrows_right: u64,
    pub merges: u64,
    pub root_splits: u64,
    pub root_collapses: u64,
}

impl StatsSnapshot {
    /// Total splits of either kind.
    pub fn splits(&self) -> u64 {
        self.leaf_splits + self.internal_splits
    }

    /// Total borrows from either side.
    pub fn borrows(&self) -> u64 {
        self.borrows_left + self.borrows_right
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, deletes: {}, not_found: {}, splits: {}, borrows: {}, merges: {}, height: +{}/-{} }}",
            self.inserts,
            self.deletes,
            self.not_found,
            self.splits(),
            self.borrows(),
            self.merges,
            self.root_splits,
            self.root_collapses
        )
    }
}
