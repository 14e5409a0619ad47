//! Leaf-chain iteration.
//!
//! All iterators walk the doubly linked leaf list rather than the tree, so
//! moving between leaves is a single handle hop. Chain order is key order
//! while [`BPlusTree::is_ordered`] holds.

use std::fmt;
use std::ops::{Bound, RangeBounds};

use crate::common::{NodeId, RowId};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::node::Node;
use crate::index::btree::BPlusTree;

/// Forward iterator over `(key, row)` pairs in leaf-chain order.
pub struct Iter<'a, K> {
    arena: &'a NodeArena<K>,
    leaf: Option<NodeId>,
    pos: usize,
}

impl<'a, K: Ord> Iter<'a, K> {
    fn new(arena: &'a NodeArena<K>, leaf: Option<NodeId>, pos: usize) -> Self {
        Self { arena, leaf, pos }
    }

    /// Next entry without consuming it.
    fn peek(&mut self) -> Option<&'a K> {
        loop {
            let leaf = self.arena.leaf(self.leaf?);
            if let Some(key) = leaf.keys.get(self.pos) {
                return Some(key);
            }
            self.leaf = leaf.next;
            self.pos = 0;
        }
    }
}

impl<'a, K: Ord> Iterator for Iter<'a, K> {
    type Item = (&'a K, RowId);

    fn next(&mut self) -> Option<Self::Item> {
        self.peek()?;
        let leaf = self.arena.leaf(self.leaf?);
        let item = (&leaf.keys[self.pos], leaf.rows[self.pos]);
        self.pos += 1;
        Some(item)
    }
}

/// Reverse iterator following `prev` links from the last leaf.
pub struct RevIter<'a, K> {
    arena: &'a NodeArena<K>,
    leaf: Option<NodeId>,
    /// Number of entries of the current leaf not yet yielded.
    remaining: usize,
}

impl<'a, K: Ord> Iterator for RevIter<'a, K> {
    type Item = (&'a K, RowId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.arena.leaf(self.leaf?);
            if self.remaining > 0 {
                self.remaining -= 1;
                return Some((&leaf.keys[self.remaining], leaf.rows[self.remaining]));
            }
            self.leaf = leaf.prev;
            self.remaining = self
                .leaf
                .map_or(0, |id| self.arena.leaf(id).keys.len());
        }
    }
}

/// Forward iterator over the entries between a start and an end [`Bound`].
pub struct Range<'a, K> {
    inner: Iter<'a, K>,
    start: Bound<K>,
    end: Bound<K>,
    /// Stop at the first key past `end`. Only valid on a sorted chain.
    sorted: bool,
}

fn past_start<K: Ord>(start: &Bound<K>, key: &K) -> bool {
    match start {
        Bound::Included(start) => key >= start,
        Bound::Excluded(start) => key > start,
        Bound::Unbounded => true,
    }
}

fn before_end<K: Ord>(end: &Bound<K>, key: &K) -> bool {
    match end {
        Bound::Included(end) => key <= end,
        Bound::Excluded(end) => key < end,
        Bound::Unbounded => true,
    }
}

impl<'a, K: Ord> Iterator for Range<'a, K> {
    type Item = (&'a K, RowId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let key = self.inner.peek()?;
            if !before_end(&self.end, key) && self.sorted {
                self.inner.leaf = None;
                return None;
            }
            if past_start(&self.start, key) && before_end(&self.end, key) {
                return self.inner.next();
            }
            self.inner.next();
        }
    }
}

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    /// Iterate all entries in key order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.arena, self.first_leaf(), 0)
    }

    /// Iterate all entries in reverse key order.
    pub fn iter_rev(&self) -> RevIter<'_, K> {
        let leaf = self.last_leaf();
        RevIter {
            arena: &self.arena,
            leaf,
            remaining: leaf.map_or(0, |id| self.arena.leaf(id).keys.len()),
        }
    }

    /// Iterate entries whose keys fall within `range`.
    ///
    /// On an ordered tree this descends to the first candidate leaf and
    /// stops at the first key past the end. Otherwise every leaf is scanned
    /// and matches come back in chain order.
    ///
    /// # Example
    /// ```
    /// use leafchain::{BPlusTree, RowId};
    ///
    /// let mut tree = BPlusTree::new(2).unwrap();
    /// tree.init_root();
    /// for i in 0..20u32 {
    ///     tree.insert(i, RowId::new(i as u64)).unwrap();
    /// }
    /// let keys: Vec<u32> = tree.range(5..8).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![5, 6, 7]);
    /// ```
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K> {
        let inner = match range.start_bound() {
            Bound::Included(start) | Bound::Excluded(start) if self.ordered => self.seek(start),
            _ => self.iter(),
        };
        Range {
            inner,
            start: range.start_bound().cloned(),
            end: range.end_bound().cloned(),
            sorted: self.ordered,
        }
    }

    /// Position an iterator on the leftmost entry `>= key`.
    fn seek(&self, key: &K) -> Iter<'_, K> {
        let Some(mut id) = self.root else {
            return Iter::new(&self.arena, None, 0);
        };
        loop {
            match self.arena.get(id) {
                Node::Internal(inner) => id = inner.children[inner.seek_route(key)],
                Node::Leaf(leaf) => {
                    let pos = leaf.keys.partition_point(|k| k < key);
                    return Iter::new(&self.arena, Some(id), pos);
                }
            }
        }
    }
}

impl<'a, K: Ord + Clone + fmt::Debug> IntoIterator for &'a BPlusTree<K> {
    type Item = (&'a K, RowId);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
