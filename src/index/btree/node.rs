//! Node - the building block of the B+ tree.
//!
//! A [`Node`] is either a [`LeafNode`] (keys, parallel rows, and links to the
//! neighbouring leaves) or an [`InternalNode`] (separator keys and owned
//! children). The two variants never share fields, so code that needs
//! variant-specific data matches on the enum instead of checking a flag.
//!
//! # Layout
//! ```text
//!                 Internal { keys: [k0, k1], children: [c0, c1, c2] }
//!                       /              |               \
//!   Leaf { keys, rows } ⇄ Leaf { keys, rows } ⇄ Leaf { keys, rows }
//!            prev/next links are non-owning NodeId handles
//! ```

use crate::common::{NodeId, RowId};

/// A leaf: holds the actual (key, row) entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode<K> {
    /// Sorted ascending; duplicates allowed.
    pub keys: Vec<K>,

    /// One row per key, parallel to `keys`.
    pub rows: Vec<RowId>,

    /// Leaf immediately to the left, if any.
    pub prev: Option<NodeId>,

    /// Leaf immediately to the right, if any.
    pub next: Option<NodeId>,
}

impl<K: Ord> LeafNode<K> {
    /// Create an empty, unlinked leaf.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            rows: Vec::new(),
            prev: None,
            next: None,
        }
    }

    /// Slot for a new key: after every key `<= key`.
    ///
    /// Scans from the right and stops at the first key that is not greater
    /// than `key`, so equal keys keep their insertion order.
    pub fn insert_position(&self, key: &K) -> usize {
        self.keys.iter().rposition(|k| k <= key).map_or(0, |i| i + 1)
    }

    /// Insert an entry at its sorted position.
    pub fn insert(&mut self, key: K, row: RowId) {
        let pos = self.insert_position(&key);
        self.keys.insert(pos, key);
        self.rows.insert(pos, row);
    }

    /// Remove the first entry whose key equals `key`.
    ///
    /// Returns the slot it occupied along with the removed entry.
    pub fn remove(&mut self, key: &K) -> Option<(usize, K, RowId)> {
        let pos = self.keys.iter().position(|k| k == key)?;
        let removed = self.keys.remove(pos);
        let row = self.rows.remove(pos);
        Some((pos, removed, row))
    }

    /// Split off everything from `degree` onwards into a new leaf.
    ///
    /// The new leaf is not linked into the chain yet.
    pub fn split_off(&mut self, degree: usize) -> Self {
        let mut sibling = Self::new();
        sibling.keys = self.keys.split_off(degree);
        sibling.rows = self.rows.split_off(degree);
        sibling
    }
}

impl<K: Ord> Default for LeafNode<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// An internal node: separators plus the children they route between.
///
/// Invariant: `children.len() == keys.len() + 1`. `keys[i]` is the smallest
/// key in `children[i + 1]`'s subtree; ties route right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode<K> {
    pub keys: Vec<K>,
    pub children: Vec<NodeId>,
}

impl<K: Ord> InternalNode<K> {
    /// A keyless shell owning a single child. Only valid transiently,
    /// while the root is being split.
    pub fn shell(child: NodeId) -> Self {
        Self {
            keys: Vec::new(),
            children: vec![child],
        }
    }

    /// Child to descend into when inserting `key`.
    ///
    /// Same right-to-left scan as [`LeafNode::insert_position`]: the result
    /// is the number of separators `<= key`, so ties go to the right child.
    pub fn insert_route(&self, key: &K) -> usize {
        self.keys.iter().rposition(|k| k <= key).map_or(0, |i| i + 1)
    }

    /// Child to descend into when deleting `key`.
    ///
    /// An exact separator match means the key is the minimum of the right
    /// child's subtree; otherwise scan forward past every separator `<= key`.
    pub fn delete_route(&self, key: &K) -> usize {
        match self.keys.iter().position(|k| k == key) {
            Some(i) => i + 1,
            None => self.keys.iter().take_while(|k| key >= *k).count(),
        }
    }

    /// Child that may hold the leftmost entry `>= key`.
    pub fn seek_route(&self, key: &K) -> usize {
        self.keys.iter().take_while(|k| *k < key).count()
    }

    /// Split a full node, pushing its middle key up.
    ///
    /// `self` keeps `degree - 1` keys and `degree` children; the returned
    /// sibling takes the rest. The middle key leaves both halves.
    pub fn split_off(&mut self, degree: usize) -> (K, Self) {
        let keys = self.keys.split_off(degree);
        let children = self.children.split_off(degree);
        let separator = self.keys.remove(degree - 1);
        (separator, Self { keys, children })
    }
}

/// A B+ tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<K> {
    Leaf(LeafNode<K>),
    Internal(InternalNode<K>),
}

impl<K: Ord> Node<K> {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Keys held by this node, whichever variant it is.
    #[inline]
    pub fn keys(&self) -> &[K] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Internal(inner) => &inner.keys,
        }
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys().len()
    }

    // ========================================================================
    // Capacity predicates
    // ========================================================================

    /// At capacity: `2 * degree - 1` keys. Must be split before descending.
    #[inline]
    pub fn is_full(&self, degree: usize) -> bool {
        self.key_count() == 2 * degree - 1
    }

    /// Meets minimum occupancy: at least `degree - 1` keys.
    #[inline]
    pub fn is_enough(&self, degree: usize) -> bool {
        self.key_count() >= degree - 1
    }

    /// Has a key to spare for an under-occupied sibling.
    #[inline]
    pub fn can_borrow(&self, degree: usize) -> bool {
        self.key_count() >= degree
    }
}
