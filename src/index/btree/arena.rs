//! NodeArena - slot storage for tree nodes.
//!
//! Nodes are addressed by [`NodeId`] instead of by pointer. This lets the
//! leaf chain hold plain handles to its neighbours without creating a second
//! ownership path through the tree.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      NodeArena                          │
//! │  slots: Vec<Option<Node>>                               │
//! │   [Some(Leaf)] [None] [Some(Internal)] [Some(Leaf)] ... │
//! │  free_list: Vec<NodeId>  (LIFO, reused before growing)  │
//! └─────────────────────────────────────────────────────────┘
//! ```

use crate::common::NodeId;
use crate::index::btree::node::{InternalNode, LeafNode, Node};

/// Owns every node of one tree.
#[derive(Debug, Clone)]
pub struct NodeArena<K> {
    /// `None` marks a freed slot waiting on the free list.
    slots: Vec<Option<Node<K>>>,

    /// Stack of freed slot IDs (LIFO for cache locality).
    free_list: Vec<NodeId>,
}

impl<K> NodeArena<K> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store a node and return its handle.
    pub fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.free_list.pop() {
            Some(id) => {
                self.slots[id.slot()] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Remove a node from the arena, handing back ownership.
    ///
    /// # Panics
    /// Panics if `id` is not live.
    pub fn free(&mut self, id: NodeId) -> Node<K> {
        match self.slots[id.slot()].take() {
            Some(node) => {
                self.free_list.push(id);
                node
            }
            None => panic!("double free of {}", id),
        }
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// # Panics
    /// Panics if `id` is not live.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<K> {
        match &self.slots[id.slot()] {
            Some(node) => node,
            None => panic!("{} is not a live node", id),
        }
    }

    /// # Panics
    /// Panics if `id` is not live.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match &mut self.slots[id.slot()] {
            Some(node) => node,
            None => panic!("{} is not a live node", id),
        }
    }

    /// Mutable access to two distinct nodes at once (siblings during
    /// borrow and merge).
    ///
    /// # Panics
    /// Panics if `a == b` or either is not live.
    pub fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K>, &mut Node<K>) {
        assert_ne!(a, b, "pair_mut needs two distinct nodes");
        let (first, second) = if a.slot() < b.slot() {
            let (lo, hi) = self.slots.split_at_mut(b.slot());
            (&mut lo[a.slot()], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(a.slot());
            (&mut hi[0], &mut lo[b.slot()])
        };
        match (first, second) {
            (Some(x), Some(y)) => (x, y),
            _ => panic!("{} or {} is not a live node", a, b),
        }
    }

    /// # Panics
    /// Panics if `id` is not a live leaf.
    #[inline]
    pub fn leaf(&self, id: NodeId) -> &LeafNode<K> {
        match self.get(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("{} is not a leaf", id),
        }
    }

    /// # Panics
    /// Panics if `id` is not a live leaf.
    #[inline]
    pub fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K> {
        match self.get_mut(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("{} is not a leaf", id),
        }
    }

    /// # Panics
    /// Panics if `id` is not a live internal node.
    #[inline]
    pub fn internal(&self, id: NodeId) -> &InternalNode<K> {
        match self.get(id) {
            Node::Internal(inner) => inner,
            Node::Leaf(_) => panic!("{} is not an internal node", id),
        }
    }

    /// # Panics
    /// Panics if `id` is not a live internal node.
    #[inline]
    pub fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode<K> {
        match self.get_mut(id) {
            Node::Internal(inner) => inner,
            Node::Leaf(_) => panic!("{} is not an internal node", id),
        }
    }
}

impl<K> Default for NodeArena<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(keys: &[u32]) -> Node<u32> {
        let mut leaf = LeafNode::new();
        leaf.keys = keys.to_vec();
        leaf.rows = keys.iter().map(|&k| crate::RowId::new(k as u64)).collect();
        Node::Leaf(leaf)
    }

    #[test]
    fn test_alloc_and_get() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(leaf(&[1]));
        let b = arena.alloc(leaf(&[2]));

        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a).keys(), &[1]);
        assert_eq!(arena.leaf(b).keys, vec![2]);
    }

    #[test]
    fn test_free_reuses_slot() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(leaf(&[1]));
        let _b = arena.alloc(leaf(&[2]));

        let freed = arena.free(a);
        assert_eq!(freed.keys(), &[1]);
        assert_eq!(arena.len(), 1);

        // LIFO: the freed slot is handed out next
        let c = arena.alloc(leaf(&[3]));
        assert_eq!(c, a);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "double free")]
    fn test_double_free_panics() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(leaf(&[1]));
        arena.free(a);
        arena.free(a);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(leaf(&[1]));
        let b = arena.alloc(leaf(&[2]));

        {
            let (x, y) = arena.pair_mut(a, b);
            assert_eq!(x.keys(), &[1]);
            assert_eq!(y.keys(), &[2]);
        }
        let (y, x) = arena.pair_mut(b, a);
        assert_eq!(y.keys(), &[2]);
        assert_eq!(x.keys(), &[1]);
    }

    #[test]
    fn test_clear() {
        let mut arena = NodeArena::new();
        arena.alloc(leaf(&[1]));
        arena.alloc(leaf(&[2]));
        arena.clear();
        assert!(arena.is_empty());
    }
}
