//! BPlusTree - the entry point owning the root node.
//!
//! The tree is the only object callers interact with. It owns the node
//! arena, tracks the root handle, and is the sole place where the height
//! changes:
//! - **Growth**: before an insert, a full root is wrapped in a keyless shell
//!   and split ([`BPlusTree::insert`]).
//! - **Shrink**: after a delete, an internal root left without keys is
//!   replaced by its only child ([`BPlusTree::delete`]).

use std::fmt;

use tracing::debug;

use crate::common::{Error, NodeId, Result, RowId, TreeConfig};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::node::{InternalNode, LeafNode, Node};
use crate::index::btree::{Removal, StatsSnapshot, TreeStats};

/// An in-memory B+ tree mapping ordered keys to [`RowId`]s.
///
/// Duplicate keys are allowed. Within a leaf a new duplicate lands after
/// the equal keys already there.
///
/// Deleting one of several equal keys routes right and refreshes every
/// separator equal to it, which can leave separators that no longer bound
/// their subtrees and, after later inserts, a leaf chain that is out of key
/// order. From that delete until the tree is emptied or cleared,
/// [`is_ordered`](Self::is_ordered) is false and lookups scan the whole
/// chain instead of descending.
///
/// # Usage
/// ```
/// use leafchain::{BPlusTree, RowId};
///
/// let mut tree = BPlusTree::new(2).unwrap();
/// tree.init_root();
///
/// for i in 1..=9u32 {
///     tree.insert(i, RowId::new(i as u64)).unwrap();
/// }
/// assert_eq!(tree.len(), 9);
/// assert_eq!(tree.get(&4), Some(RowId::new(4)));
///
/// let removal = tree.delete(&4).unwrap();
/// assert!(removal.is_found());
/// assert_eq!(tree.get(&4), None);
/// ```
#[derive(Clone)]
pub struct BPlusTree<K> {
    pub(super) config: TreeConfig,
    pub(super) arena: NodeArena<K>,
    pub(super) root: Option<NodeId>,
    pub(super) len: usize,
    /// Separators bound their subtrees and the chain is sorted.
    pub(super) ordered: bool,
    pub(super) stats: TreeStats,
}

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    /// Create an empty shell with the given minimum degree.
    ///
    /// The tree has no root until [`init_root`](Self::init_root) is called.
    ///
    /// # Errors
    /// - `Error::InvalidDegree` if `degree < 2`
    pub fn new(degree: usize) -> Result<Self> {
        Self::with_config(TreeConfig::new(degree))
    }

    /// Create an empty shell from a [`TreeConfig`].
    ///
    /// # Errors
    /// - `Error::InvalidDegree` if the config's degree is below the minimum
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            arena: NodeArena::new(),
            root: None,
            len: 0,
            ordered: true,
            stats: TreeStats::new(),
        })
    }

    /// Establish an empty leaf as the root.
    ///
    /// Calling this again discards all existing entries.
    pub fn init_root(&mut self) {
        self.arena.clear();
        self.root = Some(self.arena.alloc(Node::Leaf(LeafNode::new())));
        self.len = 0;
        self.ordered = true;
    }

    /// Remove every entry, leaving an empty leaf root.
    pub fn clear(&mut self) {
        self.init_root();
    }

    // ========================================================================
    // Public API: Mutation
    // ========================================================================

    /// Insert a `(key, row)` pair.
    ///
    /// A full root is split first, so the descent below never has to
    /// re-ascend to fix an overflow.
    ///
    /// # Errors
    /// - `Error::Uninitialized` if `init_root` has not been called
    pub fn insert(&mut self, key: K, row: RowId) -> Result<()> {
        let root = self.root.ok_or(Error::Uninitialized)?;
        let root = if self.arena.get(root).is_full(self.degree()) {
            self.split_root(root)
        } else {
            root
        };

        self.insert_into(root, key, row);
        self.len += 1;
        TreeStats::bump(&self.stats.inserts);
        Ok(())
    }

    /// Remove one occurrence of `key`.
    ///
    /// The occurrence is the one reached by right-leaning routing. A missing
    /// key is not an error: the tree is left unchanged and
    /// [`Removal::NotFound`] is returned. Once the tree is no longer
    /// [ordered](Self::is_ordered), routing can also miss a key that is
    /// still in the chain, with the same result.
    ///
    /// # Errors
    /// - `Error::Uninitialized` if `init_root` has not been called
    pub fn delete(&mut self, key: &K) -> Result<Removal<K>> {
        let root = self.root.ok_or(Error::Uninitialized)?;
        let duplicated = self.ordered && self.range(key.clone()..=key.clone()).nth(1).is_some();
        let removal = self.delete_from(root, key);

        if removal.is_found() {
            self.len -= 1;
            TreeStats::bump(&self.stats.deletes);
            if duplicated {
                self.ordered = false;
                debug!(?key, "deleted a duplicate; lookups now scan the leaf chain");
            }
        }
        self.collapse_root(root);

        // An empty tree is a single empty leaf.
        if self.len == 0 {
            self.ordered = true;
        }
        Ok(removal)
    }

    /// Wrap the root in a keyless internal shell and split it.
    ///
    /// Returns the new root.
    fn split_root(&mut self, old_root: NodeId) -> NodeId {
        let shell = self
            .arena
            .alloc(Node::Internal(InternalNode::shell(old_root)));
        self.root = Some(shell);
        self.split_child(shell, 0);

        TreeStats::bump(&self.stats.root_splits);
        debug!(height = self.height(), "root split");
        shell
    }

    /// Replace an internal root that lost its last separator with its only child.
    fn collapse_root(&mut self, root: NodeId) {
        let child = match self.arena.get(root) {
            Node::Internal(inner) if inner.keys.is_empty() => inner.children[0],
            _ => return,
        };
        self.arena.free(root);
        self.root = Some(child);

        TreeStats::bump(&self.stats.root_collapses);
        debug!(height = self.height(), "root collapsed");
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Row of the first entry equal to `key` in leaf-chain order.
    pub fn get(&self, key: &K) -> Option<RowId> {
        self.range(key.clone()..=key.clone())
            .next()
            .map(|(_, row)| row)
    }

    /// Rows of every entry equal to `key`, in leaf-chain order.
    pub fn get_all(&self, key: &K) -> Vec<RowId> {
        self.range(key.clone()..=key.clone())
            .map(|(_, row)| row)
            .collect()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    // ========================================================================
    // Public API: Shape
    // ========================================================================

    /// Minimum branching factor.
    #[inline]
    pub fn degree(&self) -> usize {
        self.config.degree
    }

    #[inline]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether separators and the leaf chain are known to be in key order.
    ///
    /// Starts true, becomes false once a delete removes one of several equal
    /// keys, and is restored when the tree empties or is cleared. While
    /// false, [`range`](Self::range) and the point lookups scan every leaf
    /// and yield matches in chain order.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Whether `init_root` has been called.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    /// Number of levels, counting the leaves. 0 before `init_root`.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            height += 1;
            cursor = match self.arena.get(id) {
                Node::Internal(inner) => Some(inner.children[0]),
                Node::Leaf(_) => None,
            };
        }
        height
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Keys held by the root node.
    pub fn root_keys(&self) -> Vec<K> {
        self.root
            .map(|id| self.arena.get(id).keys().to_vec())
            .unwrap_or_default()
    }

    /// Keys of every leaf, walking the chain left to right.
    pub fn leaf_keys(&self) -> Vec<Vec<K>> {
        let mut leaves = Vec::new();
        let mut cursor = self.first_leaf();
        while let Some(id) = cursor {
            let leaf = self.arena.leaf(id);
            leaves.push(leaf.keys.clone());
            cursor = leaf.next;
        }
        leaves
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Leftmost leaf, following `children[0]` from the root.
    pub(super) fn first_leaf(&self) -> Option<NodeId> {
        let mut id = self.root?;
        loop {
            match self.arena.get(id) {
                Node::Internal(inner) => id = inner.children[0],
                Node::Leaf(_) => return Some(id),
            }
        }
    }

    /// Rightmost leaf, following the last child from the root.
    pub(super) fn last_leaf(&self) -> Option<NodeId> {
        let mut id = self.root?;
        loop {
            match self.arena.get(id) {
                Node::Internal(inner) => id = inner.children[inner.children.len() - 1],
                Node::Leaf(_) => return Some(id),
            }
        }
    }
}

impl<K: Ord + Clone + fmt::Debug> fmt::Debug for BPlusTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BPlusTree")
            .field("degree", &self.degree())
            .field("len", &self.len)
            .field("ordered", &self.ordered)
            .field("height", &self.height())
            .field("root_keys", &self.root_keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(i: u32) -> RowId {
        RowId::new(i as u64)
    }

    fn tree_with(degree: usize, keys: impl IntoIterator<Item = u32>) -> BPlusTree<u32> {
        let mut tree = BPlusTree::new(degree).unwrap();
        tree.init_root();
        for k in keys {
            tree.insert(k, row(k)).unwrap();
        }
        tree
    }

    #[test]
    fn test_new_rejects_small_degree() {
        assert_eq!(
            BPlusTree::<u32>::new(1).unwrap_err(),
            Error::InvalidDegree { degree: 1, min: 2 }
        );
        assert!(BPlusTree::<u32>::new(2).is_ok());
    }

    #[test]
    fn test_uninitialized() {
        let mut tree = BPlusTree::<u32>::new(2).unwrap();
        assert!(!tree.is_initialized());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.insert(1, row(1)), Err(Error::Uninitialized));
        assert_eq!(tree.delete(&1), Err(Error::Uninitialized));
        assert_eq!(tree.get(&1), None);
        assert!(tree.leaf_keys().is_empty());
    }

    #[test]
    fn test_init_root_is_empty_leaf() {
        let tree = tree_with(2, []);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_keys(), vec![Vec::<u32>::new()]);
    }

    #[test]
    fn test_root_split_grows_height() {
        // Degree 2: the root leaf holds 3 keys before it is full.
        let mut tree = tree_with(2, 1..=3);
        assert_eq!(tree.height(), 1);

        tree.insert(4, row(4)).unwrap();
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.root_keys(), vec![3]);
        assert_eq!(tree.leaf_keys(), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(tree.stats().root_splits, 1);
    }

    #[test]
    fn test_inserting_one_through_eight() {
        let tree = tree_with(2, 1..=8);
        assert_eq!(tree.root_keys(), vec![3, 5, 7]);
        assert_eq!(
            tree.leaf_keys(),
            vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]]
        );
    }

    #[test]
    fn test_ninth_insert_splits_full_root() {
        let tree = tree_with(2, 1..=9);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.root_keys(), vec![5]);
        assert_eq!(
            tree.leaf_keys(),
            vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8, 9]]
        );

        let stats = tree.stats();
        assert_eq!(stats.leaf_splits, 3);
        assert_eq!(stats.internal_splits, 1);
        assert_eq!(stats.root_splits, 2);
    }

    #[test]
    fn test_collapse_to_leaf_root() {
        let mut tree = tree_with(2, 1..=4);
        assert_eq!(tree.height(), 2);

        for k in [4, 3, 2] {
            assert!(tree.delete(&k).unwrap().is_found());
        }
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.leaf_keys(), vec![vec![1]]);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.stats().root_collapses, 1);
    }

    #[test]
    fn test_get_and_contains() {
        let tree = tree_with(3, (0..50).map(|i| i * 2));
        assert_eq!(tree.get(&20), Some(row(20)));
        assert_eq!(tree.get(&21), None);
        assert!(tree.contains(&98));
        assert!(!tree.contains(&100));
    }

    #[test]
    fn test_get_returns_leftmost_duplicate() {
        let mut tree = tree_with(2, []);
        for r in 1..=5 {
            tree.insert(5u32, RowId::new(r)).unwrap();
        }
        assert_eq!(tree.get(&5), Some(RowId::new(1)));
        assert_eq!(
            tree.get_all(&5),
            (1..=5).map(RowId::new).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_ordered_until_a_duplicate_is_deleted() {
        let mut tree = tree_with(2, [5, 5, 3, 8]);
        assert!(tree.is_ordered());

        // Unique keys never affect ordering.
        tree.delete(&3).unwrap();
        tree.delete(&42).unwrap();
        assert!(tree.is_ordered());

        // One of two equal keys.
        tree.delete(&5).unwrap();
        assert!(!tree.is_ordered());
        assert_eq!(tree.get_all(&5).len(), 1);

        tree.delete(&5).unwrap();
        tree.delete(&8).unwrap();
        assert!(tree.is_empty());
        assert!(tree.is_ordered());
    }

    #[test]
    fn test_clear_restores_ordered() {
        let mut tree = tree_with(2, [1, 1, 1]);
        tree.delete(&1).unwrap();
        assert!(!tree.is_ordered());
        tree.clear();
        assert!(tree.is_ordered());
    }

    #[test]
    fn test_clear() {
        let mut tree = tree_with(2, 1..=20);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        tree.insert(1, row(1)).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_debug_output() {
        let tree = tree_with(2, 1..=4);
        let debug = format!("{:?}", tree);
        assert!(debug.contains("degree: 2"));
        assert!(debug.contains("len: 4"));
        assert!(debug.contains("root_keys: [3]"));
    }
}
