//! Insertion: pre-emptive splitting on the way down.
//!
//! Any full child is split *before* the descent enters it, so a leaf always
//! has room by the time it is reached and no split ever has to propagate
//! back up the tree.

use std::fmt;

use tracing::trace;

use crate::common::{NodeId, RowId};
use crate::index::btree::node::Node;
use crate::index::btree::{BPlusTree, TreeStats};

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    /// Split the full child at `index` of the internal node `parent`.
    ///
    /// - **Leaf (copy-up)**: the child keeps its first `degree` entries, the
    ///   new sibling takes the remaining `degree - 1`. The sibling's first key
    ///   is *copied* into the parent and the sibling is linked into the leaf
    ///   chain right after the child.
    /// - **Internal (push-up)**: the key at `degree - 1` is *moved* into the
    ///   parent. Both halves keep `degree - 1` keys and `degree` children.
    ///
    /// The separator lands at `parent.keys[index]`, the sibling at
    /// `parent.children[index + 1]`.
    pub(super) fn split_child(&mut self, parent: NodeId, index: usize) {
        let degree = self.degree();
        let child = self.arena.internal(parent).children[index];

        let (separator, sibling) = match self.arena.get_mut(child) {
            Node::Leaf(leaf) => {
                let mut sibling = leaf.split_off(degree);
                sibling.prev = Some(child);
                sibling.next = leaf.next;
                (sibling.keys[0].clone(), Node::Leaf(sibling))
            }
            Node::Internal(inner) => {
                let (separator, sibling) = inner.split_off(degree);
                (separator, Node::Internal(sibling))
            }
        };

        let is_leaf = sibling.is_leaf();
        let sibling = self.arena.alloc(sibling);

        if is_leaf {
            let old_next = self.arena.leaf_mut(child).next.replace(sibling);
            if let Some(next) = old_next {
                self.arena.leaf_mut(next).prev = Some(sibling);
            }
            TreeStats::bump(&self.stats.leaf_splits);
        } else {
            TreeStats::bump(&self.stats.internal_splits);
        }
        trace!(?separator, %child, %sibling, is_leaf, "split child");

        let parent = self.arena.internal_mut(parent);
        parent.keys.insert(index, separator);
        parent.children.insert(index + 1, sibling);
    }

    /// Insert into the subtree rooted at `node`, which must not be full.
    pub(super) fn insert_into(&mut self, node: NodeId, key: K, row: RowId) {
        let mut index = match self.arena.get_mut(node) {
            Node::Leaf(leaf) => {
                leaf.insert(key, row);
                return;
            }
            Node::Internal(inner) => inner.insert_route(&key),
        };

        let child = self.arena.internal(node).children[index];
        if self.arena.get(child).is_full(self.degree()) {
            self.split_child(node, index);
            if key > self.arena.internal(node).keys[index] {
                index += 1;
            }
        }

        let child = self.arena.internal(node).children[index];
        self.insert_into(child, key, row);
    }
}

#[cfg(test)]
mod tests {
    use crate::{BPlusTree, RowId};

    fn tree(degree: usize) -> BPlusTree<u32> {
        let mut tree = BPlusTree::new(degree).unwrap();
        tree.init_root();
        tree
    }

    #[test]
    fn test_leaf_split_copies_separator_up() {
        let mut t = tree(3);
        for k in [10, 20, 30, 40, 50] {
            t.insert(k, RowId::new(k as u64)).unwrap();
        }
        // Root leaf is full (5 keys); the next insert splits it first.
        t.insert(60, RowId::new(60)).unwrap();

        assert_eq!(t.root_keys(), vec![40]);
        assert_eq!(t.leaf_keys(), vec![vec![10, 20, 30], vec![40, 50, 60]]);
        // 40 is still present in the leaf.
        assert!(t.contains(&40));
    }

    #[test]
    fn test_split_links_sibling_between_neighbours() {
        let mut t = tree(2);
        for k in [10, 20, 30, 40, 50] {
            t.insert(k, RowId::new(k as u64)).unwrap();
        }
        // Leaves: [10,20] [30,40,50]; filling the left leaf forces a split
        // in the middle of the chain.
        t.insert(11, RowId::new(11)).unwrap();
        t.insert(12, RowId::new(12)).unwrap();

        assert_eq!(t.root_keys(), vec![20, 30]);
        assert_eq!(t.leaf_keys(), vec![vec![10, 11, 12], vec![20], vec![30, 40, 50]]);
        let forward: Vec<u32> = t.iter().map(|(k, _)| *k).collect();
        let mut backward: Vec<u32> = t.iter_rev().map(|(k, _)| *k).collect();
        backward.reverse();
        assert_eq!(forward, backward);
        t.validate().unwrap();
    }

    #[test]
    fn test_key_equal_to_new_separator_goes_left() {
        let mut t = tree(2);
        for k in [1, 2, 3, 4, 5] {
            t.insert(k, RowId::new(k as u64)).unwrap();
        }
        // Leaves [1,2] [3,4,5]; inserting 4 splits [3,4,5] into [3,4] [5]
        // with separator 5, and 4 < 5 stays left.
        t.insert(4, RowId::new(44)).unwrap();
        assert_eq!(t.leaf_keys(), vec![vec![1, 2], vec![3, 4, 4], vec![5]]);
        assert_eq!(t.get_all(&4), vec![RowId::new(4), RowId::new(44)]);
        t.validate().unwrap();
    }

    #[test]
    fn test_descending_inserts() {
        let mut t = tree(2);
        for k in (1..=20).rev() {
            t.insert(k, RowId::new(k as u64)).unwrap();
        }
        let keys: Vec<u32> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (1..=20).collect::<Vec<_>>());
        t.validate().unwrap();
    }
}
