//! Deletion: remove at the leaf, repair on the way back up.
//!
//! The recursive delete returns a [`Removal`] describing what happened at the
//! leaf. Each ancestor uses it to refresh a stale separator and then restores
//! minimum occupancy of the child it descended into, in this order:
//! 1. borrow a key from the left sibling
//! 2. borrow a key from the right sibling
//! 3. merge with a sibling (right if there is one, otherwise left)

use std::fmt;

use tracing::{info, trace};

use crate::common::{NodeId, RowId};
use crate::index::btree::node::Node;
use crate::index::btree::{BPlusTree, TreeStats};

/// Outcome of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal<K> {
    /// No entry with the key was found. The tree is unchanged.
    NotFound,

    /// One entry was removed.
    Removed {
        /// The removed key.
        key: K,
        /// The row that was stored with it.
        row: RowId,
        /// Key now at the removed entry's position in the leaf chain: the
        /// next key in the same leaf, else the first key of the next leaf,
        /// else `None` (the removed key was the maximum).
        boundary: Option<K>,
    },
}

impl<K> Removal<K> {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Removal::Removed { .. })
    }

    pub fn removed_key(&self) -> Option<&K> {
        match self {
            Removal::Removed { key, .. } => Some(key),
            Removal::NotFound => None,
        }
    }

    pub fn row(&self) -> Option<RowId> {
        match self {
            Removal::Removed { row, .. } => Some(*row),
            Removal::NotFound => None,
        }
    }

    pub fn boundary(&self) -> Option<&K> {
        match self {
            Removal::Removed { boundary, .. } => boundary.as_ref(),
            Removal::NotFound => None,
        }
    }
}

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    /// Delete `key` from the subtree rooted at `node`.
    pub(super) fn delete_from(&mut self, node: NodeId, key: &K) -> Removal<K> {
        let index = match self.arena.get(node) {
            Node::Leaf(_) => return self.delete_from_leaf(node, key),
            Node::Internal(inner) => inner.delete_route(key),
        };

        let child = self.arena.internal(node).children[index];
        let removal = self.delete_from(child, key);
        self.repair_child(node, index, &removal);
        removal
    }

    fn delete_from_leaf(&mut self, node: NodeId, key: &K) -> Removal<K> {
        let leaf = self.arena.leaf_mut(node);
        let Some((pos, removed, row)) = leaf.remove(key) else {
            info!(?key, "delete: key not found");
            TreeStats::bump(&self.stats.not_found);
            return Removal::NotFound;
        };

        let in_leaf = leaf.keys.get(pos).cloned();
        let next = leaf.next;
        let boundary =
            in_leaf.or_else(|| next.and_then(|id| self.arena.leaf(id).keys.first().cloned()));

        Removal::Removed {
            key: removed,
            row,
            boundary,
        }
    }

    /// Fix up `parent` after a delete descended into `children[index]`.
    ///
    /// First replaces a separator equal to the removed key with the boundary
    /// key, then rebalances the child if it fell below minimum occupancy.
    pub(super) fn repair_child(&mut self, parent: NodeId, index: usize, removal: &Removal<K>) {
        let degree = self.degree();

        if let Removal::Removed {
            key,
            boundary: Some(boundary),
            ..
        } = removal
        {
            let inner = self.arena.internal_mut(parent);
            if let Some(pos) = inner.keys.iter().position(|k| k == key) {
                inner.keys[pos] = boundary.clone();
            }
        }

        let inner = self.arena.internal(parent);
        let child = inner.children[index];
        if self.arena.get(child).is_enough(degree) {
            return;
        }

        let left = index.checked_sub(1).map(|i| inner.children[i]);
        let right = inner.children.get(index + 1).copied();

        if left.is_some_and(|id| self.arena.get(id).can_borrow(degree)) {
            self.borrow_from_left(parent, index);
        } else if right.is_some_and(|id| self.arena.get(id).can_borrow(degree)) {
            self.borrow_from_right(parent, index);
        } else if right.is_some() {
            self.merge_right_child(parent, index);
        } else {
            self.merge_right_child(parent, index - 1);
        }
    }

    /// Move one key from `children[index - 1]` into `children[index]`.
    ///
    /// Leaves relocate the entry directly. Internal nodes rotate through the
    /// parent: the separator descends, the lender's last key ascends, and
    /// the lender's last child moves across.
    pub(super) fn borrow_from_left(&mut self, parent: NodeId, index: usize) {
        let inner = self.arena.internal(parent);
        let lender_id = inner.children[index - 1];
        let child_id = inner.children[index];
        let parent_key = inner.keys[index - 1].clone();

        let separator = match self.arena.pair_mut(lender_id, child_id) {
            (Node::Leaf(lender), Node::Leaf(child)) => {
                let last = lender.keys.len() - 1;
                child.keys.insert(0, lender.keys.remove(last));
                child.rows.insert(0, lender.rows.remove(last));
                child.keys[0].clone()
            }
            (Node::Internal(lender), Node::Internal(child)) => {
                let last_child = lender.children.len() - 1;
                child.keys.insert(0, parent_key);
                child.children.insert(0, lender.children.remove(last_child));
                lender.keys.remove(lender.keys.len() - 1)
            }
            _ => unreachable!("{} and {} are at different depths", lender_id, child_id),
        };
        trace!(?separator, lender = %lender_id, child = %child_id, "borrow from left");

        self.arena.internal_mut(parent).keys[index - 1] = separator;
        TreeStats::bump(&self.stats.borrows_left);
    }

    /// Move one key from `children[index + 1]` into `children[index]`.
    pub(super) fn borrow_from_right(&mut self, parent: NodeId, index: usize) {
        let inner = self.arena.internal(parent);
        let child_id = inner.children[index];
        let lender_id = inner.children[index + 1];
        let parent_key = inner.keys[index].clone();

        let separator = match self.arena.pair_mut(child_id, lender_id) {
            (Node::Leaf(child), Node::Leaf(lender)) => {
                child.keys.push(lender.keys.remove(0));
                child.rows.push(lender.rows.remove(0));
                lender.keys[0].clone()
            }
            (Node::Internal(child), Node::Internal(lender)) => {
                child.keys.push(parent_key);
                child.children.push(lender.children.remove(0));
                lender.keys.remove(0)
            }
            _ => unreachable!("{} and {} are at different depths", child_id, lender_id),
        };
        trace!(?separator, lender = %lender_id, child = %child_id, "borrow from right");

        self.arena.internal_mut(parent).keys[index] = separator;
        TreeStats::bump(&self.stats.borrows_right);
    }

    /// Merge `children[index + 1]` into `children[index]` and free it.
    ///
    /// For leaves the separator is dropped and the chain is spliced around
    /// the freed leaf. For internal nodes the separator is pulled down
    /// between the two halves.
    pub(super) fn merge_right_child(&mut self, parent: NodeId, index: usize) {
        let inner = self.arena.internal_mut(parent);
        let right_id = inner.children.remove(index + 1);
        let separator = inner.keys.remove(index);
        let left_id = inner.children[index];

        let right = self.arena.free(right_id);
        let spliced_next = match (self.arena.get_mut(left_id), right) {
            (Node::Leaf(left), Node::Leaf(right)) => {
                left.next = right.next;
                left.keys.extend(right.keys);
                left.rows.extend(right.rows);
                left.next
            }
            (Node::Internal(left), Node::Internal(right)) => {
                left.keys.push(separator);
                left.keys.extend(right.keys);
                left.children.extend(right.children);
                None
            }
            _ => unreachable!("{} and {} are at different depths", left_id, right_id),
        };
        if let Some(next) = spliced_next {
            self.arena.leaf_mut(next).prev = Some(left_id);
        }

        trace!(left = %left_id, right = %right_id, "merge");
        TreeStats::bump(&self.stats.merges);
    }
}
