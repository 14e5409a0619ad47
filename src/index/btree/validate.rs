//! Structural invariant checks.
//!
//! Two levels:
//! - [`BPlusTree::validate_structure`]: shape only (balance, fanout,
//!   occupancy, leaf chain links, row parallelism, entry count, no leaked
//!   nodes). Independent of key values.
//! - [`BPlusTree::validate`]: structure plus ordering (sorted nodes, sorted
//!   leaf chain, separator bounds). Ordering is only checked while
//!   [`BPlusTree::is_ordered`] holds.

use std::fmt;

use crate::common::{Error, NodeId, Result};
use crate::index::btree::node::Node;
use crate::index::btree::BPlusTree;

fn violation(msg: String) -> Error {
    Error::InvariantViolation(msg)
}

/// Facts gathered during one structural walk.
struct Walk {
    /// Leaves in left-to-right tree order.
    leaves: Vec<NodeId>,
    leaf_depth: Option<usize>,
    nodes: usize,
    entries: usize,
}

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    /// Check every structural and ordering invariant.
    ///
    /// # Errors
    /// - `Error::Uninitialized` if `init_root` has not been called
    /// - `Error::InvariantViolation` describing the first broken invariant
    pub fn validate(&self) -> Result<()> {
        self.validate_structure()?;
        if self.ordered {
            self.validate_order()?;
        }
        Ok(())
    }

    /// Check shape invariants only.
    ///
    /// # Errors
    /// - `Error::Uninitialized` if `init_root` has not been called
    /// - `Error::InvariantViolation` describing the first broken invariant
    pub fn validate_structure(&self) -> Result<()> {
        let root = self.root.ok_or(Error::Uninitialized)?;
        let mut walk = Walk {
            leaves: Vec::new(),
            leaf_depth: None,
            nodes: 0,
            entries: 0,
        };
        self.walk(root, 0, &mut walk)?;

        if walk.nodes != self.arena.len() {
            return Err(violation(format!(
                "{} nodes reachable but {} allocated",
                walk.nodes,
                self.arena.len()
            )));
        }
        if walk.entries != self.len {
            return Err(violation(format!(
                "leaves hold {} entries, tree reports {}",
                walk.entries, self.len
            )));
        }
        self.check_chain(&walk.leaves)
    }

    fn walk(&self, id: NodeId, depth: usize, walk: &mut Walk) -> Result<()> {
        let config = self.config;
        let node = self.arena.get(id);
        let count = node.key_count();
        walk.nodes += 1;

        if count > config.max_keys() {
            return Err(violation(format!(
                "{} holds {} keys, max is {}",
                id,
                count,
                config.max_keys()
            )));
        }
        let is_root = Some(id) == self.root;
        if !is_root && count < config.min_keys() {
            return Err(violation(format!(
                "{} holds {} keys, min is {}",
                id,
                count,
                config.min_keys()
            )));
        }

        match node {
            Node::Leaf(leaf) => {
                if leaf.rows.len() != leaf.keys.len() {
                    return Err(violation(format!(
                        "{} has {} keys but {} rows",
                        id,
                        leaf.keys.len(),
                        leaf.rows.len()
                    )));
                }
                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(violation(format!(
                            "{} at depth {}, other leaves at depth {}",
                            id, depth, expected
                        )));
                    }
                    Some(_) => {}
                }
                walk.entries += count;
                walk.leaves.push(id);
            }
            Node::Internal(inner) => {
                if inner.children.len() != count + 1 {
                    return Err(violation(format!(
                        "{} has {} keys but {} children",
                        id,
                        count,
                        inner.children.len()
                    )));
                }
                if is_root && count == 0 {
                    return Err(violation(format!("internal root {} has no keys", id)));
                }
                for &child in &inner.children {
                    self.walk(child, depth + 1, walk)?;
                }
            }
        }
        Ok(())
    }

    /// The chain must list exactly `leaves`, in order, with symmetric links.
    fn check_chain(&self, leaves: &[NodeId]) -> Result<()> {
        for (i, &id) in leaves.iter().enumerate() {
            let leaf = self.arena.leaf(id);
            let expected_prev = i.checked_sub(1).map(|p| leaves[p]);
            let expected_next = leaves.get(i + 1).copied();

            if leaf.prev != expected_prev {
                return Err(violation(format!(
                    "{}.prev is {:?}, expected {:?}",
                    id, leaf.prev, expected_prev
                )));
            }
            if leaf.next != expected_next {
                return Err(violation(format!(
                    "{}.next is {:?}, expected {:?}",
                    id, leaf.next, expected_next
                )));
            }
        }
        Ok(())
    }

    fn validate_order(&self) -> Result<()> {
        let mut last: Option<&K> = None;
        for (key, _) in self.iter() {
            if last.is_some_and(|prev| prev > key) {
                return Err(violation(format!(
                    "leaf chain out of order: {:?} before {:?}",
                    last, key
                )));
            }
            last = Some(key);
        }

        match self.root {
            Some(root) => self.check_separators(root),
            None => Err(Error::Uninitialized),
        }
    }

    /// Every separator must satisfy `max(left) <= sep <= min(right)`.
    fn check_separators(&self, id: NodeId) -> Result<()> {
        let Node::Internal(inner) = self.arena.get(id) else {
            return Ok(());
        };

        if inner.keys.windows(2).any(|w| w[0] > w[1]) {
            return Err(violation(format!(
                "{} separators out of order: {:?}",
                id, inner.keys
            )));
        }
        for (i, separator) in inner.keys.iter().enumerate() {
            let left_max = self.subtree_max(inner.children[i]);
            let right_min = self.subtree_min(inner.children[i + 1]);
            if left_max.is_some_and(|k| k > separator) {
                return Err(violation(format!(
                    "{} separator {:?} below left subtree max {:?}",
                    id, separator, left_max
                )));
            }
            if right_min.is_some_and(|k| k < separator) {
                return Err(violation(format!(
                    "{} separator {:?} above right subtree min {:?}",
                    id, separator, right_min
                )));
            }
        }
        for &child in &inner.children {
            self.check_separators(child)?;
        }
        Ok(())
    }

    fn subtree_min(&self, mut id: NodeId) -> Option<&K> {
        loop {
            match self.arena.get(id) {
                Node::Internal(inner) => id = inner.children[0],
                Node::Leaf(leaf) => return leaf.keys.first(),
            }
        }
    }

    fn subtree_max(&self, mut id: NodeId) -> Option<&K> {
        loop {
            match self.arena.get(id) {
                Node::Internal(inner) => id = inner.children[inner.children.len() - 1],
                Node::Leaf(leaf) => return leaf.keys.last(),
            }
        }
    }
}
