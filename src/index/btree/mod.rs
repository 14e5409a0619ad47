//! B+ tree index.
//!
//! # Components
//! - [`BPlusTree`] - The tree: root growth/shrink and the public API
//! - [`Removal`] - Outcome of a delete
//! - [`Iter`] / [`RevIter`] / [`Range`] - Leaf-chain iterators
//! - [`TreeStats`] - Structural event counters
//! - [`SharedBPlusTree`] - Tree-level reader/writer lock wrapper
//!
//! Node-level algorithms live next to the data they touch:
//! - `node` - Leaf/Internal sum type and capacity predicates
//! - `arena` - Slot storage addressed by [`NodeId`](crate::NodeId)
//! - `insert` - Pre-emptive splitting (copy-up for leaves, push-up above)
//! - `delete` - Separator repair, borrow from either side, merge
//! - `validate` - Invariant checker used by tests

mod arena;
mod delete;
mod insert;
mod iter;
mod node;
mod shared;
mod stats;
mod tree;
mod validate;

pub use delete::Removal;
pub use iter::{Iter, Range, RevIter};
pub use shared::SharedBPlusTree;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::BPlusTree;
