//! leafchain - an in-memory B+ tree index.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           leafchain                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │        SharedBPlusTree (optional, parking_lot RwLock)    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                   BPlusTree (index/btree)                │   │
//! │  │    init_root · insert · delete · get · range · validate  │   │
//! │  │        root growth (split_root) / shrink (collapse)      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 NodeArena: Vec<Option<Node>>             │   │
//! │  │   Internal { keys, children }   Leaf { keys, rows }      │   │
//! │  │             Leaf ⇄ Leaf ⇄ Leaf  (prev / next)            │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are opaque [`RowId`]s owned by an external record store. The index
//! stores and returns them but never interprets them.
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, RowId, Error, config)
//! - [`index`] - The B+ tree
//!
//! # Quick Start
//! ```
//! use leafchain::{BPlusTree, RowId};
//!
//! let mut tree = BPlusTree::new(2).unwrap();
//! tree.init_root();
//! for i in 1..=9u32 {
//!     tree.insert(i, RowId::new(i as u64)).unwrap();
//! }
//!
//! assert_eq!(
//!     tree.leaf_keys(),
//!     vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8, 9]]
//! );
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_DEGREE, MIN_DEGREE};
pub use common::{Error, NodeId, Result, RowId, TreeConfig};

pub use index::btree::{
    BPlusTree, Iter, Range, Removal, RevIter, SharedBPlusTree, StatsSnapshot, TreeStats,
};
