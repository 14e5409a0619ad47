//! Index structures.
//!
//! - [`btree`] - In-memory B+ tree with a doubly linked leaf chain

pub mod btree;
