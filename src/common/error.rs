//! Error types for leafchain.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the index.
///
/// Deleting a key that is not present is deliberately *not* represented
/// here: it is an ordinary outcome reported through
/// [`Removal::NotFound`](crate::index::btree::Removal::NotFound).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested minimum degree cannot form a valid B+ tree.
    #[error("degree {degree} is below the minimum of {min}")]
    InvalidDegree { degree: usize, min: usize },

    /// A mutating operation was issued before `init_root`.
    #[error("tree has no root; call init_root first")]
    Uninitialized,

    /// A structural check found the tree in an inconsistent state.
    ///
    /// This indicates a bug in the rebalancing code, never bad input.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
