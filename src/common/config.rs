//! Configuration for the B+ tree index.

use crate::common::{Error, Result};

/// Smallest minimum degree that yields a valid tree.
///
/// With degree 2 every non-root node holds 1 to 3 keys (a 2-3-4 tree).
/// Degree 1 would allow empty non-root nodes and single-key full nodes,
/// which cannot be split into two non-empty halves.
pub const MIN_DEGREE: usize = 2;

/// Degree used by [`TreeConfig::default`].
pub const DEFAULT_DEGREE: usize = 2;

/// Construction-time parameters of a [`BPlusTree`](crate::BPlusTree).
///
/// # Example
/// ```
/// use leafchain::TreeConfig;
///
/// let config = TreeConfig::new(3);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_keys(), 5);
/// assert_eq!(config.min_keys(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Minimum branching factor. Fixed for the lifetime of a tree.
    pub degree: usize,
}

impl TreeConfig {
    /// Create a config with the given minimum degree.
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    /// Reject degrees below [`MIN_DEGREE`].
    pub fn validate(&self) -> Result<()> {
        if self.degree < MIN_DEGREE {
            return Err(Error::InvalidDegree {
                degree: self.degree,
                min: MIN_DEGREE,
            });
        }
        Ok(())
    }

    /// Key count at which a node is full (`2 * degree - 1`).
    #[inline]
    pub fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    /// Minimum key count of a non-root node (`degree - 1`).
    #[inline]
    pub fn min_keys(&self) -> usize {
        self.degree - 1
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEGREE)
    }
}
