//! Row identifier type.

use std::fmt;

/// An opaque reference to a record held by an external store.
///
/// The index only stores and returns these; it never dereferences them.
///
/// # Example
/// ```
/// use leafchain::RowId;
///
/// let row = RowId::new(42);
/// assert_eq!(row.0, 42);
/// assert_eq!(RowId::from(42u64), row);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

impl RowId {
    /// Create a new RowId.
    #[inline]
    pub fn new(id: u64) -> Self {
        RowId(id)
    }
}

impl From<u64> for RowId {
    fn from(id: u64) -> Self {
        RowId(id)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row({})", self.0)
    }
}
