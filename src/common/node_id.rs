//! Arena handle for tree nodes.

use std::fmt;

/// Handle to a slot in a tree's node arena.
///
/// A handle only means something to the arena that issued it. Freed slots
/// are reissued, so a handle held past a merge may later name another node.
/// Internal nodes keep handles as owning child edges and leaves keep them as
/// non-owning `prev` / `next` links; the handle itself carries no ownership.
///
/// # Example
/// ```
/// use leafchain::NodeId;
///
/// let node_id = NodeId::new(5);
/// assert_eq!(node_id.slot(), 5);
/// assert_eq!(node_id.to_string(), "Node(5)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn new(slot: usize) -> Self {
        NodeId(slot)
    }

    /// Index into the arena's slot vector.
    #[inline]
    pub fn slot(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}
