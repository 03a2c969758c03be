//! Node identifier type.

use std::fmt;

/// Identifies a node slot in a tree's node arena.
///
/// Using `usize` because:
/// 1. Nodes are stored in `Vec<Option<Node>>`
/// 2. Direct indexing without casting: `slots[node_id.0]`
///
/// Ids are only meaningful for the tree that issued them, and a freed slot's
/// id is handed out again by the next allocation.
///
/// # Example
/// ```
/// use bplusdb::NodeId;
///
/// let node_id = NodeId::new(5);
/// assert_eq!(node_id.0, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}
