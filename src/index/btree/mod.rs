//! B+Tree index implementation.
//!
//! An order-parameterized B+Tree held in memory but shaped like its on-disk
//! counterpart: every key lives in a leaf, internal nodes only route, all
//! leaves sit at the same depth, and leaves are chained left to right for
//! sequential scans.
//!
//! # Components
//! - [`Node`] - Leaf or internal node with local, non-recursive operations
//! - `arena` - Owned node storage addressed by [`NodeId`](crate::NodeId)
//! - `search` - Root-to-leaf descent for lookups
//! - `insert` - Leaf insert, split, and median promotion
//! - `delete` - Leaf removal and underflow repair (borrow or merge)
//! - `range` - Leaf chain walks: [`Iter`], [`Range`], range queries
//! - [`TreeStats`] - Structural operation counters
//! - [`SharedBPlusTree`] - Lock-wrapped handle for multi-threaded callers
//!
//! # Protocol
//! Every mutation enters at the root, recurses to a leaf, edits it, and
//! returns a signal (`Split` on insert, `Underflow` on delete) that each
//! ancestor handles on the way back up. All node edits for one call finish
//! before it returns, so no caller ever sees a half-split or half-merged
//! tree.

mod arena;
mod delete;
mod display;
mod insert;
mod node;
mod range;
mod search;
mod shared;
mod stats;
mod validate;

pub use node::{Node, NodeKind};
pub use range::{Iter, Range};
pub use shared::SharedBPlusTree;
pub use stats::{StatsSnapshot, TreeStats};

use tracing::debug;

use crate::common::config::{DEFAULT_ORDER, MIN_ORDER};
use crate::common::{Error, NodeId, Result};
use arena::NodeArena;

/// An order-`m` B+Tree of unique keys.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                        BPlusTree                         │
/// │   root ──▶ [ 20 ]                                        │
/// │           /      \                                       │
/// │   [ 5 | 10 ]    [ 20 | 30 ]                              │
/// │        ▲   ──next──▶                                     │
/// │   first_leaf                                             │
/// │                                                          │
/// │   arena: every node, owned; ids link parents to children │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// # Capacity
/// - Every node holds at most `m - 1` keys; internal nodes hold one more
///   child than keys
/// - Non-root leaves keep at least `floor((m - 1) / 2)` keys
/// - Non-root internal nodes keep at least `ceil(m / 2) - 1` keys
///
/// # Thread Safety
/// Not synchronized. Reads take `&self` and mutations `&mut self`, so the
/// borrow checker enforces the single-writer rule within one thread. Wrap it
/// in [`SharedBPlusTree`] to share across threads.
///
/// # Usage
/// ```
/// use bplusdb::BPlusTree;
///
/// let mut tree = BPlusTree::new(3).unwrap();
/// for key in [10, 20, 5, 30, 15] {
///     tree.insert(key).unwrap();
/// }
///
/// assert!(tree.search(&15));
/// assert_eq!(tree.search_range(&6, &20), vec![10, 15, 20]);
///
/// tree.remove(&10).unwrap();
/// assert_eq!(tree.all_keys(), vec![5, 15, 20, 30]);
/// ```
#[derive(Debug)]
pub struct BPlusTree<K> {
    /// Owns every node of the tree.
    pub(crate) arena: NodeArena<K>,

    /// Root node, or `None` for an empty tree.
    pub(crate) root: Option<NodeId>,

    /// Leftmost leaf, start of the leaf chain.
    pub(crate) first_leaf: Option<NodeId>,

    /// Fan-out, fixed at construction.
    pub(crate) order: usize,

    /// Number of keys stored.
    pub(crate) len: usize,

    /// Operation counters.
    pub(crate) stats: TreeStats,
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Create an empty tree of the given order.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < 3`
    pub fn new(order: usize) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(Error::InvalidOrder {
                order,
                min: MIN_ORDER,
            });
        }

        debug!(order, "created B+Tree");

        Ok(Self {
            arena: NodeArena::new(),
            root: None,
            first_leaf: None,
            order,
            len: 0,
            stats: TreeStats::new(),
        })
    }

    // ========================================================================
    // Public API: Shape and size
    // ========================================================================

    /// The order (maximum children per internal node).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels: 0 for an empty tree, 1 for a lone root leaf.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(node_id) = current {
            height += 1;
            current = self.arena[node_id].child(0);
        }
        height
    }

    /// Number of nodes currently allocated.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    // ========================================================================
    // Public API: Structure inspection
    // ========================================================================

    /// Id of the root node.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Id of the leftmost leaf, where the leaf chain starts.
    pub fn first_leaf(&self) -> Option<NodeId> {
        self.first_leaf
    }

    /// Read-only view of a node.
    ///
    /// Ids are invalidated by later mutations: a merge or collapse releases
    /// nodes and a split may reuse their slots.
    pub fn node(&self, node_id: NodeId) -> Option<&Node<K>> {
        self.arena.get(node_id)
    }

    /// Operation counters.
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    // ========================================================================
    // Public API: Bulk
    // ========================================================================

    /// Remove every key. Counters are kept.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.first_leaf = None;
        self.len = 0;
        debug!("cleared B+Tree");
    }

    // ========================================================================
    // Internal: Root bookkeeping
    // ========================================================================

    /// Descend along first children to the leftmost leaf.
    pub(crate) fn leftmost_leaf(&self) -> Option<NodeId> {
        let mut node_id = self.root?;
        while let Some(child) = self.arena[node_id].child(0) {
            node_id = child;
        }
        Some(node_id)
    }

    /// Recompute the cached leftmost leaf. Called on every root change.
    pub(crate) fn refresh_first_leaf(&mut self) {
        self.first_leaf = self.leftmost_leaf();
    }
}

impl<K: Ord + Clone> Default for BPlusTree<K> {
    fn default() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            first_leaf: None,
            order: DEFAULT_ORDER,
            len: 0,
            stats: TreeStats::new(),
        }
    }
}
