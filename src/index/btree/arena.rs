//! Node arena - owned storage for every node of one tree.
//!
//! The tree is a strict out-tree: a parent owns its children and there are
//! no back-pointers. Ownership is expressed by storing every node in one
//! arena and linking them by [`NodeId`]. Child ids inside an internal node
//! are owning edges; a leaf's `next` id is a non-owning, order-only link.

use std::ops::{Index, IndexMut};

use crate::common::NodeId;
use crate::index::btree::node::Node;

/// Slot storage for nodes with a free list of released slots.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────┐
/// │                    NodeArena                      │
/// │  slots: [Some(n0)] [None] [Some(n2)] [Some(n3)]   │
/// │                      ▲                            │
/// │  free_list: ─────────┘   (LIFO, reused first)     │
/// └───────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<K> {
    /// One slot per id ever issued. `None` means released.
    slots: Vec<Option<Node<K>>>,

    /// Released slot ids (LIFO for cache locality).
    free_list: Vec<NodeId>,
}

impl<K> NodeArena<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store a node and return its id, reusing a released slot if possible.
    pub(crate) fn alloc(&mut self, node: Node<K>) -> NodeId {
        if let Some(node_id) = self.free_list.pop() {
            self.slots[node_id.0] = Some(node);
            return node_id;
        }

        let node_id = NodeId::new(self.slots.len());
        self.slots.push(Some(node));
        node_id
    }

    /// Remove a node from the arena and hand ownership to the caller.
    ///
    /// # Panics
    /// Panics if `node_id` is not live.
    pub(crate) fn release(&mut self, node_id: NodeId) -> Node<K> {
        match self.slots.get_mut(node_id.0).and_then(Option::take) {
            Some(node) => {
                self.free_list.push(node_id);
                node
            }
            None => panic!("release of dangling node {}", node_id),
        }
    }

    pub(crate) fn get(&self, node_id: NodeId) -> Option<&Node<K>> {
        self.slots.get(node_id.0).and_then(Option::as_ref)
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Drop every node and forget all ids.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }
}

impl<K> Default for NodeArena<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Index<NodeId> for NodeArena<K> {
    type Output = Node<K>;

    fn index(&self, node_id: NodeId) -> &Node<K> {
        self.get(node_id)
            .unwrap_or_else(|| panic!("dangling node {}", node_id))
    }
}

impl<K> IndexMut<NodeId> for NodeArena<K> {
    fn index_mut(&mut self, node_id: NodeId) -> &mut Node<K> {
        self.slots
            .get_mut(node_id.0)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("dangling node {}", node_id))
    }
}
