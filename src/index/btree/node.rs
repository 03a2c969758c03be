//! B+Tree node - a fixed-capacity container of ordered keys.
//!
//! A [`Node`] is either a leaf (keys plus a link to the next leaf) or an
//! internal node (separator keys plus one more child id than keys).
//!
//! Node methods are purely local: they shift keys and children around inside
//! one node and never recurse or rebalance. The engines in `insert` and
//! `delete` decide when and where to call them.

use std::fmt;
use std::mem;

use crate::common::config::{max_keys, min_internal_keys, min_leaf_keys};
use crate::common::{Error, NodeId, Result};

/// What distinguishes a leaf from an internal node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A leaf with a non-owning link to the next leaf in key order.
    Leaf { next: Option<NodeId> },

    /// An internal node. `children.len() == keys.len() + 1` once populated.
    Internal { children: Vec<NodeId> },
}

/// A B+Tree node.
///
/// # Layout
/// ```text
/// Internal:      [ k0 | k1 | k2 ]
///               /    |    |     \
///             c0    c1    c2    c3        c[i] < k[i] <= c[i+1]
///
/// Leaf:          [ k0 | k1 | k2 ] ──next──▶ [ ... ]
/// ```
#[derive(Debug, Clone)]
pub struct Node<K> {
    /// Keys in strictly ascending order.
    keys: Vec<K>,

    /// Leaf link or child ids.
    kind: NodeKind,

    /// Order of the owning tree (fixed at construction).
    order: usize,
}

impl<K: Ord> Node<K> {
    /// Create an empty leaf with no successor.
    pub(crate) fn new_leaf(order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(max_keys(order) + 1),
            kind: NodeKind::Leaf { next: None },
            order,
        }
    }

    /// Create an empty internal node.
    pub(crate) fn new_internal(order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(max_keys(order) + 1),
            kind: NodeKind::Internal {
                children: Vec::with_capacity(order + 1),
            },
            order,
        }
    }

    /// Create an internal node with one separator and two children.
    ///
    /// This is the shape of a freshly grown root.
    pub(crate) fn new_root(order: usize, separator: K, left: NodeId, right: NodeId) -> Self {
        let mut node = Self::new_internal(order);
        node.keys.push(separator);
        node.children_mut().extend([left, right]);
        node
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Is this a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// The order this node was built with.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of keys currently stored.
    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of children. Always 0 for a leaf.
    #[inline]
    pub fn child_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { .. } => 0,
            NodeKind::Internal { children } => children.len(),
        }
    }

    /// No room for another key without splitting.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.keys.len() >= max_keys(self.order)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Minimum key count for this node when it is not the root.
    #[inline]
    pub fn min_keys(&self) -> usize {
        if self.is_leaf() {
            min_leaf_keys(self.order)
        } else {
            min_internal_keys(self.order)
        }
    }

    /// Holds fewer keys than a non-root node may.
    #[inline]
    pub fn is_underflow(&self) -> bool {
        self.keys.len() < self.min_keys()
    }

    /// Can give a key away and still meet its minimum.
    #[inline]
    pub fn has_surplus(&self) -> bool {
        self.keys.len() > self.min_keys()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// All keys, ascending.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Key at `index`, if any.
    #[inline]
    pub fn key(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    #[inline]
    pub fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    #[inline]
    pub fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }

    /// Child ids. Empty for a leaf.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf { .. } => &[],
            NodeKind::Internal { children } => children,
        }
    }

    /// Child id at `index`, if any.
    #[inline]
    pub fn child(&self, index: usize) -> Option<NodeId> {
        self.children().get(index).copied()
    }

    /// Next leaf in key order. Always `None` for an internal node.
    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Leaf { next } => next,
            NodeKind::Internal { .. } => None,
        }
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Find the first index whose key is `>= key`, and whether it is an
    /// exact match.
    ///
    /// In a leaf the index is the insertion point. In an internal node see
    /// [`descent_index`](Self::descent_index).
    #[inline]
    pub fn locate(&self, key: &K) -> (usize, bool) {
        match self.keys.binary_search(key) {
            Ok(index) => (index, true),
            Err(index) => (index, false),
        }
    }

    /// Child index to descend into when looking for `key`.
    ///
    /// A separator equal to `key` routes right: leaves are authoritative and
    /// a separator is always the first key of its right subtree.
    #[inline]
    pub fn descent_index(&self, key: &K) -> usize {
        match self.locate(key) {
            (index, true) => index + 1,
            (index, false) => index,
        }
    }

    // ========================================================================
    // Key mutation
    // ========================================================================

    /// Insert `key` at its ordered position. Returns that position.
    ///
    /// # Errors
    /// - `Error::DuplicateKey` if the key is already in this node
    pub(crate) fn insert_key(&mut self, key: K) -> Result<usize> {
        match self.locate(&key) {
            (_, true) => Err(Error::DuplicateKey),
            (index, false) => {
                self.keys.insert(index, key);
                Ok(index)
            }
        }
    }

    /// Insert `key` at an explicit position. The caller keeps the order.
    pub(crate) fn insert_key_at(&mut self, index: usize, key: K) {
        debug_assert!(index == 0 || self.keys[index - 1] < key);
        debug_assert!(index == self.keys.len() || key < self.keys[index]);
        self.keys.insert(index, key);
    }

    /// Replace the key at `index`, returning the old one.
    pub(crate) fn set_key(&mut self, index: usize, key: K) -> K {
        mem::replace(&mut self.keys[index], key)
    }

    /// Remove `key` if present.
    pub(crate) fn remove_key(&mut self, key: &K) -> Option<K> {
        match self.locate(key) {
            (index, true) => Some(self.keys.remove(index)),
            (_, false) => None,
        }
    }

    pub(crate) fn remove_key_at(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    /// Move the keys from `at` onward out of this node.
    pub(crate) fn split_keys_off(&mut self, at: usize) -> Vec<K> {
        self.keys.split_off(at)
    }

    pub(crate) fn append_keys(&mut self, keys: Vec<K>) {
        debug_assert!(match (self.keys.last(), keys.first()) {
            (Some(last), Some(first)) => last < first,
            _ => true,
        });
        self.keys.extend(keys);
    }

    // ========================================================================
    // Child mutation (internal nodes only)
    // ========================================================================

    /// Insert a separator and the child to its right.
    ///
    /// Used when a child at `index` split: `key` becomes separator `index`
    /// and `right` becomes child `index + 1`.
    pub(crate) fn insert_separator(&mut self, index: usize, key: K, right: NodeId) {
        self.insert_key_at(index, key);
        self.children_mut().insert(index + 1, right);
    }

    pub(crate) fn insert_child_at(&mut self, index: usize, child: NodeId) {
        self.children_mut().insert(index, child);
    }

    pub(crate) fn remove_child_at(&mut self, index: usize) -> NodeId {
        self.children_mut().remove(index)
    }

    /// Move the children from `at` onward out of this node.
    pub(crate) fn split_children_off(&mut self, at: usize) -> Vec<NodeId> {
        self.children_mut().split_off(at)
    }

    pub(crate) fn append_children(&mut self, children: Vec<NodeId>) {
        self.children_mut().extend(children);
    }

    /// Consume the node, returning its keys and children.
    pub(crate) fn into_parts(self) -> (Vec<K>, NodeKind) {
        (self.keys, self.kind)
    }

    fn children_mut(&mut self) -> &mut Vec<NodeId> {
        match &mut self.kind {
            NodeKind::Internal { children } => children,
            NodeKind::Leaf { .. } => panic!("child operation on a leaf node"),
        }
    }

    // ========================================================================
    // Leaf chain
    // ========================================================================

    /// Point this leaf at a new successor. Ignored on internal nodes.
    pub(crate) fn set_next(&mut self, successor: Option<NodeId>) {
        if let NodeKind::Leaf { next } = &mut self.kind {
            *next = successor;
        }
    }
}

impl<K: fmt::Debug> fmt::Display for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            NodeKind::Leaf { .. } => "Leaf",
            NodeKind::Internal { .. } => "Internal",
        };

        write!(f, "{}[", label)?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", key)?;
        }
        write!(f, "]")?;

        if let NodeKind::Leaf { next: Some(next) } = self.kind {
            write!(f, " -> {}", next)?;
        }
        Ok(())
    }
}
