//! Search engine - root-to-leaf descent.

use crate::common::NodeId;
use crate::index::btree::{BPlusTree, TreeStats};

impl<K: Ord + Clone> BPlusTree<K> {
    /// Is `key` in the tree?
    pub fn search(&self, key: &K) -> bool {
        TreeStats::bump(&self.stats.lookups);

        match self.search_leaf(key) {
            Some(leaf_id) => self.arena[leaf_id].locate(key).1,
            None => false,
        }
    }

    /// Find the leaf that holds `key` or would hold it.
    ///
    /// Returns `None` only for an empty tree. The leaf's contents are not
    /// examined.
    pub fn search_leaf(&self, key: &K) -> Option<NodeId> {
        let mut node_id = self.root?;

        loop {
            let node = &self.arena[node_id];
            if node.is_leaf() {
                return Some(node_id);
            }
            node_id = node.children()[node.descent_index(key)];
        }
    }

    /// Smallest key in the tree.
    pub fn first(&self) -> Option<&K> {
        let leaf_id = self.first_leaf.or_else(|| self.leftmost_leaf())?;
        self.arena[leaf_id].first_key()
    }

    /// Largest key in the tree.
    pub fn last(&self) -> Option<&K> {
        let mut node_id = self.root?;
        loop {
            let node = &self.arena[node_id];
            match node.children().last() {
                Some(&child) => node_id = child,
                None => return node.last_key(),
            }
        }
    }

    /// Smallest key in the subtree rooted at `node_id`.
    pub(crate) fn subtree_min(&self, node_id: NodeId) -> Option<&K> {
        let mut node = &self.arena[node_id];
        while let Some(child) = node.child(0) {
            node = &self.arena[child];
        }
        node.first_key()
    }
}
