//! Insertion engine - leaf insert, node split, and median promotion.

use tracing::{debug, trace};

use crate::common::config::max_keys;
use crate::common::{NodeId, Result};
use crate::index::btree::node::Node;
use crate::index::btree::{BPlusTree, TreeStats};

/// What a child reports to its parent after an insert.
#[derive(Debug)]
enum InsertSignal<K> {
    /// The key fit; nothing for the parent to do.
    Absorbed,

    /// The child split. `promoted` separates it from the new `right` sibling.
    Split { promoted: K, right: NodeId },
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Insert a key.
    ///
    /// # Errors
    /// - `Error::DuplicateKey` if the key is already present. The tree is
    ///   left untouched.
    pub fn insert(&mut self, key: K) -> Result<()> {
        let Some(root) = self.root else {
            let mut leaf = Node::new_leaf(self.order);
            leaf.insert_key_at(0, key);
            let leaf_id = self.arena.alloc(leaf);

            self.root = Some(leaf_id);
            self.refresh_first_leaf();
            self.len = 1;
            TreeStats::bump(&self.stats.inserts);
            debug!(root = %leaf_id, "created root leaf");
            return Ok(());
        };

        if let InsertSignal::Split { promoted, right } = self.push(root, key)? {
            let new_root = self
                .arena
                .alloc(Node::new_root(self.order, promoted, root, right));

            self.root = Some(new_root);
            self.refresh_first_leaf();
            TreeStats::bump(&self.stats.root_splits);
            debug!(root = %new_root, left = %root, right = %right, "root split");
        }

        self.len += 1;
        TreeStats::bump(&self.stats.inserts);
        Ok(())
    }

    /// Insert below `node_id`, splitting on the way back up as needed.
    fn push(&mut self, node_id: NodeId, key: K) -> Result<InsertSignal<K>> {
        if self.arena[node_id].is_leaf() {
            return self.push_into_leaf(node_id, key);
        }

        let child_index = self.arena[node_id].descent_index(&key);
        let child = self.arena[node_id].children()[child_index];

        match self.push(child, key)? {
            InsertSignal::Absorbed => Ok(InsertSignal::Absorbed),
            InsertSignal::Split { promoted, right } => {
                let node = &mut self.arena[node_id];
                node.insert_separator(child_index, promoted, right);

                if node.key_count() > max_keys(self.order) {
                    Ok(self.split_internal(node_id))
                } else {
                    Ok(InsertSignal::Absorbed)
                }
            }
        }
    }

    /// Insert into a leaf, splitting it if it overflows.
    ///
    /// A full leaf takes the key first, then the merged sequence is cut at
    /// `ceil(len / 2)`. The right half moves to a new leaf spliced into the
    /// chain right after this one, and its first key is copied up: leaf
    /// boundaries stay in the leaves.
    fn push_into_leaf(&mut self, leaf_id: NodeId, key: K) -> Result<InsertSignal<K>> {
        let order = self.order;
        let leaf = &mut self.arena[leaf_id];

        // Duplicates are rejected here, before anything changes.
        leaf.insert_key(key)?;

        if leaf.key_count() <= max_keys(order) {
            return Ok(InsertSignal::Absorbed);
        }

        let cut = (leaf.key_count() + 1) / 2;
        let mut right = Node::new_leaf(order);
        right.append_keys(leaf.split_keys_off(cut));
        right.set_next(leaf.next());

        let promoted = right.keys()[0].clone();
        let right_id = self.arena.alloc(right);
        self.arena[leaf_id].set_next(Some(right_id));

        TreeStats::bump(&self.stats.leaf_splits);
        trace!(leaf = %leaf_id, right = %right_id, cut, "leaf split");

        Ok(InsertSignal::Split {
            promoted,
            right: right_id,
        })
    }

    /// Split an internal node holding one key too many.
    ///
    /// With `m` keys the node keeps `floor(m / 2)`, the next key moves up to
    /// the parent (it is not kept in either half), and the rest go right
    /// together with their children.
    fn split_internal(&mut self, node_id: NodeId) -> InsertSignal<K> {
        let order = self.order;
        let mid = order / 2;

        let (promoted, right) = {
            let node = &mut self.arena[node_id];
            let right_keys = node.split_keys_off(mid + 1);
            let right_children = node.split_children_off(mid + 1);
            let promoted = node.remove_key_at(mid);

            let mut right = Node::new_internal(order);
            right.append_keys(right_keys);
            right.append_children(right_children);
            (promoted, right)
        };

        let right_id = self.arena.alloc(right);

        TreeStats::bump(&self.stats.internal_splits);
        trace!(node = %node_id, right = %right_id, mid, "internal split");

        InsertSignal::Split {
            promoted,
            right: right_id,
        }
    }
}
