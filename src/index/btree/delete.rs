//! Deletion engine - leaf removal and underflow repair.
//!
//! After a child loses a key, its parent repairs any underflow using, in
//! order of preference:
//! 1. borrow from the left sibling
//! 2. borrow from the right sibling
//! 3. merge with a sibling (left if there is one)
//!
//! Repairs run top-down from the parent using the child index known from the
//! descent, so nodes never need a pointer to their parent.

use tracing::{debug, trace};

use crate::common::{Error, NodeId, Result};
use crate::index::btree::node::{Node, NodeKind};
use crate::index::btree::{BPlusTree, TreeStats};

/// What a child reports to its parent after a remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoveSignal {
    /// The child still meets its minimum.
    Balanced,

    /// The child dropped below its minimum and needs repair.
    Underflow,
}

impl RemoveSignal {
    fn of<K: Ord>(node: &Node<K>) -> Self {
        if node.is_underflow() {
            RemoveSignal::Underflow
        } else {
            RemoveSignal::Balanced
        }
    }
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Remove a key, returning it.
    ///
    /// # Errors
    /// - `Error::KeyNotFound` if the key is absent (or the tree is empty).
    ///   The tree is left untouched.
    pub fn remove(&mut self, key: &K) -> Result<K> {
        let root = self.root.ok_or(Error::KeyNotFound)?;

        // The root is exempt from the minimum, so its own signal is ignored.
        let (removed, _) = self.remove_key(root, key)?;

        self.len -= 1;
        TreeStats::bump(&self.stats.removes);

        let root_node = &self.arena[root];
        if root_node.is_empty() {
            if root_node.is_leaf() {
                self.arena.release(root);
                self.root = None;
                debug!("removed last key, tree is empty");
            } else {
                let only_child = root_node.children()[0];
                self.arena.release(root);
                self.root = Some(only_child);
                TreeStats::bump(&self.stats.root_collapses);
                debug!(old = %root, root = %only_child, "root collapsed");
            }
            self.refresh_first_leaf();
        }

        Ok(removed)
    }

    /// Remove `key` below `node_id`, repairing underflow on the way back up.
    fn remove_key(&mut self, node_id: NodeId, key: &K) -> Result<(K, RemoveSignal)> {
        if self.arena[node_id].is_leaf() {
            let leaf = &mut self.arena[node_id];
            let removed = leaf.remove_key(key).ok_or(Error::KeyNotFound)?;
            return Ok((removed, RemoveSignal::of(leaf)));
        }

        let (position, found) = self.arena[node_id].locate(key);
        let child_index = if found { position + 1 } else { position };
        let child = self.arena[node_id].children()[child_index];

        let (removed, signal) = self.remove_key(child, key)?;

        // A separator equal to the key is a copy of the key's leaf boundary,
        // and this is the only node holding it. Replace it with the new
        // minimum of the right subtree. An emptied leaf has none yet; the
        // repair below fixes or removes the separator in that case.
        if found {
            if let Some(successor) = self.subtree_min(child).cloned() {
                self.arena[node_id].set_key(position, successor);
            }
        }

        if signal == RemoveSignal::Underflow {
            self.fix_underflow(node_id, child_index);
        }

        Ok((removed, RemoveSignal::of(&self.arena[node_id])))
    }

    /// Repair the underflowing child at `index` of `parent_id`.
    fn fix_underflow(&mut self, parent_id: NodeId, index: usize) {
        let parent = &self.arena[parent_id];
        let left = index.checked_sub(1).and_then(|i| parent.child(i));
        let right = parent.child(index + 1);

        if let Some(left_id) = left {
            if self.arena[left_id].has_surplus() {
                self.borrow_from_left(parent_id, index);
                return;
            }
        }

        if let Some(right_id) = right {
            if self.arena[right_id].has_surplus() {
                self.borrow_from_right(parent_id, index);
                return;
            }
        }

        if left.is_some() {
            self.merge_children(parent_id, index - 1);
        } else if right.is_some() {
            self.merge_children(parent_id, index);
        }
    }

    /// Move the left sibling's last key into the front of child `index`.
    ///
    /// Leaves move a bare key and copy it up as the new separator. Internal
    /// nodes rotate: the separator comes down, the sibling's last key goes
    /// up, and the sibling's last child follows the separator.
    fn borrow_from_left(&mut self, parent_id: NodeId, index: usize) {
        let left_id = self.arena[parent_id].children()[index - 1];
        let node_id = self.arena[parent_id].children()[index];

        let left = &mut self.arena[left_id];
        let last = left.key_count() - 1;
        let moved_key = left.remove_key_at(last);

        if self.arena[node_id].is_leaf() {
            self.arena[node_id].insert_key_at(0, moved_key.clone());
            self.arena[parent_id].set_key(index - 1, moved_key);
        } else {
            let moved_child = self.arena[left_id].remove_child_at(last + 1);
            let separator = self.arena[parent_id].set_key(index - 1, moved_key);

            let node = &mut self.arena[node_id];
            node.insert_key_at(0, separator);
            node.insert_child_at(0, moved_child);
        }

        TreeStats::bump(&self.stats.borrows_left);
        trace!(parent = %parent_id, from = %left_id, to = %node_id, "borrowed from left sibling");
    }

    /// Move the right sibling's first key onto the end of child `index`.
    fn borrow_from_right(&mut self, parent_id: NodeId, index: usize) {
        let node_id = self.arena[parent_id].children()[index];
        let right_id = self.arena[parent_id].children()[index + 1];

        let moved_key = self.arena[right_id].remove_key_at(0);

        if self.arena[node_id].is_leaf() {
            let node = &mut self.arena[node_id];
            let end = node.key_count();
            node.insert_key_at(end, moved_key);

            // The sibling keeps at least one key: it had a surplus.
            if let Some(separator) = self.arena[right_id].first_key().cloned() {
                self.arena[parent_id].set_key(index, separator);
            }

            // If the child had been emptied its first key just changed.
            if index > 0 {
                if let Some(first) = self.arena[node_id].first_key().cloned() {
                    self.arena[parent_id].set_key(index - 1, first);
                }
            }
        } else {
            let moved_child = self.arena[right_id].remove_child_at(0);
            let separator = self.arena[parent_id].set_key(index, moved_key);

            let node = &mut self.arena[node_id];
            let end = node.key_count();
            node.insert_key_at(end, separator);
            node.insert_child_at(end + 1, moved_child);
        }

        TreeStats::bump(&self.stats.borrows_right);
        trace!(parent = %parent_id, from = %right_id, to = %node_id, "borrowed from right sibling");
    }

    /// Fold child `left_index + 1` into child `left_index`.
    ///
    /// The separator between them is dropped for leaves (the right leaf's
    /// keys already carry the boundary) and pulled down for internal nodes.
    /// The absorbed node is released; the survivor is always the left one,
    /// so the leftmost leaf never moves.
    fn merge_children(&mut self, parent_id: NodeId, left_index: usize) {
        let parent = &mut self.arena[parent_id];
        let left_id = parent.children()[left_index];
        let right_id = parent.remove_child_at(left_index + 1);
        let separator = parent.remove_key_at(left_index);

        let (keys, kind) = self.arena.release(right_id).into_parts();
        let left = &mut self.arena[left_id];

        match kind {
            NodeKind::Leaf { next } => {
                left.append_keys(keys);
                left.set_next(next);
            }
            NodeKind::Internal { children } => {
                let end = left.key_count();
                left.insert_key_at(end, separator);
                left.append_keys(keys);
                left.append_children(children);
            }
        }

        TreeStats::bump(&self.stats.merges);
        trace!(parent = %parent_id, into = %left_id, absorbed = %right_id, "merged siblings");
    }
}
