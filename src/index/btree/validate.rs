//! Invariant checker.
//!
//! Walks the whole tree and reports the first broken invariant as
//! `Error::Corruption`. O(n); meant for tests and debugging.

use std::fmt::Debug;

use crate::common::config::max_keys;
use crate::common::{Error, NodeId, Result};
use crate::index::btree::BPlusTree;

/// Facts gathered while walking the tree.
#[derive(Default)]
struct Walk {
    /// Leaves in left-to-right order.
    leaves: Vec<NodeId>,
    leaf_depth: Option<usize>,
    nodes: usize,
    keys: usize,
}

fn corruption(message: String) -> Error {
    Error::Corruption(message)
}

impl<K: Ord + Clone + Debug> BPlusTree<K> {
    /// Verify every structural invariant.
    ///
    /// # Checks
    /// - Keys strictly ascending inside each node, within the bounds set by
    ///   the ancestors' separators
    /// - At most `m - 1` keys per node; non-root nodes at or above minimum
    /// - Internal nodes have exactly one more child than keys
    /// - All leaves at the same depth
    /// - Each separator equals the smallest key of the subtree to its right
    /// - The leaf chain visits exactly the leaves, in order, from the cached
    ///   leftmost leaf
    /// - Key count and node count match what is reachable
    ///
    /// # Errors
    /// - `Error::Corruption` describing the first violation found
    pub fn check_invariants(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.len != 0 || self.first_leaf.is_some() || self.arena.len() != 0 {
                return Err(corruption(format!(
                    "empty tree with len {}, first leaf {:?}, {} live nodes",
                    self.len,
                    self.first_leaf,
                    self.arena.len()
                )));
            }
            return Ok(());
        };

        let mut walk = Walk::default();
        self.check_node(root, 0, None, None, &mut walk)?;

        if walk.keys != self.len {
            return Err(corruption(format!(
                "len is {} but leaves hold {} keys",
                self.len, walk.keys
            )));
        }

        if walk.nodes != self.arena.len() {
            return Err(corruption(format!(
                "{} nodes reachable but {} allocated",
                walk.nodes,
                self.arena.len()
            )));
        }

        self.check_leaf_chain(&walk.leaves)
    }

    fn check_node(
        &self,
        node_id: NodeId,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        walk: &mut Walk,
    ) -> Result<()> {
        let node = self
            .arena
            .get(node_id)
            .ok_or_else(|| corruption(format!("dangling node {}", node_id)))?;
        walk.nodes += 1;

        let keys = node.keys();
        let is_root = depth == 0;

        if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(corruption(format!(
                "node {} keys out of order: {:?} before {:?}",
                node_id, pair[0], pair[1]
            )));
        }

        if keys.len() > max_keys(self.order) {
            return Err(corruption(format!(
                "node {} holds {} keys, max is {}",
                node_id,
                keys.len(),
                max_keys(self.order)
            )));
        }

        if is_root && keys.is_empty() {
            return Err(corruption(format!("root {} has no keys", node_id)));
        }

        if !is_root && node.is_underflow() {
            return Err(corruption(format!(
                "node {} holds {} keys, min is {}",
                node_id,
                keys.len(),
                node.min_keys()
            )));
        }

        if let (Some(lower), Some(first)) = (lower, keys.first()) {
            if first < lower {
                return Err(corruption(format!(
                    "node {} key {:?} below separator {:?}",
                    node_id, first, lower
                )));
            }
        }

        if let (Some(upper), Some(last)) = (upper, keys.last()) {
            if last >= upper {
                return Err(corruption(format!(
                    "node {} key {:?} not below separator {:?}",
                    node_id, last, upper
                )));
            }
        }

        if node.is_leaf() {
            match walk.leaf_depth {
                None => walk.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(corruption(format!(
                        "leaf {} at depth {}, other leaves at depth {}",
                        node_id, depth, expected
                    )));
                }
                Some(_) => {}
            }
            walk.leaves.push(node_id);
            walk.keys += keys.len();
            return Ok(());
        }

        let children = node.children();
        if children.len() != keys.len() + 1 {
            return Err(corruption(format!(
                "node {} has {} keys but {} children",
                node_id,
                keys.len(),
                children.len()
            )));
        }

        for (i, &child) in children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(&keys[i - 1]) };
            let child_upper = if i == keys.len() { upper } else { Some(&keys[i]) };
            self.check_node(child, depth + 1, child_lower, child_upper, walk)?;

            if i > 0 {
                let separator = &keys[i - 1];
                let min = self.subtree_min(child);
                if min != Some(separator) {
                    return Err(corruption(format!(
                        "node {} separator {:?} but right subtree starts at {:?}",
                        node_id, separator, min
                    )));
                }
            }
        }

        Ok(())
    }

    fn check_leaf_chain(&self, leaves: &[NodeId]) -> Result<()> {
        let leftmost = self.leftmost_leaf();
        if self.first_leaf != leftmost {
            return Err(corruption(format!(
                "cached first leaf {:?}, leftmost leaf {:?}",
                self.first_leaf, leftmost
            )));
        }

        let mut chain = Vec::with_capacity(leaves.len());
        let mut current = self.first_leaf;
        while let Some(leaf_id) = current {
            if chain.len() > leaves.len() {
                return Err(corruption("leaf chain longer than the leaf level".into()));
            }
            chain.push(leaf_id);
            current = self
                .arena
                .get(leaf_id)
                .ok_or_else(|| corruption(format!("leaf chain reaches dangling node {}", leaf_id)))?
                .next();
        }

        if chain != leaves {
            return Err(corruption(format!(
                "leaf chain {:?} does not match leaf level {:?}",
                chain, leaves
            )));
        }

        Ok(())
    }
}
