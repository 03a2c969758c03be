//! Structural dump of a tree, level by level.
//!
//! ```text
//! Node    Keys            Parent  Children        Type
//! 02      (20)            --      [00, 01]        INTERNAL
//! 00      (5, 10)         [02]    [--]            LEAF
//! 01      (20)            [02]    [--]            LEAF
//!
//! ======================================================================
//! LEAF CHAIN:
//! ======================================================================
//! [00] -> [01]
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::common::NodeId;
use crate::index::btree::BPlusTree;

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    fn write_table(&self, f: &mut fmt::Formatter<'_>, root: NodeId) -> fmt::Result {
        writeln!(
            f,
            "{:<7} {:<15} {:<7} {:<15} {:<8}",
            "Node", "Keys", "Parent", "Children", "Type"
        )?;

        let mut queue: VecDeque<(NodeId, Option<NodeId>)> = VecDeque::new();
        queue.push_back((root, None));

        while let Some((node_id, parent)) = queue.pop_front() {
            let node = &self.arena[node_id];

            let keys = node
                .keys()
                .iter()
                .map(|k| format!("{:?}", k))
                .collect::<Vec<_>>()
                .join(", ");

            let parent = match parent {
                Some(parent) => format!("[{}]", parent),
                None => "--".to_string(),
            };

            let children = if node.is_leaf() {
                "[--]".to_string()
            } else {
                let ids = node
                    .children()
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", ids)
            };

            for &child in node.children() {
                queue.push_back((child, Some(node_id)));
            }

            let kind = if node.is_leaf() { "LEAF" } else { "INTERNAL" };

            writeln!(
                f,
                "{:<7} {:<15} {:<7} {:<15} {:<8}",
                node_id.to_string(),
                format!("({})", keys),
                parent,
                children,
                kind
            )?;
        }

        Ok(())
    }

    fn write_leaf_chain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "LEAF CHAIN:")?;
        writeln!(f, "{}", rule)?;

        let mut links = Vec::new();
        let mut current = self.first_leaf.or_else(|| self.leftmost_leaf());
        while let Some(leaf_id) = current {
            links.push(format!("[{}]", leaf_id));
            current = self.arena[leaf_id].next();
        }
        writeln!(f, "{}", links.join(" -> "))
    }
}

impl<K: Ord + Clone + fmt::Debug> fmt::Display for BPlusTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            None => write!(f, "B+Tree is empty"),
            Some(root) => {
                self.write_table(f, root)?;
                self.write_leaf_chain(f)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_empty() {
        let tree = BPlusTree::<i32>::new(3).unwrap();
        assert_eq!(tree.to_string(), "B+Tree is empty");
    }

    #[test]
    fn test_display_two_levels() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in [10, 20, 5] {
            tree.insert(key).unwrap();
        }

        let out = tree.to_string();
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("Node"));
        // root first, then its leaves left to right
        assert!(lines[1].starts_with("02"));
        assert!(lines[1].contains("(20)"));
        assert!(lines[1].contains("[00, 01]"));
        assert!(lines[1].contains("INTERNAL"));
        assert!(lines[2].contains("(5, 10)"));
        assert!(lines[2].contains("[02]"));
        assert!(lines[2].contains("LEAF"));
        assert!(lines[3].contains("(20)"));

        assert!(out.contains("LEAF CHAIN:"));
        assert!(out.ends_with("[00] -> [01]\n"));
    }
}
