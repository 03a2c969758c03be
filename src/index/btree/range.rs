//! Range and iteration - walks along the leaf chain.
//!
//! Every scan locates its starting leaf once and then only follows `next`
//! links, so a scan over `k` keys visits `O(log n + k / m)` nodes.

use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use crate::common::{Error, NodeId, Result};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::{BPlusTree, TreeStats};

/// Ascending iterator over every key of a [`BPlusTree`].
///
/// Created by [`BPlusTree::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K> {
    arena: &'a NodeArena<K>,
    leaf: Option<NodeId>,
    index: usize,
    remaining: usize,
}

impl<'a, K: Ord> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let arena = self.arena;
        loop {
            let leaf = &arena[self.leaf?];
            if let Some(key) = leaf.key(self.index) {
                self.index += 1;
                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }
            self.leaf = leaf.next();
            self.index = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ord> ExactSizeIterator for Iter<'_, K> {}

impl<K: Ord> FusedIterator for Iter<'_, K> {}

/// Ascending iterator over the keys of a [`BPlusTree`] inside some bounds.
///
/// Created by [`BPlusTree::range`].
#[derive(Debug, Clone)]
pub struct Range<'a, K> {
    arena: &'a NodeArena<K>,
    leaf: Option<NodeId>,
    index: usize,
    end: Bound<K>,
}

impl<'a, K: Ord> Iterator for Range<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let arena = self.arena;
        loop {
            let leaf = &arena[self.leaf?];
            let Some(key) = leaf.key(self.index) else {
                self.leaf = leaf.next();
                self.index = 0;
                continue;
            };

            let within = match &self.end {
                Bound::Included(end) => key <= end,
                Bound::Excluded(end) => key < end,
                Bound::Unbounded => true,
            };

            // The chain is ascending: nothing further can qualify.
            if !within {
                self.leaf = None;
                return None;
            }

            self.index += 1;
            return Some(key);
        }
    }
}

impl<K: Ord> FusedIterator for Range<'_, K> {}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Iterate over all keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        TreeStats::bump(&self.stats.range_scans);

        Iter {
            arena: &self.arena,
            leaf: self.first_leaf.or_else(|| self.leftmost_leaf()),
            index: 0,
            remaining: self.len,
        }
    }

    /// Iterate over the keys within `bounds` in ascending order.
    ///
    /// Bounds that describe an empty interval (start above end) yield
    /// nothing.
    ///
    /// # Example
    /// ```
    /// use bplusdb::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// for key in 1..=10 {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// let keys: Vec<_> = tree.range(4..7).copied().collect();
    /// assert_eq!(keys, vec![4, 5, 6]);
    ///
    /// let keys: Vec<_> = tree.range(8..).copied().collect();
    /// assert_eq!(keys, vec![8, 9, 10]);
    /// ```
    pub fn range<R: RangeBounds<K>>(&self, bounds: R) -> Range<'_, K> {
        TreeStats::bump(&self.stats.range_scans);

        let (leaf, index) = match bounds.start_bound() {
            Bound::Included(start) => self.seek(start, false),
            Bound::Excluded(start) => self.seek(start, true),
            Bound::Unbounded => (self.first_leaf.or_else(|| self.leftmost_leaf()), 0),
        };

        Range {
            arena: &self.arena,
            leaf,
            index,
            end: bounds.end_bound().cloned(),
        }
    }

    /// All keys in `[min, max]`, ascending.
    ///
    /// Empty if `min > max` or the tree is empty.
    pub fn search_range(&self, min: &K, max: &K) -> Vec<K> {
        if min > max || self.is_empty() {
            return Vec::new();
        }
        self.range((Bound::Included(min), Bound::Included(max)))
            .cloned()
            .collect()
    }

    /// Like [`search_range`](Self::search_range), but rejects inverted bounds.
    ///
    /// # Errors
    /// - `Error::InvalidRange` if `min > max`
    pub fn try_search_range(&self, min: &K, max: &K) -> Result<Vec<K>> {
        if min > max {
            return Err(Error::InvalidRange);
        }
        Ok(self.search_range(min, max))
    }

    /// Every key, ascending, by a full walk of the leaf chain.
    pub fn all_keys(&self) -> Vec<K> {
        self.iter().cloned().collect()
    }

    /// Position of the first key `>= start` (or `> start` if `exclusive`).
    fn seek(&self, start: &K, exclusive: bool) -> (Option<NodeId>, usize) {
        let Some(leaf_id) = self.search_leaf(start) else {
            return (None, 0);
        };

        let index = match self.arena[leaf_id].locate(start) {
            (index, true) if exclusive => index + 1,
            (index, _) => index,
        };
        (Some(leaf_id), index)
    }
}

impl<'a, K: Ord + Clone> IntoIterator for &'a BPlusTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}
