//! Configuration constants for bplusdb.

/// Smallest order a tree can be built with.
///
/// With order 3 a leaf holds at most 2 keys and must keep at least 1, and an
/// internal node holds at most 2 separators and 3 children. Anything smaller
/// cannot satisfy minimum occupancy after a split.
pub const MIN_ORDER: usize = 3;

/// Order used by [`BPlusTree::default`](crate::BPlusTree).
///
/// # Fan-out
/// With order 32:
/// - Max keys per node: 31
/// - Min keys per leaf: 15, per internal node: 15
/// - A tree of height 4 addresses roughly 32^3 leaves
pub const DEFAULT_ORDER: usize = 32;

/// Maximum number of keys a node of the given order can hold.
#[inline]
pub const fn max_keys(order: usize) -> usize {
    order - 1
}

/// Minimum number of keys a non-root leaf must hold: `floor((m - 1) / 2)`.
#[inline]
pub const fn min_leaf_keys(order: usize) -> usize {
    (order - 1) / 2
}

/// Minimum number of keys a non-root internal node must hold: `ceil(m / 2) - 1`.
#[inline]
pub const fn min_internal_keys(order: usize) -> usize {
    (order + 1) / 2 - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_order_bounds() {
        assert_eq!(max_keys(MIN_ORDER), 2);
        assert_eq!(min_leaf_keys(MIN_ORDER), 1);
        assert_eq!(min_internal_keys(MIN_ORDER), 1);
    }

    #[test]
    fn test_occupancy_by_order() {
        // order 4: 3 keys max, leaves keep 1, internal nodes keep 1
        assert_eq!(max_keys(4), 3);
        assert_eq!(min_leaf_keys(4), 1);
        assert_eq!(min_internal_keys(4), 1);

        // order 5: 4 keys max, both kinds keep 2
        assert_eq!(min_leaf_keys(5), 2);
        assert_eq!(min_internal_keys(5), 2);

        assert_eq!(min_leaf_keys(DEFAULT_ORDER), 15);
        assert_eq!(min_internal_keys(DEFAULT_ORDER), 15);
    }

    #[test]
    fn test_merge_fits_in_one_node() {
        // A deficient node plus a sibling at its minimum must fit in one node.
        for order in MIN_ORDER..64 {
            let leaf = min_leaf_keys(order);
            assert!(2 * leaf <= max_keys(order) + 1, "order {}", order);

            let internal = min_internal_keys(order);
            assert!(2 * internal <= max_keys(order), "order {}", order);
        }
    }
}
