//! Integration tests for the B+Tree.
//!
//! These drive the public API end to end and check the tree against a plain
//! ordered set after every step.

use bplusdb::{BPlusTree, Error, SharedBPlusTree};
use std::collections::BTreeSet;
use std::thread;

/// Insertion sequence covering 1..=40 in an order that splits at every level.
const SCRAMBLED_40: [i32; 40] = [
    10, 20, 5, 30, 15, 25, 35, 2, 8, 12, 18, 22, 28, 32, 38, 1, 3, 6, 9, 11, 13, 16, 19, 21, 23,
    26, 29, 31, 33, 36, 39, 4, 7, 14, 17, 24, 27, 34, 37, 40,
];

fn build(order: usize, keys: &[i32]) -> BPlusTree<i32> {
    let mut tree = BPlusTree::new(order).unwrap();
    for &key in keys {
        tree.insert(key).unwrap();
        tree.check_invariants().unwrap();
    }
    tree
}

fn expected_range(model: &BTreeSet<i32>, min: i32, max: i32) -> Vec<i32> {
    if min > max {
        return Vec::new();
    }
    model.range(min..=max).copied().collect()
}

// ============================================================================
// Scrambled 1..=40 at order 3
// ============================================================================

#[test]
fn test_scrambled_inserts_hold_every_key() {
    let tree = build(3, &SCRAMBLED_40);

    assert_eq!(tree.len(), 40);
    assert_eq!(tree.all_keys(), (1..=40).collect::<Vec<_>>());
    assert_eq!(tree.first(), Some(&1));
    assert_eq!(tree.last(), Some(&40));
    assert!(tree.height() >= 4);
}

#[test]
fn test_scrambled_searches() {
    let tree = build(3, &SCRAMBLED_40);

    assert!(tree.search(&15));
    assert!(tree.search(&2));
    assert!(tree.search(&40));
    assert!(!tree.search(&100));
    assert!(!tree.search(&0));
}

#[test]
fn test_scrambled_ranges() {
    let tree = build(3, &SCRAMBLED_40);
    let model: BTreeSet<i32> = SCRAMBLED_40.iter().copied().collect();

    assert_eq!(tree.search_range(&10, &20), (10..=20).collect::<Vec<_>>());
    assert_eq!(tree.search_range(&1, &5), vec![1, 2, 3, 4, 5]);
    assert_eq!(tree.search_range(&35, &40), vec![35, 36, 37, 38, 39, 40]);
    assert_eq!(tree.search_range(&0, &1), vec![1]);
    assert!(tree.search_range(&41, &50).is_empty());
    assert!(tree.search_range(&20, &10).is_empty());
    assert_eq!(tree.try_search_range(&20, &10), Err(Error::InvalidRange));

    for min in -1..=42 {
        for max in min - 2..=42 {
            assert_eq!(
                tree.search_range(&min, &max),
                expected_range(&model, min, max),
                "range [{}, {}]",
                min,
                max
            );
        }
    }
}

#[test]
fn test_scrambled_deletes_then_drain() {
    let mut tree = build(3, &SCRAMBLED_40);
    let mut model: BTreeSet<i32> = SCRAMBLED_40.iter().copied().collect();

    assert_eq!(tree.remove(&15), Ok(15));
    model.remove(&15);
    assert!(!tree.search(&15));
    assert_eq!(tree.search_range(&10, &20), expected_range(&model, 10, 20));
    tree.check_invariants().unwrap();

    assert_eq!(tree.remove(&2), Ok(2));
    model.remove(&2);
    assert!(!tree.search(&2));
    assert_eq!(tree.search_range(&1, &5), vec![1, 3, 4, 5]);
    tree.check_invariants().unwrap();

    assert_eq!(tree.remove(&30), Ok(30));
    model.remove(&30);
    assert!(!tree.search(&30));
    assert_eq!(tree.search_range(&28, &32), vec![28, 29, 31, 32]);
    tree.check_invariants().unwrap();

    assert_eq!(tree.remove(&99), Err(Error::KeyNotFound));
    assert_eq!(tree.len(), 37);

    for key in tree.all_keys() {
        assert_eq!(tree.remove(&key), Ok(key));
        model.remove(&key);
        tree.check_invariants().unwrap();
        assert_eq!(tree.all_keys(), model.iter().copied().collect::<Vec<_>>());
    }

    assert!(tree.is_empty());
    assert!(tree.all_keys().is_empty());
    assert_eq!(tree.root(), None);
    assert_eq!(tree.first_leaf(), None);
    assert_eq!(tree.node_count(), 0);
}

// ============================================================================
// Boundary shapes
// ============================================================================

#[test]
fn test_order_three_first_split() {
    let tree = build(3, &[10, 20, 5]);

    let root = tree.node(tree.root().unwrap()).unwrap();
    assert!(!root.is_leaf());
    assert_eq!(root.keys(), &[20]);

    let left = tree.node(root.children()[0]).unwrap();
    let right = tree.node(root.children()[1]).unwrap();
    assert_eq!(left.keys(), &[5, 10]);
    assert_eq!(right.keys(), &[20]);
    assert_eq!(left.next(), Some(root.children()[1]));
    assert_eq!(right.next(), None);
    assert_eq!(tree.first_leaf(), Some(root.children()[0]));
}

#[test]
fn test_merge_back_to_single_leaf() {
    let mut tree = build(3, &[10, 20, 5]);

    // [20] empties and borrows 10 from its left sibling
    tree.remove(&20).unwrap();
    tree.check_invariants().unwrap();
    assert_eq!(tree.height(), 2);

    // both leaves at minimum: the merge leaves a lone root leaf
    tree.remove(&5).unwrap();
    tree.check_invariants().unwrap();

    let root = tree.node(tree.root().unwrap()).unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.keys(), &[10]);
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.first_leaf(), tree.root());
}

#[test]
fn test_single_key_lifecycle() {
    let mut tree = BPlusTree::new(3).unwrap();
    tree.insert(42).unwrap();
    assert_eq!(tree.search_range(&42, &42), vec![42]);

    assert_eq!(tree.remove(&42), Ok(42));
    assert!(tree.is_empty());
    assert_eq!(tree.remove(&42), Err(Error::KeyNotFound));
    assert!(tree.search_range(&0, &100).is_empty());

    // Empty tree is reusable
    tree.insert(7).unwrap();
    assert_eq!(tree.all_keys(), vec![7]);
}

#[test]
fn test_duplicates_leave_tree_untouched() {
    let mut tree = build(4, &SCRAMBLED_40);
    let before = tree.to_string();

    for &key in &SCRAMBLED_40 {
        assert_eq!(tree.insert(key), Err(Error::DuplicateKey));
    }

    assert_eq!(tree.len(), 40);
    assert_eq!(tree.to_string(), before);
}

#[test]
fn test_invalid_orders_rejected() {
    for order in 0..3 {
        assert!(matches!(
            BPlusTree::<i32>::new(order),
            Err(Error::InvalidOrder { .. })
        ));
    }
    assert!(BPlusTree::<i32>::new(3).is_ok());
}

// ============================================================================
// Orders and key types
// ============================================================================

#[test]
fn test_many_orders_interleaved_workload() {
    for order in 3..=9 {
        let mut tree = BPlusTree::new(order).unwrap();
        let mut model = BTreeSet::new();

        // Multiplicative scramble of 0..500
        for i in 0..500u64 {
            let key = (i * 7919) % 500;
            tree.insert(key).unwrap();
            model.insert(key);
        }
        tree.check_invariants().unwrap();

        for key in (0..500u64).filter(|k| k % 3 != 0) {
            tree.remove(&key).unwrap();
            model.remove(&key);
        }
        tree.check_invariants().unwrap();

        assert_eq!(tree.len(), model.len());
        assert_eq!(
            tree.iter().copied().collect::<Vec<_>>(),
            model.iter().copied().collect::<Vec<_>>()
        );
        assert_eq!(
            tree.range(100..200).copied().collect::<Vec<_>>(),
            model.range(100..200).copied().collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_string_keys() {
    let words = ["pear", "apple", "fig", "kiwi", "banana", "cherry", "date", "grape"];
    let mut tree = BPlusTree::new(3).unwrap();
    for word in words {
        tree.insert(word.to_string()).unwrap();
    }
    tree.check_invariants().unwrap();

    assert_eq!(
        tree.search_range(&"b".to_string(), &"e".to_string()),
        vec!["banana", "cherry", "date"]
    );

    tree.remove(&"fig".to_string()).unwrap();
    assert!(!tree.search(&"fig".to_string()));
    tree.check_invariants().unwrap();
}

#[test]
fn test_display_lists_every_leaf() {
    let tree = build(3, &SCRAMBLED_40);
    let out = tree.to_string();

    assert!(out.contains("LEAF CHAIN:"));
    assert!(out.contains("LEAF"));
    assert!(out.contains("INTERNAL"));
}

// ============================================================================
// Shared handle
// ============================================================================

#[test]
fn test_shared_tree_disjoint_writers() {
    let tree = SharedBPlusTree::new(4).unwrap();

    let handles: Vec<_> = (0..8i32)
        .map(|t| {
            let tree = tree.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    tree.insert(i * 8 + t).unwrap();
                }
                for i in (0..200).step_by(2) {
                    assert_eq!(tree.remove(&(i * 8 + t)), Ok(i * 8 + t));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tree.len(), 800);
    let tree = tree.try_unwrap().unwrap();
    tree.check_invariants().unwrap();

    let expected: Vec<i32> = (0..1600).filter(|k| (k / 8) % 2 == 1).collect();
    assert_eq!(tree.all_keys(), expected);
}

#[test]
fn test_stats_track_structural_events() {
    let mut tree = build(3, &SCRAMBLED_40);
    let after_inserts = tree.stats().snapshot();
    assert_eq!(after_inserts.inserts, 40);
    assert!(after_inserts.leaf_splits > 0);
    assert!(after_inserts.root_splits >= 3);

    for key in 1..=40 {
        tree.remove(&key).unwrap();
    }
    let after_removes = tree.stats().snapshot();
    assert_eq!(after_removes.removes, 40);
    assert!(after_removes.merges > 0);
    assert!(after_removes.root_collapses >= 3);
}
