//! B+Tree operation statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracked by a [`BPlusTree`](crate::BPlusTree).
///
/// All fields are atomic so read-only paths (`search`, range scans) can
/// count through `&self`, and a tree shared behind a read lock can be
/// observed while other readers run.
///
/// Counters are independent and use `Ordering::Relaxed`; a snapshot is not
/// a consistent cut across them.
#[derive(Debug, Default)]
pub struct TreeStats {
    /// Point lookups (`search`).
    pub lookups: AtomicU64,

    /// Range scans and full traversals started.
    pub range_scans: AtomicU64,

    /// Successful inserts.
    pub inserts: AtomicU64,

    /// Successful removes.
    pub removes: AtomicU64,

    /// Leaves split on overflow.
    pub leaf_splits: AtomicU64,

    /// Internal nodes split on overflow.
    pub internal_splits: AtomicU64,

    /// Splits that reached the root and grew the tree by one level.
    pub root_splits: AtomicU64,

    /// Underflows fixed by taking a key from the left sibling.
    pub borrows_left: AtomicU64,

    /// Underflows fixed by taking a key from the right sibling.
    pub borrows_right: AtomicU64,

    /// Underflows fixed by merging two siblings.
    pub merges: AtomicU64,

    /// Internal roots replaced by their only child.
    pub root_collapses: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            range_scans: self.range_scans.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            leaf_splits: self.leaf_splits.load(Ordering::Relaxed),
            internal_splits: self.internal_splits.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            borrows_left: self.borrows_left.load(Ordering::Relaxed),
            borrows_right: self.borrows_right.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            root_collapses: self.root_collapses.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.lookups,
            &self.range_scans,
            &self.inserts,
            &self.removes,
            &self.leaf_splits,
            &self.internal_splits,
            &self.root_splits,
            &self.borrows_left,
            &self.borrows_right,
            &self.merges,
            &self.root_collapses,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// A point-in-time copy of [`TreeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub lookups: u64,
    pub range_scans: u64,
    pub inserts: u64,
    pub removes: u64,
    pub leaf_splits: u64,
    pub internal_splits: u64,
    pub root_splits: u64,
    pub borrows_left: u64,
    pub borrows_right: u64,
    pub merges: u64,
    pub root_collapses: u64,
}

impl StatsSnapshot {
    /// Total splits of any kind.
    pub fn splits(&self) -> u64 {
        self.leaf_splits + self.internal_splits
    }

    /// Total underflow repairs of any kind.
    pub fn rebalances(&self) -> u64 {
        self.borrows_left + self.borrows_right + self.merges
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, removes: {}, lookups: {}, splits: {}, rebalances: {}, height changes: +{}/-{} }}",
            self.inserts,
            self.removes,
            self.lookups,
            self.splits(),
            self.rebalances(),
            self.root_splits,
            self.root_collapses
        )
    }
}
