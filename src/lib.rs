//! bplusdb - an order-parameterized B+Tree index.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            bplusdb                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │          Shared handle (index::btree::shared)            │   │
//! │  │     Arc<RwLock<BPlusTree>>: one writer | many readers    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                BPlusTree (index::btree)                  │   │
//! │  │   search → insert/split → delete/rebalance → range      │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │  Underflow repair: borrow-L | borrow-R | merge   │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               Node storage (arena + Node)                │   │
//! │  │   Vec<Option<Node>> + free list, linked by NodeId        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - Index structures (B+Tree)
//!
//! # Quick Start
//! ```
//! use bplusdb::{BPlusTree, Error};
//!
//! let mut tree = BPlusTree::new(3).unwrap();
//! for key in [10, 20, 5, 30, 15, 25, 35] {
//!     tree.insert(key).unwrap();
//! }
//!
//! assert_eq!(tree.insert(20), Err(Error::DuplicateKey));
//! assert_eq!(tree.search_range(&10, &25), vec![10, 15, 20, 25]);
//! assert_eq!(tree.remove(&99), Err(Error::KeyNotFound));
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{Error, NodeId, Result};

pub use index::btree::{
    BPlusTree, Iter, Node, NodeKind, Range, SharedBPlusTree, StatsSnapshot, TreeStats,
};
