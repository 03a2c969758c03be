//! Index structures.
//!
//! Currently implements:
//! - [`btree`] - Order-parameterized B+Tree with a chained leaf level

pub mod btree;

pub use btree::{BPlusTree, SharedBPlusTree};
