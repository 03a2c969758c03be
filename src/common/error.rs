//! Error types for bplusdb.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in bplusdb.
///
/// None of these leave the tree half-modified: an operation that returns an
/// error has made no structural change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The key is already present; the insert was rejected.
    #[error("Duplicate key")]
    DuplicateKey,

    /// The key is not present; the remove was a no-op.
    #[error("Key not found")]
    KeyNotFound,

    /// A range query with its lower bound above its upper bound.
    #[error("Invalid range: lower bound is greater than upper bound")]
    InvalidRange,

    /// The tree was constructed with an order that cannot keep nodes at
    /// minimum occupancy.
    #[error("Invalid order {order}: must be at least {min}")]
    InvalidOrder { order: usize, min: usize },

    /// A structural invariant does not hold.
    ///
    /// Only produced by the invariant checker. Seeing this indicates a bug.
    #[error("Corruption detected: {0}")]
    Corruption(String),
}
