//! Order store error types.

use thiserror::Error;

/// Errors from order store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The workflow changed since it was read.
    #[error("Workflow version conflict for order {order_id}: expected {expected}, found {found}")]
    VersionConflict {
        order_id: String,
        expected: u64,
        found: u64,
    },

    /// The store lock was poisoned.
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Failure reported by a persistence backend.
    #[error("Store backend error: {0}")]
    Backend(String),
}
