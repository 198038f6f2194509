use std::time::Duration;

use thiserror::Error;

use crate::{Version, WishlistId};

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The conditional write lost: the stored version did not match
    /// the expected version.
    #[error(
        "Version conflict for wishlist {wishlist_id}: expected version {expected}, found {actual}"
    )]
    VersionConflict {
        wishlist_id: WishlistId,
        expected: Version,
        actual: Version,
    },

    /// A store call did not finish in time.
    #[error("Store operation '{operation}' timed out after {}ms", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true if the error is an optimistic concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::VersionConflict { .. })
    }
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
