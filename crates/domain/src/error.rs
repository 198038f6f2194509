//! Domain error types.

use common::{CustomerId, WishlistId};
use document_store::{StoreError, Version};
use thiserror::Error;

use crate::validation::ValidationError;
use crate::wishlist::WishlistError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A wishlist invariant rejected the operation.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// The command input is malformed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The customer has no wishlist.
    #[error("Wishlist not found for customer {customer_id}")]
    WishlistNotFound { customer_id: CustomerId },

    /// No wishlist is stored under the id.
    #[error("Wishlist not found: {wishlist_id}")]
    WishlistMissing { wishlist_id: WishlistId },

    /// A save lost the race against a concurrent write.
    #[error(
        "Version conflict for wishlist {wishlist_id}: expected version {expected}, found {actual}"
    )]
    VersionConflict {
        wishlist_id: WishlistId,
        expected: Version,
        actual: Version,
    },

    /// Every retry of a conflicting save also conflicted.
    #[error("Gave up on wishlist {wishlist_id} after {attempts} conflicting save attempts")]
    ConcurrencyExhausted {
        wishlist_id: WishlistId,
        attempts: u32,
    },

    /// The document store failed or timed out.
    #[error("Storage failure: {0}")]
    Storage(StoreError),

    /// A stored document could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input or a violated invariant. Never retried.
    Validation,
    /// The addressed wishlist does not exist.
    NotFound,
    /// Optimistic concurrency failure.
    Concurrency,
    /// The store is unavailable or returned garbage.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Concurrency => "concurrency",
            ErrorKind::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Wishlist(WishlistError::ItemNotFound { .. }) => ErrorKind::NotFound,
            DomainError::Wishlist(_) | DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::WishlistNotFound { .. } | DomainError::WishlistMissing { .. } => {
                ErrorKind::NotFound
            }
            DomainError::VersionConflict { .. } | DomainError::ConcurrencyExhausted { .. } => {
                ErrorKind::Concurrency
            }
            DomainError::Storage(_) | DomainError::Serialization(_) => ErrorKind::Storage,
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict {
                wishlist_id,
                expected,
                actual,
            } => DomainError::VersionConflict {
                wishlist_id,
                expected,
                actual,
            },
            other => DomainError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::wishlist::ProductId;

    #[test]
    fn test_store_conflict_maps_to_version_conflict() {
        let err: DomainError = StoreError::VersionConflict {
            wishlist_id: WishlistId::new(),
            expected: Version::first(),
            actual: Version::new(2),
        }
        .into();
        assert!(matches!(err, DomainError::VersionConflict { .. }));
        assert_eq!(err.kind(), ErrorKind::Concurrency);
    }

    #[test]
    fn test_store_timeout_is_storage_kind() {
        let err: DomainError = StoreError::Timeout {
            operation: "save",
            after: Duration::from_millis(5),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_item_not_found_is_not_found_kind() {
        let err: DomainError = WishlistError::ItemNotFound {
            product_id: ProductId::new("SKU-1"),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.kind().to_string(), "not_found");
    }

    #[test]
    fn test_duplicate_item_is_validation_kind() {
        let err: DomainError = WishlistError::DuplicateItem {
            product_id: ProductId::new("SKU-1"),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
