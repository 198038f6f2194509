//! Wishlist aggregate and related types.

mod aggregate;
mod changes;
mod commands;
mod service;
mod value_objects;

pub use aggregate::{DEFAULT_MAX_ITEMS, Wishlist};
pub use changes::WishlistChange;
pub use commands::*;
pub use service::{ServiceConfig, WishlistService};
pub use value_objects::{Item, ProductId};

use thiserror::Error;

/// Errors raised by wishlist invariants.
///
/// These are deterministic: retrying the same operation against the same
/// state fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WishlistError {
    /// The product is already in the wishlist.
    #[error("Product already exists in wishlist: {product_id}")]
    DuplicateItem { product_id: ProductId },

    /// The quantity is not a positive integer.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i64 },

    /// The requested order is not a permutation of the current items.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// The product is not in the wishlist.
    #[error("Product not found in wishlist: {product_id}")]
    ItemNotFound { product_id: ProductId },

    /// The wishlist is full.
    #[error("Wishlist cannot exceed {max_items} products")]
    CapacityExceeded { max_items: usize },
}
