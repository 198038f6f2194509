//! Domain layer for the wishlist service.
//!
//! This crate provides:
//! - The Wishlist aggregate and its item-level operations
//! - WishlistRepository, mapping wishlists onto stored documents
//! - CommandHandler, running mutations under optimistic concurrency with
//!   bounded retries
//! - WishlistService, validating requests and recording per-command
//!   logs and metrics

pub mod command;
pub mod error;
pub mod repository;
pub mod validation;
pub mod wishlist;

pub use command::{AttemptState, CommandHandler, CommandResult, LoadMode, RetryPolicy};
pub use error::{DomainError, ErrorKind};
pub use repository::WishlistRepository;
pub use validation::ValidationError;
pub use wishlist::{
    AddItem, ClearWishlist, DEFAULT_MAX_ITEMS, Item, ProductId, RemoveItem, ReorderItems,
    ServiceConfig, SetItemQuantity, Wishlist, WishlistChange, WishlistError, WishlistService,
};
