//! Changes recorded by the wishlist aggregate between load and save.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// A change applied to a wishlist in memory and not yet persisted.
///
/// The aggregate keeps the list of pending changes as its dirty marker:
/// a wishlist with no pending changes has nothing to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WishlistChange {
    /// A product was appended to the wishlist.
    ItemAdded {
        product_id: ProductId,
        quantity: u32,
    },

    /// A product was removed from the wishlist.
    ItemRemoved { product_id: ProductId },

    /// The display order of the items was replaced.
    ItemsReordered { order: Vec<ProductId> },

    /// The quantity of an item changed.
    QuantityChanged {
        product_id: ProductId,
        old_quantity: u32,
        new_quantity: u32,
    },

    /// Every item was removed.
    Cleared { removed: usize },
}

impl WishlistChange {
    /// Returns the change type name, used in logs.
    pub fn change_type(&self) -> &'static str {
        match self {
            WishlistChange::ItemAdded { .. } => "ItemAdded",
            WishlistChange::ItemRemoved { .. } => "ItemRemoved",
            WishlistChange::ItemsReordered { .. } => "ItemsReordered",
            WishlistChange::QuantityChanged { .. } => "QuantityChanged",
            WishlistChange::Cleared { .. } => "Cleared",
        }
    }
}
