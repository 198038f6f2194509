//! Wishlist commands.
//!
//! Commands carry raw caller input. The service validates every field
//! before touching the store.

/// Command to add a product to a customer's wishlist.
#[derive(Debug, Clone)]
pub struct AddItem {
    /// The customer owning the wishlist.
    pub customer_id: String,

    /// The product to add.
    pub product_id: String,

    /// Requested quantity.
    pub quantity: i64,

    /// Optional note.
    pub note: Option<String>,

    /// When set, adding a product that is already present succeeds
    /// without changing the wishlist.
    pub idempotent: bool,
}

impl AddItem {
    /// Creates an AddItem command for a single unit without a note.
    pub fn new(customer_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            product_id: product_id.into(),
            quantity: 1,
            note: None,
            idempotent: false,
        }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Marks the command as idempotent.
    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }
}

/// Command to remove a product from a customer's wishlist.
#[derive(Debug, Clone)]
pub struct RemoveItem {
    pub customer_id: String,
    pub product_id: String,
}

impl RemoveItem {
    pub fn new(customer_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            product_id: product_id.into(),
        }
    }
}

/// Command to replace the display order of a wishlist.
#[derive(Debug, Clone)]
pub struct ReorderItems {
    pub customer_id: String,

    /// Every product currently in the wishlist, in the new order.
    pub product_ids: Vec<String>,
}

impl ReorderItems {
    pub fn new<I, P>(customer_id: impl Into<String>, product_ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            customer_id: customer_id.into(),
            product_ids: product_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Command to change the quantity of a product in a wishlist.
#[derive(Debug, Clone)]
pub struct SetItemQuantity {
    pub customer_id: String,
    pub product_id: String,
    pub quantity: i64,
}

impl SetItemQuantity {
    pub fn new(
        customer_id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Command to remove every product from a wishlist.
#[derive(Debug, Clone)]
pub struct ClearWishlist {
    pub customer_id: String,
}

impl ClearWishlist {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
        }
    }
}
