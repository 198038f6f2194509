//! Value objects for the wishlist domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product reference (SKU) stored in a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An entry in a wishlist.
///
/// Items have no identity of their own; they are addressed by product
/// reference within their wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The product this entry refers to.
    pub product_id: ProductId,

    /// How many units the customer wants. Always positive.
    pub quantity: u32,

    /// Free-form note from the customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// When the product was added to the wishlist.
    pub added_at: DateTime<Utc>,
}

impl Item {
    /// Creates a new item added now.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, note: Option<String>) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            note,
            added_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_string_conversion() {
        let id = ProductId::new("SKU-001");
        assert_eq!(id.as_str(), "SKU-001");

        let id2: ProductId = "SKU-002".into();
        assert_eq!(id2.as_str(), "SKU-002");
    }

    #[test]
    fn test_item_without_note_omits_field() {
        let item = Item::new("SKU-001", 2, None);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("note").is_none());
        assert_eq!(json["product_id"], "SKU-001");
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn test_item_deserializes_without_note() {
        let json = serde_json::json!({
            "product_id": "SKU-001",
            "quantity": 1,
            "added_at": "2024-01-01T00:00:00Z"
        });
        let item: Item = serde_json::from_value(json).unwrap();
        assert_eq!(item.note, None);
        assert_eq!(item.product_id, ProductId::new("SKU-001"));
    }
}
