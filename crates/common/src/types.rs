use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a wishlist document.
///
/// Wraps a UUID so wishlist ids cannot be mixed up with other
/// UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistId(Uuid);

impl WishlistId {
    /// Creates a new random wishlist ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a wishlist ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for WishlistId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WishlistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for WishlistId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<WishlistId> for Uuid {
    fn from(id: WishlistId) -> Self {
        id.0
    }
}

/// Identifier of the customer owning a wishlist.
///
/// Customer ids come from an external system, so they are opaque strings.
/// Format checks live in the domain layer; this type only carries the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wishlist_id_new_creates_unique_ids() {
        let id1 = WishlistId::new();
        let id2 = WishlistId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn wishlist_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = WishlistId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn wishlist_id_serializes_as_plain_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&WishlistId::from(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn customer_id_displays_raw_value() {
        let id = CustomerId::new("customer-42");
        assert_eq!(id.to_string(), "customer-42");
        assert_eq!(id.as_str(), "customer-42");
    }
}
