use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CustomerId, WishlistId};

/// Version number of a stored document, used for optimistic concurrency control.
///
/// A document that has never been written is at version 0; the first
/// successful write produces version 1 and every later write adds one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version of a document that does not exist yet (0).
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version assigned by the first write (1).
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns true if no write has happened yet.
    pub fn is_initial(&self) -> bool {
        self.0 == 0
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// A stored wishlist document.
///
/// The store only understands the envelope fields (id, owner, version,
/// timestamps). The body is opaque JSON owned by the domain layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Primary key of the document.
    pub id: WishlistId,

    /// Owner of the document. At most one document exists per owner.
    pub owner_id: CustomerId,

    /// Version of the stored document. Assigned by the store on write.
    pub version: Version,

    /// When the document was first written.
    pub created_at: DateTime<Utc>,

    /// When the document was last written.
    pub updated_at: DateTime<Utc>,

    /// Domain payload.
    pub body: serde_json::Value,
}

impl Document {
    /// Creates a document that has not been persisted yet.
    pub fn new(id: WishlistId, owner_id: CustomerId, body: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            version: Version::initial(),
            created_at: now,
            updated_at: now,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_sequence() {
        assert!(Version::initial().is_initial());
        assert_eq!(Version::initial().next(), Version::first());
        assert_eq!(Version::first().next(), Version::new(2));
        assert!(Version::new(2) > Version::first());
    }

    #[test]
    fn new_document_is_unversioned() {
        let doc = Document::new(
            WishlistId::new(),
            CustomerId::new("c-1"),
            serde_json::json!({"items": []}),
        );
        assert_eq!(doc.version, Version::initial());
        assert_eq!(doc.created_at, doc.updated_at);
    }
}
