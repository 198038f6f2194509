use async_trait::async_trait;

use crate::{CustomerId, Document, Result, Version, WishlistId};

/// Core trait for document store implementations.
///
/// A document store persists exactly one document per wishlist id and
/// guards every write with a version check. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads a document by id.
    ///
    /// Returns None if no document has been written for this id.
    async fn load(&self, id: WishlistId) -> Result<Option<Document>>;

    /// Loads the document owned by a customer.
    ///
    /// Returns None if the customer has no document yet.
    async fn find_by_owner(&self, owner_id: &CustomerId) -> Result<Option<Document>>;

    /// Writes a document if the stored version still equals `expected_version`.
    ///
    /// An expected version of `Version::initial()` means the document must not
    /// exist yet (neither by id nor by owner). The write is atomic: on mismatch
    /// it fails with `VersionConflict` and nothing is changed.
    ///
    /// The store assigns the version; `created_at` of an existing document is
    /// preserved and `updated_at` is taken from the given document.
    ///
    /// Returns the new version, which is always `expected_version.next()`.
    async fn save(&self, document: Document, expected_version: Version) -> Result<Version>;
}

/// Extension trait providing convenience methods for document stores.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Checks if a document exists for the given owner.
    async fn owner_exists(&self, owner_id: &CustomerId) -> Result<bool> {
        Ok(self.find_by_owner(owner_id).await?.is_some())
    }

    /// Gets the current version of a document.
    ///
    /// Returns `Version::initial()` if the document doesn't exist.
    async fn current_version(&self, id: WishlistId) -> Result<Version> {
        Ok(self
            .load(id)
            .await?
            .map(|doc| doc.version)
            .unwrap_or_else(Version::initial))
    }
}

// Blanket implementation for all DocumentStore implementations
impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    async fn load(&self, id: WishlistId) -> Result<Option<Document>> {
        (**self).load(id).await
    }

    async fn find_by_owner(&self, owner_id: &CustomerId) -> Result<Option<Document>> {
        (**self).find_by_owner(owner_id).await
    }

    async fn save(&self, document: Document, expected_version: Version) -> Result<Version> {
        (**self).save(document, expected_version).await
    }
}
