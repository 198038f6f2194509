use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    CustomerId, Document, Result, StoreError, Version, WishlistId, store::DocumentStore,
};

#[derive(Default)]
struct Inner {
    documents: HashMap<WishlistId, Document>,
    owners: HashMap<CustomerId, WishlistId>,
}

/// In-memory document store implementation.
///
/// Provides the same conditional-write semantics as the PostgreSQL
/// implementation. The version check and the write happen under a single
/// write lock, so concurrent saves against the same version serialize and
/// exactly one of them wins.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    pub async fn document_count(&self) -> usize {
        self.inner.read().await.documents.len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, id: WishlistId) -> Result<Option<Document>> {
        Ok(self.inner.read().await.documents.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &CustomerId) -> Result<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .owners
            .get(owner_id)
            .and_then(|id| inner.documents.get(id))
            .cloned())
    }

    async fn save(&self, mut document: Document, expected_version: Version) -> Result<Version> {
        let mut inner = self.inner.write().await;
        let wishlist_id = document.id;

        let actual = inner
            .documents
            .get(&wishlist_id)
            .map(|doc| doc.version)
            .unwrap_or_else(Version::initial);

        if actual != expected_version {
            return Err(StoreError::VersionConflict {
                wishlist_id,
                expected: expected_version,
                actual,
            });
        }

        // A second document for the same owner is a lost creation race.
        if let Some(existing) = inner.owners.get(&document.owner_id)
            && *existing != wishlist_id
        {
            let actual = inner
                .documents
                .get(existing)
                .map(|doc| doc.version)
                .unwrap_or_else(Version::initial);
            return Err(StoreError::VersionConflict {
                wishlist_id,
                expected: expected_version,
                actual,
            });
        }

        let new_version = expected_version.next();
        document.version = new_version;
        if let Some(previous) = inner.documents.get(&wishlist_id) {
            document.created_at = previous.created_at;
        }

        inner.owners.insert(document.owner_id.clone(), wishlist_id);
        inner.documents.insert(wishlist_id, document);

        Ok(new_version)
    }
}
