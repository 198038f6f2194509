//! Translation between wishlists and stored documents.

use chrono::Utc;
use common::{CustomerId, WishlistId};
use document_store::{Document, DocumentStore, Version};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::wishlist::{DEFAULT_MAX_ITEMS, Item, Wishlist};

/// Stored body of a wishlist document.
#[derive(Debug, Serialize, Deserialize)]
struct WishlistBody {
    #[serde(default)]
    items: Vec<Item>,
}

/// Loads and saves [`Wishlist`] aggregates through a [`DocumentStore`].
///
/// The repository owns no business rules. It maps the aggregate to one
/// document per wishlist and passes the expected version through to the
/// store's conditional write.
pub struct WishlistRepository<S: DocumentStore> {
    store: S,
    max_items: usize,
}

impl<S: DocumentStore> WishlistRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    /// Sets the capacity applied to every loaded wishlist.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Loads a wishlist by id together with its stored version.
    pub async fn load(&self, id: WishlistId) -> Result<(Wishlist, Version), DomainError> {
        let document = self
            .store
            .load(id)
            .await?
            .ok_or(DomainError::WishlistMissing { wishlist_id: id })?;

        let wishlist = self.restore_wishlist(document)?;
        let version = wishlist.version();
        Ok((wishlist, version))
    }

    /// Loads the wishlist owned by a customer, if one has been persisted.
    pub async fn load_by_owner(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<Wishlist>, DomainError> {
        match self.store.find_by_owner(customer_id).await? {
            Some(document) => Ok(Some(self.restore_wishlist(document)?)),
            None => Ok(None),
        }
    }

    /// Writes the wishlist if the stored version still equals `expected_version`.
    ///
    /// On success the wishlist is marked persisted at the new version and its
    /// pending changes are cleared. On failure it is left untouched.
    pub async fn save(
        &self,
        wishlist: &mut Wishlist,
        expected_version: Version,
    ) -> Result<Version, DomainError> {
        let updated_at = Utc::now();
        let document = Document {
            id: wishlist.id(),
            owner_id: wishlist.customer_id().clone(),
            version: expected_version,
            created_at: wishlist.created_at(),
            updated_at,
            body: serde_json::to_value(WishlistBody {
                items: wishlist.items().to_vec(),
            })?,
        };

        let new_version = self.store.save(document, expected_version).await?;
        wishlist.mark_persisted(new_version, updated_at);
        Ok(new_version)
    }

    fn restore_wishlist(&self, document: Document) -> Result<Wishlist, DomainError> {
        let body: WishlistBody = serde_json::from_value(document.body)?;
        Ok(Wishlist::restore(
            document.id,
            document.owner_id,
            body.items,
            document.version,
            document.created_at,
            document.updated_at,
        )
        .with_max_items(self.max_items))
    }
}
