//! Wishlist aggregate implementation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::{CustomerId, WishlistId};
use document_store::Version;

use super::{Item, ProductId, WishlistChange, WishlistError};

/// Maximum number of items a wishlist holds unless configured otherwise.
pub const DEFAULT_MAX_ITEMS: usize = 20;

/// Wishlist aggregate root.
///
/// Holds the ordered item sequence of one customer. Every operation either
/// fails and leaves the wishlist untouched, or applies its change and records
/// it as pending. The version is never changed by operations; it is assigned
/// when the wishlist is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Wishlist {
    id: WishlistId,
    customer_id: CustomerId,
    items: Vec<Item>,
    version: Version,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    max_items: usize,
    pending: Vec<WishlistChange>,
}

impl Wishlist {
    /// Creates a new, empty and unpersisted wishlist for a customer.
    pub fn new(customer_id: CustomerId) -> Self {
        let now = Utc::now();
        Self {
            id: WishlistId::new(),
            customer_id,
            items: Vec::new(),
            version: Version::initial(),
            created_at: now,
            updated_at: now,
            max_items: DEFAULT_MAX_ITEMS,
            pending: Vec::new(),
        }
    }

    /// Rebuilds a wishlist from persisted state.
    pub fn restore(
        id: WishlistId,
        customer_id: CustomerId,
        items: Vec<Item>,
        version: Version,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            items,
            version,
            created_at,
            updated_at,
            max_items: DEFAULT_MAX_ITEMS,
            pending: Vec::new(),
        }
    }

    /// Sets the item capacity.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Marks all pending changes as persisted at the given version.
    pub fn mark_persisted(&mut self, version: Version, updated_at: DateTime<Utc>) {
        self.version = version;
        self.updated_at = updated_at;
        self.pending.clear();
    }
}

// Query methods
impl Wishlist {
    pub fn id(&self) -> WishlistId {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// Returns the items in display order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the item for a product, if present.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&Item> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Returns the product references in display order.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items
            .iter()
            .map(|item| item.product_id.clone())
            .collect()
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.position(product_id).is_some()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Returns the version of the last persisted state.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns true if this wishlist has never been persisted.
    pub fn is_new(&self) -> bool {
        self.version.is_initial()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if there are changes that have not been persisted.
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Returns the changes applied since the last load or save.
    pub fn pending_changes(&self) -> &[WishlistChange] {
        &self.pending
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
    }
}

// Mutations
impl Wishlist {
    /// Appends a product to the end of the wishlist.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        note: Option<String>,
    ) -> Result<(), WishlistError> {
        let quantity = checked_quantity(quantity)?;

        if self.contains(&product_id) {
            return Err(WishlistError::DuplicateItem { product_id });
        }

        if self.items.len() >= self.max_items {
            return Err(WishlistError::CapacityExceeded {
                max_items: self.max_items,
            });
        }

        self.items.push(Item::new(product_id.clone(), quantity, note));
        self.record(WishlistChange::ItemAdded {
            product_id,
            quantity,
        });
        Ok(())
    }

    /// Removes a product, keeping the relative order of the remaining items.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<Item, WishlistError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| WishlistError::ItemNotFound {
                product_id: product_id.clone(),
            })?;

        let removed = self.items.remove(index);
        self.record(WishlistChange::ItemRemoved {
            product_id: product_id.clone(),
        });
        Ok(removed)
    }

    /// Replaces the display order.
    ///
    /// `new_order` must be a permutation of the current product references.
    /// Reordering into the current order records no change.
    pub fn reorder(&mut self, new_order: &[ProductId]) -> Result<(), WishlistError> {
        if new_order.len() != self.items.len() {
            return Err(WishlistError::InvalidOrder(format!(
                "expected {} product ids, got {}",
                self.items.len(),
                new_order.len()
            )));
        }

        let mut seen = HashSet::with_capacity(new_order.len());
        for product_id in new_order {
            if !seen.insert(product_id) {
                return Err(WishlistError::InvalidOrder(format!(
                    "product {product_id} listed more than once"
                )));
            }
            if !self.contains(product_id) {
                return Err(WishlistError::InvalidOrder(format!(
                    "product {product_id} is not in the wishlist"
                )));
            }
        }

        if self
            .items
            .iter()
            .zip(new_order)
            .all(|(item, product_id)| &item.product_id == product_id)
        {
            return Ok(());
        }

        let mut remaining = std::mem::take(&mut self.items);
        let mut reordered = Vec::with_capacity(remaining.len());
        for product_id in new_order {
            // Validated above: every id is present exactly once.
            if let Some(index) = remaining
                .iter()
                .position(|item| &item.product_id == product_id)
            {
                reordered.push(remaining.swap_remove(index));
            }
        }
        self.items = reordered;

        self.record(WishlistChange::ItemsReordered {
            order: new_order.to_vec(),
        });
        Ok(())
    }

    /// Changes the quantity of an existing item.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), WishlistError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| WishlistError::ItemNotFound {
                product_id: product_id.clone(),
            })?;
        let quantity = checked_quantity(quantity)?;

        let item = &mut self.items[index];
        if item.quantity == quantity {
            return Ok(());
        }

        let old_quantity = item.quantity;
        item.quantity = quantity;
        self.record(WishlistChange::QuantityChanged {
            product_id: product_id.clone(),
            old_quantity,
            new_quantity: quantity,
        });
        Ok(())
    }

    /// Removes every item. Clearing an empty wishlist records no change.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let removed = self.items.len();
        self.items.clear();
        self.record(WishlistChange::Cleared { removed });
    }

    fn record(&mut self, change: WishlistChange) {
        self.pending.push(change);
    }
}

fn checked_quantity(quantity: i64) -> Result<u32, WishlistError> {
    if quantity <= 0 {
        return Err(WishlistError::InvalidQuantity { quantity });
    }
    u32::try_from(quantity).map_err(|_| WishlistError::InvalidQuantity { quantity })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> ProductId {
        ProductId::new(id)
    }

    fn wishlist_with(products: &[&str]) -> Wishlist {
        let mut wishlist = Wishlist::new(CustomerId::new("customer-1"));
        for product in products {
            wishlist.add_item(p(product), 1, None).unwrap();
        }
        wishlist
    }

    #[test]
    fn test_new_wishlist_is_empty_and_unpersisted() {
        let wishlist = Wishlist::new(CustomerId::new("customer-1"));
        assert!(wishlist.is_empty());
        assert!(wishlist.is_new());
        assert!(!wishlist.is_dirty());
        assert_eq!(wishlist.max_items(), DEFAULT_MAX_ITEMS);
    }

    #[test]
    fn test_add_item_appends_and_marks_dirty() {
        let mut wishlist = wishlist_with(&["SKU-1"]);
        wishlist
            .add_item(p("SKU-2"), 3, Some("gift".to_string()))
            .unwrap();

        assert_eq!(wishlist.product_ids(), vec![p("SKU-1"), p("SKU-2")]);
        let item = wishlist.get_item(&p("SKU-2")).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.note.as_deref(), Some("gift"));
        assert_eq!(wishlist.pending_changes().len(), 2);
        assert_eq!(wishlist.version(), Version::initial());
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut wishlist = wishlist_with(&["SKU-1"]);
        let before = wishlist.clone();

        let result = wishlist.add_item(p("SKU-1"), 1, None);

        assert!(matches!(result, Err(WishlistError::DuplicateItem { .. })));
        assert_eq!(wishlist, before);
    }

    #[test]
    fn test_add_non_positive_quantity_fails() {
        let mut wishlist = wishlist_with(&[]);
        for quantity in [0, -1, i64::MIN] {
            let result = wishlist.add_item(p("SKU-1"), quantity, None);
            assert!(matches!(
                result,
                Err(WishlistError::InvalidQuantity { quantity: q }) if q == quantity
            ));
        }
        assert!(wishlist.is_empty());
        assert!(!wishlist.is_dirty());
    }

    #[test]
    fn test_add_quantity_beyond_u32_fails() {
        let mut wishlist = wishlist_with(&[]);
        let result = wishlist.add_item(p("SKU-1"), i64::from(u32::MAX) + 1, None);
        assert!(matches!(result, Err(WishlistError::InvalidQuantity { .. })));
    }

    #[test]
    fn test_add_beyond_capacity_fails() {
        let mut wishlist = Wishlist::new(CustomerId::new("customer-1")).with_max_items(2);
        wishlist.add_item(p("SKU-1"), 1, None).unwrap();
        wishlist.add_item(p("SKU-2"), 1, None).unwrap();

        let result = wishlist.add_item(p("SKU-3"), 1, None);

        assert!(matches!(
            result,
            Err(WishlistError::CapacityExceeded { max_items: 2 })
        ));
        assert_eq!(wishlist.item_count(), 2);
    }

    #[test]
    fn test_duplicate_reported_before_capacity() {
        let mut wishlist = Wishlist::new(CustomerId::new("customer-1")).with_max_items(1);
        wishlist.add_item(p("SKU-1"), 1, None).unwrap();

        let result = wishlist.add_item(p("SKU-1"), 1, None);
        assert!(matches!(result, Err(WishlistError::DuplicateItem { .. })));
    }

    #[test]
    fn test_remove_item_preserves_order() {
        let mut wishlist = wishlist_with(&["A", "B", "C", "D"]);

        let removed = wishlist.remove_item(&p("B")).unwrap();

        assert_eq!(removed.product_id, p("B"));
        assert_eq!(wishlist.product_ids(), vec![p("A"), p("C"), p("D")]);
    }

    #[test]
    fn test_remove_missing_item_fails() {
        let mut wishlist = wishlist_with(&["A"]);
        let result = wishlist.remove_item(&p("Z"));
        assert!(matches!(result, Err(WishlistError::ItemNotFound { .. })));
        assert_eq!(wishlist.item_count(), 1);
    }

    #[test]
    fn test_reorder_permutation() {
        let mut wishlist = wishlist_with(&["A", "B", "C"]);
        wishlist.mark_persisted(Version::new(3), Utc::now());

        wishlist.reorder(&[p("C"), p("A"), p("B")]).unwrap();

        assert_eq!(wishlist.product_ids(), vec![p("C"), p("A"), p("B")]);
        assert_eq!(
            wishlist.pending_changes(),
            &[WishlistChange::ItemsReordered {
                order: vec![p("C"), p("A"), p("B")]
            }]
        );
    }

    #[test]
    fn test_reorder_keeps_item_data() {
        let mut wishlist = wishlist_with(&["A"]);
        wishlist
            .add_item(p("B"), 5, Some("blue".to_string()))
            .unwrap();

        wishlist.reorder(&[p("B"), p("A")]).unwrap();

        let first = &wishlist.items()[0];
        assert_eq!(first.product_id, p("B"));
        assert_eq!(first.quantity, 5);
        assert_eq!(first.note.as_deref(), Some("blue"));
    }

    #[test]
    fn test_reorder_to_same_order_is_noop() {
        let mut wishlist = wishlist_with(&["A", "B"]);
        wishlist.mark_persisted(Version::new(2), Utc::now());

        wishlist.reorder(&[p("A"), p("B")]).unwrap();
        assert!(!wishlist.is_dirty());
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let mut wishlist = wishlist_with(&["A", "B", "C"]);
        let before = wishlist.clone();

        let cases: Vec<Vec<ProductId>> = vec![
            vec![p("A"), p("B")],
            vec![p("A"), p("B"), p("C"), p("D")],
            vec![p("A"), p("A"), p("B")],
            vec![p("A"), p("B"), p("Z")],
            vec![],
        ];

        for order in cases {
            let result = wishlist.reorder(&order);
            assert!(
                matches!(result, Err(WishlistError::InvalidOrder(_))),
                "order {order:?} should be rejected"
            );
            assert_eq!(wishlist, before);
        }
    }

    #[test]
    fn test_set_quantity() {
        let mut wishlist = wishlist_with(&["A"]);
        wishlist.mark_persisted(Version::first(), Utc::now());

        wishlist.set_quantity(&p("A"), 4).unwrap();

        assert_eq!(wishlist.get_item(&p("A")).unwrap().quantity, 4);
        assert_eq!(
            wishlist.pending_changes(),
            &[WishlistChange::QuantityChanged {
                product_id: p("A"),
                old_quantity: 1,
                new_quantity: 4
            }]
        );
    }

    #[test]
    fn test_set_same_quantity_is_noop() {
        let mut wishlist = wishlist_with(&["A"]);
        wishlist.mark_persisted(Version::first(), Utc::now());

        wishlist.set_quantity(&p("A"), 1).unwrap();
        assert!(!wishlist.is_dirty());
    }

    #[test]
    fn test_set_quantity_errors() {
        let mut wishlist = wishlist_with(&["A"]);
        assert!(matches!(
            wishlist.set_quantity(&p("Z"), 2),
            Err(WishlistError::ItemNotFound { .. })
        ));
        assert!(matches!(
            wishlist.set_quantity(&p("A"), 0),
            Err(WishlistError::InvalidQuantity { quantity: 0 })
        ));
        assert_eq!(wishlist.get_item(&p("A")).unwrap().quantity, 1);
    }

    #[test]
    fn test_clear() {
        let mut wishlist = wishlist_with(&["A", "B"]);
        wishlist.mark_persisted(Version::new(2), Utc::now());

        wishlist.clear();

        assert!(wishlist.is_empty());
        assert_eq!(
            wishlist.pending_changes(),
            &[WishlistChange::Cleared { removed: 2 }]
        );
    }

    #[test]
    fn test_clear_empty_is_noop() {
        let mut wishlist = wishlist_with(&[]);
        wishlist.clear();
        assert!(!wishlist.is_dirty());
    }

    #[test]
    fn test_mark_persisted_resets_dirty_marker() {
        let mut wishlist = wishlist_with(&["A"]);
        assert!(wishlist.is_dirty());

        wishlist.mark_persisted(Version::first(), Utc::now());

        assert!(!wishlist.is_dirty());
        assert_eq!(wishlist.version(), Version::first());
    }
}
