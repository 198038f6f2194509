//! Property tests for the Wishlist aggregate.

use common::CustomerId;
use domain::{ProductId, Wishlist, WishlistError};
use proptest::prelude::*;

/// Up to ten distinct product ids.
fn product_ids() -> impl Strategy<Value = Vec<ProductId>> {
    prop::collection::hash_set("[a-z0-9]{1,8}", 0..10)
        .prop_map(|ids| ids.into_iter().map(ProductId::new).collect())
}

fn wishlist_of(products: &[ProductId]) -> Wishlist {
    let mut wishlist = Wishlist::new(CustomerId::new("c-1"));
    for product_id in products {
        wishlist.add_item(product_id.clone(), 1, None).unwrap();
    }
    wishlist
}

proptest! {
    #[test]
    fn add_then_remove_restores_sequence(products in product_ids(), extra in "[A-Z]{1,8}") {
        let mut wishlist = wishlist_of(&products);
        let before = wishlist.items().to_vec();
        let extra = ProductId::new(extra);

        wishlist.add_item(extra.clone(), 1, None).unwrap();
        wishlist.remove_item(&extra).unwrap();

        prop_assert_eq!(wishlist.items(), before.as_slice());
    }

    #[test]
    fn second_add_of_same_product_is_rejected(products in product_ids(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!products.is_empty());
        let mut wishlist = wishlist_of(&products);
        let before = wishlist.clone();
        let existing = products[pick.index(products.len())].clone();

        let result = wishlist.add_item(existing.clone(), 1, None);

        prop_assert_eq!(result, Err(WishlistError::DuplicateItem { product_id: existing }));
        prop_assert_eq!(wishlist, before);
    }

    #[test]
    fn reorder_by_permutation_applies_order(
        (products, order) in product_ids().prop_flat_map(|ids| {
            let shuffled = Just(ids.clone()).prop_shuffle();
            (Just(ids), shuffled)
        })
    ) {
        let mut wishlist = wishlist_of(&products);

        wishlist.reorder(&order).unwrap();

        prop_assert_eq!(wishlist.product_ids(), order);
        prop_assert_eq!(wishlist.item_count(), products.len());
    }

    #[test]
    fn non_permutation_reorder_is_rejected(products in product_ids(), stranger in "[A-Z]{1,8}") {
        prop_assume!(!products.is_empty());
        let mut wishlist = wishlist_of(&products);
        let before = wishlist.clone();

        let mut order = products.clone();
        order[0] = ProductId::new(stranger);
        let result = wishlist.reorder(&order);

        prop_assert!(matches!(result, Err(WishlistError::InvalidOrder(_))));
        prop_assert_eq!(wishlist, before);
    }

    #[test]
    fn non_positive_quantity_is_rejected(quantity in i64::MIN..=0) {
        let mut wishlist = Wishlist::new(CustomerId::new("c-1"));

        let result = wishlist.add_item(ProductId::new("p1"), quantity, None);

        prop_assert_eq!(result, Err(WishlistError::InvalidQuantity { quantity }));
        prop_assert!(wishlist.is_empty());
        prop_assert!(!wishlist.is_dirty());
    }
}
