//! Wishlist endpoints.
//!
//! Every route is scoped to one customer:
//! `/api/v1/customers/{customer_id}/wishlist`.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use document_store::DocumentStore;
use domain::{
    AddItem, ClearWishlist, Item, RemoveItem, ReorderItems, SetItemQuantity, Wishlist,
    WishlistService,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: DocumentStore> {
    pub service: WishlistService<S>,
}

// -- Request types --

#[derive(Debug, Default, Deserialize)]
pub struct AddItemRequest {
    pub quantity: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddItemParams {
    #[serde(default)]
    pub idempotent: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub product_ids: Vec<String>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub id: String,
    pub customer_id: String,
    pub items: Vec<ItemResponse>,
    pub item_count: usize,
    pub max_items: usize,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub product_id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
            note: item.note.clone(),
            added_at: item.added_at,
        }
    }
}

impl From<&Wishlist> for WishlistResponse {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            id: wishlist.id().to_string(),
            customer_id: wishlist.customer_id().to_string(),
            items: wishlist.items().iter().map(ItemResponse::from).collect(),
            item_count: wishlist.item_count(),
            max_items: wishlist.max_items(),
            version: wishlist.version().as_i64(),
            created_at: wishlist.created_at(),
            updated_at: wishlist.updated_at(),
        }
    }
}

// -- Handlers --

/// GET /api/v1/customers/{customer_id}/wishlist: the customer's wishlist,
/// empty if none has been stored yet.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(customer_id): Path<String>,
) -> Result<Json<WishlistResponse>, ApiError> {
    let wishlist = state.service.get_wishlist(&customer_id).await?;
    Ok(Json(WishlistResponse::from(&wishlist)))
}

/// DELETE /api/v1/customers/{customer_id}/wishlist: remove every product.
#[tracing::instrument(skip(state))]
pub async fn clear<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(customer_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .clear_wishlist(ClearWishlist::new(customer_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/customers/{customer_id}/wishlist/products/{product_id}
///
/// The JSON body is optional and defaults to a single unit without a note.
/// With `?idempotent=true` an already-present product answers 200 instead
/// of failing.
#[tracing::instrument(skip(state, body))]
pub async fn add_item<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((customer_id, product_id)): Path<(String, String)>,
    Query(params): Query<AddItemParams>,
    body: Bytes,
) -> Result<(StatusCode, Json<WishlistResponse>), ApiError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        AddItemRequest::default()
    } else {
        serde_json::from_slice::<AddItemRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))?
    };

    let mut cmd = AddItem::new(customer_id, product_id).quantity(req.quantity.unwrap_or(1));
    cmd.note = req.note;
    cmd.idempotent = params.idempotent;

    let result = state.service.add_item(cmd).await?;
    let status = if result.changed {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(WishlistResponse::from(&result.wishlist))))
}

/// GET /api/v1/customers/{customer_id}/wishlist/products/{product_id}:
/// the item if the product is in the wishlist, 404 otherwise.
#[tracing::instrument(skip(state))]
pub async fn get_item<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((customer_id, product_id)): Path<(String, String)>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.service.find_item(&customer_id, &product_id).await?;
    Ok(Json(ItemResponse::from(&item)))
}

/// DELETE /api/v1/customers/{customer_id}/wishlist/products/{product_id}
#[tracing::instrument(skip(state))]
pub async fn remove_item<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((customer_id, product_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .remove_item(RemoveItem::new(customer_id, product_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/customers/{customer_id}/wishlist/products/{product_id}/quantity
#[tracing::instrument(skip(state, payload))]
pub async fn set_quantity<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((customer_id, product_id)): Path<(String, String)>,
    payload: Result<Json<SetQuantityRequest>, JsonRejection>,
) -> Result<Json<WishlistResponse>, ApiError> {
    let Json(req) = payload?;

    let result = state
        .service
        .set_item_quantity(SetItemQuantity::new(customer_id, product_id, req.quantity))
        .await?;
    Ok(Json(WishlistResponse::from(&result.wishlist)))
}

/// PUT /api/v1/customers/{customer_id}/wishlist/order: replace the display
/// order with a permutation of the current products.
#[tracing::instrument(skip(state, payload))]
pub async fn reorder<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(customer_id): Path<String>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<WishlistResponse>, ApiError> {
    let Json(req) = payload?;

    let result = state
        .service
        .reorder_items(ReorderItems::new(customer_id, req.product_ids))
        .await?;
    Ok(Json(WishlistResponse::from(&result.wishlist)))
}
