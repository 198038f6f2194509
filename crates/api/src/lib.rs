//! HTTP API server with observability for the wishlist service.
//!
//! Provides REST endpoints for per-customer wishlists, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use document_store::DocumentStore;
use domain::{ServiceConfig, WishlistService};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::wishlist::{self, AppState};

/// Wishlist of one customer.
pub const WISHLIST_PATH: &str = "/api/v1/customers/{customer_id}/wishlist";
/// One product within a wishlist.
pub const PRODUCT_PATH: &str = "/api/v1/customers/{customer_id}/wishlist/products/{product_id}";
pub const QUANTITY_PATH: &str =
    "/api/v1/customers/{customer_id}/wishlist/products/{product_id}/quantity";
pub const ORDER_PATH: &str = "/api/v1/customers/{customer_id}/wishlist/order";

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            WISHLIST_PATH,
            get(wishlist::get::<S>).delete(wishlist::clear::<S>),
        )
        .route(
            PRODUCT_PATH,
            post(wishlist::add_item::<S>)
                .get(wishlist::get_item::<S>)
                .delete(wishlist::remove_item::<S>),
        )
        .route(QUANTITY_PATH, put(wishlist::set_quantity::<S>))
        .route(ORDER_PATH, put(wishlist::reorder::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a document store.
pub fn create_default_state<S: DocumentStore + 'static>(
    store: S,
    config: ServiceConfig,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        service: WishlistService::new(store, config),
    })
}
