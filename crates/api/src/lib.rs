//! HTTP API server for the grocery storefront.
//!
//! Thin axum handlers over the service layer, with structured logging
//! (tracing) and Prometheus metrics. The store backend is pluggable:
//! PostgreSQL in production, in-memory for tests and local runs.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use services::{CartService, CatalogService, CheckoutService, NotificationService, OrderDesk};
use store::StorefrontStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the application state from a store.
pub fn create_state<S: StorefrontStore + Clone + 'static>(
    store: S,
    notification_limit: i64,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        catalog: CatalogService::new(store.clone()),
        cart: CartService::new(store.clone()),
        checkout: CheckoutService::new(store.clone()),
        orders: OrderDesk::new(store.clone()),
        notifications: NotificationService::with_limit(store, notification_limit),
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: StorefrontStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        // Catalog
        .route("/products", get(routes::products::list::<S>))
        .route("/products", post(routes::products::create::<S>))
        .route("/products/low-stock", get(routes::products::low_stock::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/products/{id}", put(routes::products::update::<S>))
        .route("/products/{id}", delete(routes::products::delete::<S>))
        .route(
            "/products/{id}/availability",
            post(routes::products::set_availability::<S>),
        )
        .route("/products/{id}/stock", post(routes::products::adjust_stock::<S>))
        .route("/categories", get(routes::products::list_categories::<S>))
        .route("/categories", post(routes::products::create_category::<S>))
        // Cart
        .route("/cart/{customer_id}", get(routes::cart::get::<S>))
        .route("/cart/{customer_id}", delete(routes::cart::clear::<S>))
        .route("/cart/{customer_id}/items", post(routes::cart::add_item::<S>))
        .route("/cart/lines/{line_id}", put(routes::cart::update_line::<S>))
        .route("/cart/lines/{line_id}", delete(routes::cart::remove_line::<S>))
        // Checkout
        .route("/checkout/{customer_id}", post(routes::cart::place_order::<S>))
        // Orders
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}/status", post(routes::orders::update_status::<S>))
        .route("/customers/{id}/orders", get(routes::orders::for_customer::<S>))
        // Notifications
        .route(
            "/customers/{id}/notifications",
            get(routes::notifications::list::<S>),
        )
        .route(
            "/customers/{id}/notifications/unread-count",
            get(routes::notifications::unread_count::<S>),
        )
        .route(
            "/notifications/{id}/read",
            post(routes::notifications::mark_read::<S>),
        )
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
