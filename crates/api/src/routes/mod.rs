//! Route handlers and shared application state.

pub mod cart;
pub mod health;
pub mod metrics;
pub mod notifications;
pub mod orders;
pub mod products;

use services::{CartService, CatalogService, CheckoutService, NotificationService, OrderDesk};
use store::StorefrontStore;
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: StorefrontStore> {
    pub catalog: CatalogService<S>,
    pub cart: CartService<S>,
    pub checkout: CheckoutService<S>,
    pub orders: OrderDesk<S>,
    pub notifications: NotificationService<S>,
}

pub(crate) fn parse_uuid(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
