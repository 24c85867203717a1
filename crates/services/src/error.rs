use common::ProductId;
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by the service layer.
///
/// All variants are local, recoverable, user-facing conditions; none are
/// fatal to the process. A failed operation never leaves partial state
/// behind — the store's units of work guarantee full rollback.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Checkout was attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart quantity was zero or otherwise unusable.
    #[error("invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i64 },

    /// A product has fewer sellable units than requested.
    #[error("insufficient stock for product {product_id}")]
    InsufficientStock { product_id: ProductId },

    /// An unrecognized order status string was supplied.
    #[error("invalid order status: {status}")]
    InvalidStatus { status: String },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// The storage layer failed; the in-flight unit of work was rolled
    /// back in full.
    #[error("order could not be persisted: {0}")]
    Persistence(#[source] StoreError),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::StockConflict { product_id } => {
                ServiceError::InsufficientStock { product_id }
            }
            StoreError::RowNotFound { entity, key } => ServiceError::NotFound { entity, key },
            other => ServiceError::Persistence(other),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
