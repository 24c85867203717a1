use common::ProductId;
use thiserror::Error;

/// Errors that can occur at the storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional stock decrement found fewer units than requested.
    /// The surrounding unit of work has been rolled back in full.
    #[error("insufficient stock for product {product_id}")]
    StockConflict { product_id: ProductId },

    /// A row that the operation requires does not exist.
    #[error("{entity} not found: {key}")]
    RowNotFound { entity: &'static str, key: String },

    /// A uniqueness constraint was violated.
    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },

    /// A stored value failed to decode into its domain type.
    #[error("decode error: {0}")]
    Decode(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StoreError::RowNotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn duplicate(entity: &'static str, key: impl ToString) -> Self {
        StoreError::Duplicate {
            entity,
            key: key.to_string(),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
